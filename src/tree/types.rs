//! Types for the generalized suffix tree
//!
//! Nodes, string spans and configuration shared by the arena, the builder
//! and the query engine.

use serde::{Deserialize, Serialize};

/// Index of a node in the arena
pub type NodeId = usize;

/// Position in the concatenated character buffer
pub type TextPosition = usize;

/// The root node always lives at arena index 0
pub const ROOT: NodeId = 0;

/// End boundary of an edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// Label ends at a fixed buffer position (exclusive)
    Fixed(TextPosition),
    /// Label tracks the current buffer length until the next string begins
    Growing,
}

impl EdgeEnd {
    /// Resolve against the current buffer length
    #[inline]
    pub fn resolve(self, text_len: TextPosition) -> TextPosition {
        match self {
            EdgeEnd::Fixed(end) => end,
            EdgeEnd::Growing => text_len,
        }
    }
}

/// A node of the tree, which doubles as the edge leading into it.
///
/// The label is `text[begin..end)`. `children` is `None` for leaves and is
/// kept sorted by the first character of each child's label, with
/// zero-length children first.
#[derive(Debug, Clone)]
pub struct Node {
    pub begin: TextPosition,
    pub end: EdgeEnd,
    pub children: Option<Vec<NodeId>>,
    /// A suffix of some added string ends at the bottom of this edge
    pub terminal: bool,
}

impl Node {
    /// Internal node with a fixed label and no children yet
    pub fn internal(begin: TextPosition, end: TextPosition) -> Self {
        Self {
            begin,
            end: EdgeEnd::Fixed(end),
            children: Some(Vec::new()),
            terminal: false,
        }
    }

    /// Terminal leaf
    pub fn leaf(begin: TextPosition, end: EdgeEnd) -> Self {
        Self {
            begin,
            end,
            children: None,
            terminal: true,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub fn end(&self, text_len: TextPosition) -> TextPosition {
        self.end.resolve(text_len)
    }

    #[inline]
    pub fn len(&self, text_len: TextPosition) -> usize {
        self.end(text_len) - self.begin
    }

    #[inline]
    pub fn is_empty(&self, text_len: TextPosition) -> bool {
        self.len(text_len) == 0
    }

    /// Child list as a slice (empty for leaves)
    #[inline]
    pub fn child_slice(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Span of one added string in the concatenated buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StringLocation {
    /// Start position in the buffer (inclusive)
    pub start: TextPosition,
    /// End position in the buffer (exclusive)
    pub end: TextPosition,
}

impl StringLocation {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// What to do when a new string's trailing character is already present in
/// the buffer, i.e. the string may share suffixes with earlier strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminatorPolicy {
    /// Keep shared suffixes; each string keeps its own terminal entries
    #[default]
    Accept,
    /// Same as `Accept`, but log a warning
    Warn,
    /// Refuse the string and leave the tree unchanged
    Reject,
}

impl std::str::FromStr for TerminatorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown terminator policy: {}", other)),
        }
    }
}

/// Configuration for building a tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeConfig {
    /// Lowercase every added string and every query (default: false)
    #[serde(default)]
    pub case_insensitive: bool,
    /// Handling of strings whose trailing character is not unique
    #[serde(default)]
    pub terminator_policy: TerminatorPolicy,
    /// Characters to reserve up front in the buffer (default: 0)
    #[serde(default)]
    pub initial_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            terminator_policy: TerminatorPolicy::Accept,
            initial_capacity: 0,
        }
    }
}

/// Statistics about a tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeStats {
    /// Number of strings added
    pub string_count: usize,
    /// Total characters in the buffer
    pub text_len: usize,
    /// Nodes in the arena, root included
    pub node_count: usize,
    /// Internal nodes, root included
    pub internal_count: usize,
    /// Terminal edges (one per suffix)
    pub terminal_count: usize,
    /// Zero-length terminal edges
    pub empty_terminal_count: usize,
    /// Whether the suffix-link table is currently allocated
    pub suffix_links_built: bool,
    /// Assigned suffix links
    pub suffix_link_count: usize,
}
