//! Character buffer and node arena
//!
//! Owns everything that persists between appends: the concatenated text,
//! the node store, the per-string offset table and the lazily built
//! suffix-link table. Nodes are addressed by index and never removed.

use super::types::*;
use std::cmp::Ordering;

pub struct NodeArena {
    /// Concatenation of every string added so far
    text: Vec<char>,
    nodes: Vec<Node>,
    /// Spans of the added strings, in insertion order
    locations: Vec<StringLocation>,
    /// Suffix links, one slot per node while present
    links: Option<Vec<Option<NodeId>>>,
    /// Nodes created with a growing end since the last freeze
    growing: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an arena reserving room for `capacity` characters
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(if capacity > 0 { capacity * 2 } else { 1 });
        nodes.push(Node {
            begin: 0,
            end: EdgeEnd::Fixed(0),
            children: None,
            terminal: false,
        });

        Self {
            text: Vec::with_capacity(capacity),
            nodes,
            locations: Vec::new(),
            links: None,
            growing: Vec::new(),
        }
    }

    /// Append a string to the buffer and record its location
    ///
    /// Freezes growing edges of the previous string first. Returns the
    /// `[begin, end)` range the builder has to consume.
    pub fn push_string(&mut self, chars: &[char]) -> (TextPosition, TextPosition) {
        self.freeze_growing();

        let begin = self.text.len();
        self.text.extend_from_slice(chars);
        let end = self.text.len();

        self.locations.push(StringLocation { start: begin, end });
        (begin, end)
    }

    fn freeze_growing(&mut self) {
        let frozen_at = self.text.len();
        for id in self.growing.drain(..) {
            let node = &mut self.nodes[id];
            if node.end == EdgeEnd::Growing {
                node.end = EdgeEnd::Fixed(frozen_at);
            }
        }
    }

    #[inline]
    pub fn text(&self) -> &[char] {
        &self.text
    }

    #[inline]
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn locations(&self) -> &[StringLocation] {
        &self.locations
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Append a node, returning its index
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        if node.end == EdgeEnd::Growing {
            self.growing.push(id);
        }
        self.nodes.push(node);
        if let Some(links) = self.links.as_mut() {
            links.push(None);
        }
        id
    }

    /// Replace a node in place, returning the previous value
    pub fn update_node(&mut self, id: NodeId, node: Node) -> Node {
        if node.end == EdgeEnd::Growing {
            self.growing.push(id);
        }
        std::mem::replace(&mut self.nodes[id], node)
    }

    /// Label length of a node against the current buffer
    #[inline]
    pub fn label_len(&self, id: NodeId) -> usize {
        self.nodes[id].len(self.text.len())
    }

    /// First character of a node's label, `None` for zero-length labels
    #[inline]
    pub fn first_char(&self, id: NodeId) -> Option<char> {
        let node = &self.nodes[id];
        if node.is_empty(self.text.len()) {
            None
        } else {
            Some(self.text[node.begin])
        }
    }

    /// Binary search sorted children by the first character of their label
    ///
    /// Zero-length children order before every character, so they are never
    /// reported as a match. Callers check `Ok` for an exact hit; `Err` gives
    /// the insertion position.
    pub fn child_search(&self, children: &[NodeId], ch: char) -> Result<usize, usize> {
        children.binary_search_by(|&child| match self.first_char(child) {
            None => Ordering::Less,
            Some(first) => first.cmp(&ch),
        })
    }

    /// Child of `parent` whose label starts with `ch`
    #[inline]
    pub fn find_child(&self, parent: NodeId, ch: char) -> Option<NodeId> {
        let children = self.nodes[parent].child_slice();
        self.child_search(children, ch).ok().map(|i| children[i])
    }

    /// Insert `child` into `parent`'s sorted child list
    ///
    /// Zero-length children go after any existing zero-length children.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId) {
        let position = match self.first_char(child) {
            None => {
                let children = self.nodes[parent].child_slice();
                children.partition_point(|&c| self.first_char(c).is_none())
            }
            Some(ch) => match self.child_search(self.nodes[parent].child_slice(), ch) {
                Err(position) => position,
                Ok(_) => panic!("node {} already has a child starting with {:?}", parent, ch),
            },
        };

        self.nodes[parent]
            .children
            .get_or_insert_with(Vec::new)
            .insert(position, child);
    }

    /// Point the child slot that currently holds `old` at `new` instead
    ///
    /// Both nodes must start with the same character.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let Some(ch) = self.first_char(old) else {
            panic!("cannot replace zero-length child {} of node {}", old, parent);
        };
        let position = match self.child_search(self.nodes[parent].child_slice(), ch) {
            Ok(position) => position,
            Err(_) => panic!("node {} has no child starting with {:?}", parent, ch),
        };

        match self.nodes[parent].children.as_mut() {
            Some(children) if children[position] == old => children[position] = new,
            _ => panic!("child slot {} of node {} does not hold node {}", position, parent, old),
        }
    }

    /// Allocate the suffix-link table if it is not present
    pub fn ensure_suffix_links(&mut self) {
        if self.links.is_none() {
            self.links = Some(vec![None; self.nodes.len()]);
        }
    }

    #[inline]
    pub fn suffix_link(&self, id: NodeId) -> Option<NodeId> {
        self.links.as_ref().and_then(|links| links[id])
    }

    pub fn set_suffix_link(&mut self, from: NodeId, to: NodeId) {
        if let Some(links) = self.links.as_mut() {
            links[from] = Some(to);
        }
    }

    pub fn has_suffix_links(&self) -> bool {
        self.links.is_some()
    }

    /// Length of the suffix-link table, `None` once compacted
    #[cfg(test)]
    pub(crate) fn suffix_link_slots(&self) -> Option<usize> {
        self.links.as_ref().map(Vec::len)
    }

    pub fn suffix_link_count(&self) -> usize {
        self.links
            .as_ref()
            .map(|links| links.iter().filter(|l| l.is_some()).count())
            .unwrap_or(0)
    }

    /// Drop the suffix-link table and spare capacity
    pub fn compact(&mut self) {
        self.links = None;
        self.growing.shrink_to_fit();
        self.nodes.shrink_to_fit();
        self.text.shrink_to_fit();
    }

    /// Source index of the string whose span ends at `end`
    pub fn locate(&self, end: TextPosition) -> usize {
        match self.locations.binary_search_by(|loc| loc.end.cmp(&end)) {
            Ok(index) => index,
            Err(_) => panic!("terminal edge ends at {} which is not a string end", end),
        }
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
