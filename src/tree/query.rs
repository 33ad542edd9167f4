//! Queries and traversal
//!
//! Every lookup descends from the root, binary-searching children by the
//! next query character and comparing the rest of each edge directly
//! against the buffer. Enumeration walks the tree with an explicit stack so
//! memory use does not depend on the call stack, whatever the tree depth.

use super::arena::NodeArena;
use super::suffix_tree::GeneralizedSuffixTree;
use super::types::*;
use roaring::RoaringBitmap;
use std::fmt;

/// One suffix of one added string.
///
/// Holds only positions and a borrow of the buffer; the text is built on
/// demand.
#[derive(Debug, Clone, Copy)]
pub struct Suffix<'t> {
    source: usize,
    offset: usize,
    start: TextPosition,
    len: usize,
    buffer: &'t [char],
}

impl<'t> Suffix<'t> {
    /// Insertion index of the string this suffix belongs to
    #[inline]
    pub fn source(&self) -> usize {
        self.source
    }

    /// Start of the suffix within its string
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The suffix characters, borrowed from the tree
    #[inline]
    pub fn chars(&self) -> &'t [char] {
        &self.buffer[self.start..self.start + self.len]
    }

    pub fn text(&self) -> String {
        self.chars().iter().collect()
    }
}

impl fmt::Display for Suffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            fmt::Write::write_char(f, *ch)?;
        }
        Ok(())
    }
}

/// Where a pattern match ended: on `edge`, after `matched` characters of
/// its label.
#[derive(Debug, Clone, Copy)]
struct Landing {
    edge: NodeId,
    matched: usize,
}

struct Frame {
    node: NodeId,
    next_child: usize,
    /// Label length added to the depth when this frame was pushed
    edge_len: usize,
}

/// Lazy lexicographic enumeration of suffixes below one edge.
pub struct Suffixes<'t> {
    arena: &'t NodeArena,
    stack: Vec<Frame>,
    /// Path length from the root to the bottom of the top frame's node
    depth: usize,
    /// The start edge itself is terminal and has not been yielded yet
    single: Option<NodeId>,
}

impl<'t> Suffixes<'t> {
    fn new(arena: &'t NodeArena, start: NodeId, depth: usize) -> Self {
        let node = arena.node(start);
        let mut suffixes = Self {
            arena,
            stack: Vec::new(),
            depth,
            single: None,
        };
        if node.terminal {
            suffixes.single = Some(start);
        } else if !node.is_leaf() {
            suffixes.stack.push(Frame {
                node: start,
                next_child: 0,
                edge_len: 0,
            });
        }
        suffixes
    }

    fn empty(arena: &'t NodeArena) -> Self {
        Self {
            arena,
            stack: Vec::new(),
            depth: 0,
            single: None,
        }
    }

    fn suffix_at(&self, terminal: NodeId, len: usize) -> Suffix<'t> {
        let arena = self.arena;
        let end = arena.node(terminal).end(arena.text_len());
        let source = arena.locate(end);
        let start = end - len;
        Suffix {
            source,
            offset: start - arena.locations()[source].start,
            start,
            len,
            buffer: arena.text(),
        }
    }
}

impl<'t> Iterator for Suffixes<'t> {
    type Item = Suffix<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(terminal) = self.single.take() {
            return Some(self.suffix_at(terminal, self.depth));
        }

        loop {
            let frame = self.stack.last_mut()?;
            let children = self.arena.node(frame.node).child_slice();

            if frame.next_child < children.len() {
                let child = children[frame.next_child];
                frame.next_child += 1;

                let edge_len = self.arena.label_len(child);
                if self.arena.node(child).terminal {
                    return Some(self.suffix_at(child, self.depth + edge_len));
                }
                self.depth += edge_len;
                self.stack.push(Frame {
                    node: child,
                    next_child: 0,
                    edge_len,
                });
            } else {
                let done = self.stack.pop()?;
                self.depth -= done.edge_len;
            }
        }
    }
}

impl GeneralizedSuffixTree {
    /// Whether `substring` occurs in any added string
    pub fn contains(&self, substring: &str) -> bool {
        let pattern = self.fold(substring);
        self.descend(&pattern).is_some()
    }

    /// Whether `text` is a suffix of any added string
    ///
    /// The empty text is a suffix as soon as one string has been added.
    pub fn contains_suffix(&self, text: &str) -> bool {
        let pattern = self.fold(text);
        if pattern.is_empty() {
            return !self.is_empty();
        }

        let Some(landing) = self.descend(&pattern) else {
            return false;
        };
        if landing.matched < self.arena.label_len(landing.edge) {
            return false;
        }

        let node = self.arena.node(landing.edge);
        if node.is_leaf() {
            return node.terminal;
        }
        // Zero-length terminal children sort first
        node.child_slice()
            .first()
            .is_some_and(|&child| self.arena.first_char(child).is_none())
    }

    /// Every suffix starting with `prefix`, in lexicographic order
    pub fn starting_with(&self, prefix: &str) -> Suffixes<'_> {
        let pattern = self.fold(prefix);
        if pattern.is_empty() {
            return self.all();
        }

        match self.descend(&pattern) {
            Some(landing) => {
                let tail = self.arena.label_len(landing.edge) - landing.matched;
                Suffixes::new(&self.arena, landing.edge, pattern.len() + tail)
            }
            None => Suffixes::empty(&self.arena),
        }
    }

    /// Every suffix of every added string, in lexicographic order
    ///
    /// Suffixes shared by several strings are yielded once per string, in
    /// insertion order.
    pub fn all(&self) -> Suffixes<'_> {
        Suffixes::new(&self.arena, ROOT, 0)
    }

    /// Number of occurrences of `pattern` across all strings
    pub fn count(&self, pattern: &str) -> usize {
        self.starting_with(pattern).count()
    }

    /// Source indices of the strings containing `pattern`
    pub fn sources_containing(&self, pattern: &str) -> RoaringBitmap {
        self.starting_with(pattern)
            .map(|suffix| suffix.source() as u32)
            .collect()
    }

    /// Longest substring shared by every added string
    ///
    /// Ties go to the lexicographically smallest candidate. Returns `None`
    /// for an empty tree or when the strings share no character.
    pub fn longest_common_substring(&self) -> Option<String> {
        struct LcsFrame {
            node: NodeId,
            next_child: usize,
            edge_len: usize,
            sources: RoaringBitmap,
        }

        let wanted = self.len() as u64;
        if wanted == 0 {
            return None;
        }

        let arena = &self.arena;
        let text_len = arena.text_len();
        // (node, depth) of the best candidate so far
        let mut best: Option<(NodeId, usize)> = None;
        let mut depth = 0;
        let mut stack = vec![LcsFrame {
            node: ROOT,
            next_child: 0,
            edge_len: 0,
            sources: RoaringBitmap::new(),
        }];

        while let Some(frame) = stack.last_mut() {
            let children = arena.node(frame.node).child_slice();

            if frame.next_child < children.len() {
                let child = children[frame.next_child];
                frame.next_child += 1;

                let edge_len = arena.label_len(child);
                let node = arena.node(child);
                if node.terminal {
                    frame.sources.insert(arena.locate(node.end(text_len)) as u32);
                    let len = depth + edge_len;
                    if wanted == 1 && edge_len > 0 && best.is_none_or(|(_, d)| len > d) {
                        best = Some((child, len));
                    }
                    continue;
                }

                depth += edge_len;
                stack.push(LcsFrame {
                    node: child,
                    next_child: 0,
                    edge_len,
                    sources: RoaringBitmap::new(),
                });
            } else {
                let Some(done) = stack.pop() else { break };
                if done.node != ROOT
                    && done.sources.len() == wanted
                    && best.is_none_or(|(_, d)| depth > d)
                {
                    best = Some((done.node, depth));
                }
                depth -= done.edge_len;
                if let Some(parent) = stack.last_mut() {
                    parent.sources |= done.sources;
                }
            }
        }

        let (node, len) = best?;
        let end = arena.node(node).end(text_len);
        Some(arena.text()[end - len..end].iter().collect())
    }

    /// Follow `pattern` from the root
    fn descend(&self, pattern: &[char]) -> Option<Landing> {
        let arena = &self.arena;
        let text = arena.text();
        let mut landing = Landing {
            edge: ROOT,
            matched: 0,
        };
        let mut i = 0;

        while i < pattern.len() {
            let child = arena.find_child(landing.edge, pattern[i])?;
            let begin = arena.node(child).begin;
            let len = arena.label_len(child);

            let mut matched = 0;
            while matched < len && i < pattern.len() {
                if text[begin + matched] != pattern[i] {
                    return None;
                }
                matched += 1;
                i += 1;
            }
            landing = Landing {
                edge: child,
                matched,
            };
        }

        Some(landing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeConfig;

    fn tree_of(strings: &[&str]) -> GeneralizedSuffixTree {
        let mut tree = GeneralizedSuffixTree::new();
        for s in strings {
            tree.add(s).unwrap();
        }
        tree
    }

    fn texts(suffixes: Suffixes<'_>) -> Vec<String> {
        suffixes.map(|s| s.text()).collect()
    }

    #[test]
    fn test_banana_scenario() {
        let tree = tree_of(&["banana$"]);

        assert!(tree.contains("ana"));
        assert!(!tree.contains("xyz"));
        assert!(tree.contains_suffix("na$"));
        assert!(!tree.contains_suffix("ana"));
        assert_eq!(texts(tree.starting_with("an")), vec!["ana$", "anana$"]);
        assert_eq!(
            texts(tree.all()),
            vec!["$", "a$", "ana$", "anana$", "banana$", "na$", "nana$"]
        );
    }

    #[test]
    fn test_two_strings_scenario() {
        let tree = tree_of(&["ab", "ba"]);
        let all: Vec<(String, usize)> = tree.all().map(|s| (s.text(), s.source())).collect();
        assert_eq!(
            all,
            vec![
                ("a".to_string(), 1),
                ("ab".to_string(), 0),
                ("b".to_string(), 0),
                ("ba".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_suffix_offsets() {
        let tree = tree_of(&["xyz", "abc"]);
        let suffix = tree.starting_with("bc").next().unwrap();
        assert_eq!(suffix.source(), 1);
        assert_eq!(suffix.offset(), 1);
        assert_eq!(suffix.len(), 2);
        assert_eq!(suffix.to_string(), "bc");
    }

    #[test]
    fn test_empty_queries() {
        let empty = GeneralizedSuffixTree::new();
        assert!(empty.contains(""));
        assert!(!empty.contains_suffix(""));
        assert!(!empty.contains("a"));
        assert_eq!(empty.all().count(), 0);
        assert_eq!(empty.starting_with("a").count(), 0);

        let tree = tree_of(&["abc"]);
        assert!(tree.contains(""));
        assert!(tree.contains_suffix(""));
        assert_eq!(tree.starting_with("").count(), 3);
    }

    #[test]
    fn test_suffix_of_internal_node() {
        // "an" ends at an internal node in "banana" without a terminator
        let tree = tree_of(&["banana"]);
        assert!(tree.contains_suffix("a"));
        assert!(tree.contains_suffix("ana"));
        assert!(tree.contains_suffix("nana"));
        assert!(!tree.contains_suffix("an"));
        assert!(!tree.contains_suffix("ban"));
        assert_eq!(texts(tree.starting_with("an")), vec!["ana", "anana"]);
    }

    #[test]
    fn test_starting_with_mid_edge() {
        let tree = tree_of(&["banana$"]);
        assert_eq!(texts(tree.starting_with("ba")), vec!["banana$"]);
        assert_eq!(texts(tree.starting_with("banana$")), vec!["banana$"]);
        assert_eq!(texts(tree.starting_with("nan")), vec!["nana$"]);
        assert_eq!(tree.starting_with("bananas").count(), 0);
    }

    #[test]
    fn test_duplicates_keep_sources() {
        let tree = tree_of(&["ab", "cb", "b"]);
        let b: Vec<usize> = tree
            .all()
            .filter(|s| s.text() == "b")
            .map(|s| s.source())
            .collect();
        assert_eq!(b, vec![0, 1, 2]);
        assert_eq!(tree.count("b"), 3);
        assert_eq!(tree.count("ab"), 1);
    }

    #[test]
    fn test_sources_containing() {
        let tree = tree_of(&["hello world", "world hello", "foo bar baz"]);
        let sources = tree.sources_containing("hello");
        assert!(sources.contains(0));
        assert!(sources.contains(1));
        assert!(!sources.contains(2));
        assert!(tree.sources_containing("notfound").is_empty());
    }

    #[test]
    fn test_longest_common_substring() {
        let tree = tree_of(&["xabcdy1", "zzbcdab2", "abcd3"]);
        assert_eq!(tree.longest_common_substring().as_deref(), Some("bcd"));

        let tree = tree_of(&["VOTEFORTHEGREATALBANIAFORYOU", "CHOOSETHEGREATALBANIANFUTURE"]);
        assert_eq!(
            tree.longest_common_substring().as_deref(),
            Some("THEGREATALBANIA")
        );

        let tree = tree_of(&["abc"]);
        assert_eq!(tree.longest_common_substring().as_deref(), Some("abc"));

        let tree = tree_of(&["abc", "xyz"]);
        assert_eq!(tree.longest_common_substring(), None);
        assert_eq!(GeneralizedSuffixTree::new().longest_common_substring(), None);
    }

    #[test]
    fn test_case_insensitive_queries() {
        let mut tree = GeneralizedSuffixTree::with_config(TreeConfig {
            case_insensitive: true,
            ..Default::default()
        });
        tree.add("Hello World").unwrap();
        assert!(tree.contains("WORLD"));
        assert!(tree.contains_suffix("orLD"));
        assert_eq!(texts(tree.starting_with("HEL")), vec!["hello world"]);
    }

    #[test]
    fn test_queries_idempotent_and_compact_transparent() {
        let mut compacted = tree_of(&["mississippi"]);
        let mut plain = tree_of(&["mississippi"]);
        compacted.compact();

        compacted.add("missouri").unwrap();
        plain.add("missouri").unwrap();

        let a: Vec<(String, usize)> = compacted.all().map(|s| (s.text(), s.source())).collect();
        let b: Vec<(String, usize)> = plain.all().map(|s| (s.text(), s.source())).collect();
        assert_eq!(a, b);
        assert_eq!(texts(plain.all()), texts(plain.all()));
        assert_eq!(compacted.contains("ssou"), plain.contains("ssou"));
    }
}
