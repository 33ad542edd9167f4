//! The public tree type
//!
//! Ties the arena, the builder and the query engine together behind one
//! owner. Appends take `&mut self` and queries take `&self`, so the borrow
//! checker enforces the single-writer discipline the structure relies on.

use super::arena::NodeArena;
use super::builder;
use super::error::{Result, TreeError};
use super::types::*;
use log::{debug, warn};
use rustc_hash::FxHashSet;

/// A generalized suffix tree over any number of appended strings.
///
/// # Examples
///
/// ```
/// use sufx::tree::GeneralizedSuffixTree;
///
/// let mut tree = GeneralizedSuffixTree::new();
/// tree.add("banana$").unwrap();
/// assert!(tree.contains("ana"));
/// assert!(tree.contains_suffix("na$"));
///
/// let found: Vec<String> = tree.starting_with("an").map(|s| s.text()).collect();
/// assert_eq!(found, vec!["ana$", "anana$"]);
/// ```
pub struct GeneralizedSuffixTree {
    pub(super) config: TreeConfig,
    pub(super) arena: NodeArena,
    /// Every character seen so far, for the terminator check
    alphabet: FxHashSet<char>,
}

impl GeneralizedSuffixTree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        let arena = NodeArena::with_capacity(config.initial_capacity);
        Self {
            config,
            arena,
            alphabet: FxHashSet::default(),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Add a string to the tree
    ///
    /// Empty strings are ignored. Fails only when the string's trailing
    /// character already occurs in the tree and the terminator policy is
    /// `Reject`; the tree is left untouched in that case.
    pub fn add(&mut self, text: &str) -> Result<()> {
        let chars = self.fold(text);
        let Some(&terminator) = chars.last() else {
            return Ok(());
        };

        let source_index = self.arena.locations().len();
        if self.alphabet.contains(&terminator) {
            match self.config.terminator_policy {
                TerminatorPolicy::Accept => {
                    debug!("string {} shares terminator {:?}", source_index, terminator);
                }
                TerminatorPolicy::Warn => {
                    warn!(
                        "string {} ends with {:?}, which already occurs; its suffixes may be shared with earlier strings",
                        source_index, terminator
                    );
                }
                TerminatorPolicy::Reject => {
                    return Err(TreeError::AmbiguousTerminator {
                        source_index,
                        terminator,
                    });
                }
            }
        }
        self.alphabet.extend(chars.iter().copied());

        let (begin, end) = self.arena.push_string(&chars);
        builder::extend(&mut self.arena, begin, end);

        debug!(
            "added string {} ({} chars), tree has {} nodes",
            source_index,
            end - begin,
            self.arena.node_count()
        );
        Ok(())
    }

    /// Release the suffix-link table
    ///
    /// Queries are unaffected. Later appends rebuild the table lazily and
    /// rescan from the root where links are missing, which is slower but
    /// produces the same tree.
    pub fn compact(&mut self) {
        let links = self.arena.suffix_link_count();
        self.arena.compact();
        debug!("compacted tree, dropped {} suffix links", links);
    }

    /// Number of strings added
    pub fn len(&self) -> usize {
        self.arena.locations().len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.locations().is_empty()
    }

    /// Total characters across all strings
    pub fn text_len(&self) -> usize {
        self.arena.text_len()
    }

    pub fn node_count(&self) -> usize {
        self.arena.node_count()
    }

    /// Text of the string with the given source index
    pub fn string(&self, source: usize) -> Option<String> {
        let loc = self.arena.locations().get(source)?;
        Some(self.arena.text()[loc.start..loc.end].iter().collect())
    }

    pub fn locations(&self) -> &[StringLocation] {
        self.arena.locations()
    }

    pub fn stats(&self) -> TreeStats {
        let text_len = self.arena.text_len();
        let mut stats = TreeStats {
            string_count: self.len(),
            text_len,
            node_count: self.arena.node_count(),
            suffix_links_built: self.arena.has_suffix_links(),
            suffix_link_count: self.arena.suffix_link_count(),
            ..Default::default()
        };

        for node in self.arena.nodes() {
            if !node.is_leaf() {
                stats.internal_count += 1;
            }
            if node.terminal {
                stats.terminal_count += 1;
                if node.is_empty(text_len) {
                    stats.empty_terminal_count += 1;
                }
            }
        }
        // An empty tree's root is a leaf but still counts as internal
        if self.arena.node(ROOT).is_leaf() {
            stats.internal_count += 1;
        }

        stats
    }

    /// Characters of `text` as the tree stores them, case folded if
    /// configured
    pub fn fold(&self, text: &str) -> Vec<char> {
        if self.config.case_insensitive {
            text.chars().flat_map(char::to_lowercase).collect()
        } else {
            text.chars().collect()
        }
    }
}

impl Default for GeneralizedSuffixTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_add_is_noop() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.add("abc").unwrap();
        let nodes = tree.node_count();
        let suffixes: Vec<(String, usize)> = tree.all().map(|s| (s.text(), s.source())).collect();
        let dump = tree.print();

        tree.add("").unwrap();
        assert_eq!(tree.node_count(), nodes);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.text_len(), 3);
        assert_eq!(
            tree.all().map(|s| (s.text(), s.source())).collect::<Vec<_>>(),
            suffixes
        );
        assert!(tree.contains_suffix(""));
        assert_eq!(tree.print(), dump);

        let mut empty = GeneralizedSuffixTree::new();
        empty.add("").unwrap();
        assert!(!empty.contains_suffix(""));
        assert_eq!(empty.all().count(), 0);
        assert_eq!(empty.print(), GeneralizedSuffixTree::new().print());
    }

    #[test]
    fn test_suffix_link_table_matches_arena_across_adds() {
        let mut tree = GeneralizedSuffixTree::new();
        for s in ["abcabx", "xabcd", "cdcd"] {
            tree.add(s).unwrap();
            assert_eq!(tree.arena.suffix_link_slots(), Some(tree.node_count()));
        }

        tree.compact();
        assert_eq!(tree.arena.suffix_link_slots(), None);

        for s in ["abcab", "dd"] {
            tree.add(s).unwrap();
            assert_eq!(tree.arena.suffix_link_slots(), Some(tree.node_count()));
        }
        assert!(tree.contains_suffix("cab"));
        assert!(tree.contains("abx"));
        assert!(!tree.contains("bxa"));
    }

    #[test]
    fn test_string_lookup() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.add("hello").unwrap();
        tree.add("world").unwrap();

        assert_eq!(tree.string(0).as_deref(), Some("hello"));
        assert_eq!(tree.string(1).as_deref(), Some("world"));
        assert_eq!(tree.string(2), None);
    }

    #[test]
    fn test_reject_policy_leaves_tree_untouched() {
        let mut tree = GeneralizedSuffixTree::with_config(TreeConfig {
            terminator_policy: TerminatorPolicy::Reject,
            ..Default::default()
        });
        tree.add("abc$").unwrap();
        let nodes = tree.node_count();

        let err = tree.add("xy$").unwrap_err();
        assert_eq!(
            err,
            TreeError::AmbiguousTerminator {
                source_index: 1,
                terminator: '$'
            }
        );
        assert_eq!(tree.node_count(), nodes);
        assert_eq!(tree.len(), 1);

        tree.add("xy#").unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_warn_policy_accepts() {
        let mut tree = GeneralizedSuffixTree::with_config(TreeConfig {
            terminator_policy: TerminatorPolicy::Warn,
            ..Default::default()
        });
        tree.add("ab").unwrap();
        tree.add("cb").unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_case_insensitive_folds_text() {
        let mut tree = GeneralizedSuffixTree::with_config(TreeConfig {
            case_insensitive: true,
            ..Default::default()
        });
        tree.add("HeLLo").unwrap();
        assert_eq!(tree.string(0).as_deref(), Some("hello"));
    }

    #[test]
    fn test_stats() {
        let mut tree = GeneralizedSuffixTree::new();
        assert_eq!(tree.stats().internal_count, 1);
        assert_eq!(tree.stats().terminal_count, 0);

        tree.add("banana$").unwrap();
        let stats = tree.stats();
        assert_eq!(stats.string_count, 1);
        assert_eq!(stats.text_len, 7);
        assert_eq!(stats.terminal_count, 7);
        assert_eq!(stats.empty_terminal_count, 0);
        assert_eq!(stats.node_count, stats.internal_count + stats.terminal_count);
        assert!(stats.suffix_links_built);

        tree.compact();
        let stats = tree.stats();
        assert!(!stats.suffix_links_built);
        assert_eq!(stats.suffix_link_count, 0);
    }
}
