//! Incremental Ukkonen construction
//!
//! Consumes a freshly appended buffer range `[begin, end)` and makes every
//! suffix starting inside it explicit, ending either at a leaf or at a
//! zero-length terminal child. Suffix links let each step resume from the
//! previous insertion point instead of rescanning from the root, so one call
//! costs amortized O(end - begin).
//!
//! The state kept between steps is the active point: a branch node, an
//! optional active edge below it and the number of characters matched along
//! that edge. `buffer[next_suffix..current)` always spells the path from the
//! root to the active point.

use super::arena::NodeArena;
use super::types::*;
use log::trace;

/// Extend the tree with the suffixes of `arena.text()[begin..end)`
pub fn extend(arena: &mut NodeArena, begin: TextPosition, end: TextPosition) {
    assert!(begin < end, "builder needs a non-empty range, got {}..{}", begin, end);
    assert_eq!(end, arena.text_len(), "builder range must end at the buffer end");

    arena.ensure_suffix_links();

    let mut builder = Builder {
        arena,
        branch: ROOT,
        active_edge: None,
        active_len: 0,
        next_suffix: begin,
        current: begin,
        pending_link: None,
        end,
        rescanned: 0,
    };
    builder.run();

    trace!(
        "extended {}..{}: {} nodes, {} characters rescanned",
        begin,
        end,
        builder.arena.node_count(),
        builder.rescanned
    );
}

struct Builder<'a> {
    arena: &'a mut NodeArena,
    /// Deepest explicit node on the active path
    branch: NodeId,
    /// Edge below `branch` holding the active point, if it is mid-edge
    active_edge: Option<NodeId>,
    /// Characters matched along `active_edge`
    active_len: usize,
    /// Start of the suffix being inserted
    next_suffix: TextPosition,
    /// Next buffer position to match
    current: TextPosition,
    /// Node created or used by the previous step, still missing its link
    pending_link: Option<NodeId>,
    end: TextPosition,
    rescanned: usize,
}

impl Builder<'_> {
    fn run(&mut self) {
        loop {
            let walk_start = self.current;
            let (before, before_len) = (self.branch, self.active_len);

            self.find_branching_point();

            if self.current > walk_start {
                if let Some(source) = self.pending_link.take() {
                    debug_assert_eq!(before_len, 0, "pending link must resolve to an explicit node");
                    self.arena.set_suffix_link(source, before);
                }
            }

            let used = self.insert_suffix();

            if let Some(source) = self.pending_link.take() {
                self.arena.set_suffix_link(source, used);
            }
            if used != ROOT {
                self.pending_link = Some(used);
            }

            self.next_suffix += 1;
            if self.next_suffix == self.end {
                break;
            }
            self.advance_active_point();
        }
    }

    /// Walk forward from the active point as far as the tree already spells
    /// the current suffix.
    fn find_branching_point(&mut self) {
        loop {
            let edge = match self.active_edge {
                Some(edge) => edge,
                None => {
                    if self.current == self.end {
                        return;
                    }
                    // A leaf here is a prior string's suffix that needs extending
                    if self.arena.node(self.branch).is_leaf() {
                        return;
                    }
                    let ch = self.arena.text()[self.current];
                    match self.arena.find_child(self.branch, ch) {
                        Some(child) => {
                            self.active_edge = Some(child);
                            child
                        }
                        None => return,
                    }
                }
            };

            let begin = self.arena.node(edge).begin;
            let len = self.arena.label_len(edge);
            let text = self.arena.text();
            while self.active_len < len
                && self.current < self.end
                && text[begin + self.active_len] == text[self.current]
            {
                self.active_len += 1;
                self.current += 1;
            }

            if self.active_len < len {
                return;
            }

            self.branch = edge;
            self.active_edge = None;
            self.active_len = 0;
        }
    }

    /// Make the current suffix explicit at the active point, returning the
    /// node the new terminal hangs from.
    fn insert_suffix(&mut self) -> NodeId {
        let parent = match self.active_edge {
            Some(edge) => {
                debug_assert!(self.active_len > 0);
                self.split_edge(edge)
            }
            None => {
                let node = self.arena.node(self.branch);
                if node.is_leaf() && node.terminal {
                    self.convert_leaf(self.branch);
                }
                self.branch
            }
        };

        let leaf = if self.current < self.end {
            Node::leaf(self.current, EdgeEnd::Growing)
        } else {
            Node::leaf(self.end, EdgeEnd::Fixed(self.end))
        };
        let leaf = self.arena.add_node(leaf);
        self.arena.insert_child(parent, leaf);

        parent
    }

    /// Split the active edge after `active_len` characters.
    ///
    /// The new internal node takes the matched prefix and the original node
    /// keeps its index with the label shortened to the tail, so suffix links
    /// into it remain valid.
    fn split_edge(&mut self, edge: NodeId) -> NodeId {
        let begin = self.arena.node(edge).begin;
        let split_at = begin + self.active_len;

        let mut prefix = Node::internal(begin, split_at);
        prefix.children = Some(vec![edge]);
        let prefix = self.arena.add_node(prefix);

        self.arena.replace_child(self.branch, edge, prefix);
        self.arena.node_mut(edge).begin = split_at;

        // The active point now sits exactly at the end of the prefix node
        self.active_edge = Some(prefix);
        prefix
    }

    /// Turn a prior string's terminal leaf into an internal node, keeping
    /// its suffix as a zero-length terminal child.
    fn convert_leaf(&mut self, id: NodeId) {
        let end = self.arena.node(id).end(self.arena.text_len());
        let stub = self.arena.add_node(Node::leaf(end, EdgeEnd::Fixed(end)));

        let leaf = self.arena.node(id);
        let converted = Node {
            begin: leaf.begin,
            end: leaf.end,
            children: Some(vec![stub]),
            terminal: false,
        };
        self.arena.update_node(id, converted);
    }

    /// Move the active point to the next suffix, either restarting at the
    /// root or following a suffix link and rescanning the remaining depth.
    fn advance_active_point(&mut self) {
        if self.next_suffix > self.current {
            self.branch = ROOT;
            self.active_edge = None;
            self.active_len = 0;
            self.current = self.next_suffix;
            return;
        }

        let (from, rescan_from) = match self.arena.suffix_link(self.branch) {
            Some(link) if self.branch != ROOT => (link, self.current - self.active_len),
            _ => (ROOT, self.next_suffix),
        };
        self.rescan(from, rescan_from);
    }

    /// Descend from `from` along `buffer[pos..current)`, which is known to be
    /// in the tree, comparing only the first character of each edge.
    fn rescan(&mut self, from: NodeId, mut pos: TextPosition) {
        self.branch = from;
        self.active_edge = None;
        self.active_len = 0;
        self.rescanned += self.current - pos;

        while pos < self.current {
            let ch = self.arena.text()[pos];
            let Some(child) = self.arena.find_child(self.branch, ch) else {
                panic!(
                    "suffix path {}..{} missing below node {} at {:?}",
                    pos, self.current, self.branch, ch
                );
            };

            let len = self.arena.label_len(child);
            let remaining = self.current - pos;
            if len <= remaining {
                self.branch = child;
                pos += len;
            } else {
                self.active_edge = Some(child);
                self.active_len = remaining;
                return;
            }
        }
    }
}
