//! Structural dump for debugging

use super::suffix_tree::GeneralizedSuffixTree;
use super::types::*;
use std::fmt;

/// Borrowed view that renders the tree structure
struct TreeDump<'t>(&'t GeneralizedSuffixTree);

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        let arena = &tree.arena;
        let text_len = arena.text_len();

        writeln!(
            f,
            "root ({} strings, {} chars, {} nodes)",
            tree.len(),
            text_len,
            arena.node_count()
        )?;

        // Children are pushed in reverse so they pop in sorted order
        let mut stack: Vec<(NodeId, usize)> = arena
            .node(ROOT)
            .child_slice()
            .iter()
            .rev()
            .map(|&child| (child, 1))
            .collect();

        while let Some((id, indent)) = stack.pop() {
            let node = arena.node(id);
            let end = node.end(text_len);

            write!(f, "{:width$}", "", width = indent * 2)?;
            if node.begin == end {
                f.write_str("ε")?;
            } else {
                for ch in &arena.text()[node.begin..end] {
                    write!(f, "{}", ch)?;
                }
            }
            write!(f, "  #{}", id)?;
            if node.end == EdgeEnd::Growing {
                f.write_str(" ..")?;
            }
            if let Some(link) = arena.suffix_link(id) {
                write!(f, " -> #{}", link)?;
            }
            if node.terminal {
                write!(f, " [{}]", arena.locate(end))?;
            }
            writeln!(f)?;

            for &child in node.child_slice().iter().rev() {
                stack.push((child, indent + 1));
            }
        }

        Ok(())
    }
}

impl GeneralizedSuffixTree {
    /// Render the tree one edge per line, indented by depth.
    ///
    /// Each line shows the edge label, the node index, the suffix link when
    /// one is assigned and, for terminal edges, the source string. Zero-length
    /// labels print as `ε`. Diagnostic only; the format is not stable.
    pub fn print(&self) -> String {
        TreeDump(self).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_empty() {
        let tree = GeneralizedSuffixTree::new();
        assert_eq!(tree.print(), "root (0 strings, 0 chars, 1 nodes)\n");
    }

    #[test]
    fn test_print_lists_every_edge() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.add("ab").unwrap();
        tree.add("ba").unwrap();

        let dump = tree.print();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), tree.node_count());
        assert!(lines[1].starts_with("  a  #"));
        assert!(lines[2].starts_with("    ε  #"));
        assert!(lines[2].ends_with("[1]"));
        assert!(dump.contains("\n    a  #") && dump.contains(" .. [1]"));
    }

    #[test]
    fn test_print_single_string_layout() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.add("ab").unwrap();

        let expected = "root (1 strings, 2 chars, 3 nodes)\n  ab  #1 .. [0]\n  b  #2 .. [0]\n";
        assert_eq!(tree.print(), expected);
        assert_eq!(format!("{}", TreeDump(&tree)), expected);
    }
}
