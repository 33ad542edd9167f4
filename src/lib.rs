//! # sufx - Generalized Suffix Tree
//!
//! sufx builds a generalized suffix tree over any number of strings, one at
//! a time, and answers substring, suffix and prefix queries against all of
//! them at once.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`tree`] - The suffix tree: arena, Ukkonen builder and queries
//! - [`input`] - Reading files and directories into strings (CLI)
//! - [`output`] - Result and statistics formatting (CLI)
//! - [`utils`] - Configuration file and progress bars
//!
//! ## Quick Start
//!
//! ```
//! use sufx::tree::GeneralizedSuffixTree;
//!
//! let mut tree = GeneralizedSuffixTree::new();
//! tree.add("ab").unwrap();
//! tree.add("ba").unwrap();
//!
//! for suffix in tree.all() {
//!     println!("{} (string {}, offset {})", suffix, suffix.source(), suffix.offset());
//! }
//!
//! assert!(tree.contains("ba"));
//! assert_eq!(tree.count("a"), 2);
//! assert_eq!(tree.longest_common_substring().as_deref(), Some("a"));
//! ```
//!
//! ## Performance
//!
//! Adding a string costs amortized time linear in its length; suffix links
//! carry the construction from one suffix to the next. `contains` and
//! `contains_suffix` run in time proportional to the query length, and
//! enumeration is lazy. `compact()` releases the suffix links once no more
//! strings are expected.

pub mod input;
pub mod output;
pub mod tree;
pub mod utils;
