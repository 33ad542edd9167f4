//! Generalized suffix tree
//!
//! An incrementally built suffix tree over any number of strings, answering
//! substring, suffix and prefix queries in time proportional to the query
//! length (plus output size for enumeration).
//!
//! ## Structure
//!
//! - All strings live in one concatenated character buffer; edge labels are
//!   `[begin, end)` ranges into it
//! - Nodes sit in an arena and refer to each other by index
//! - Every suffix of every string ends at a terminal edge, possibly a
//!   zero-length child of an internal node
//! - Suffix links are kept in a side table that `compact()` can release
//!
//! Construction follows Ukkonen's algorithm one string at a time, so adding
//! a string costs amortized time linear in its length.

mod arena;
mod builder;
mod dump;
pub mod error;
mod query;
mod suffix_tree;
pub mod types;

pub use error::{Result, TreeError};
pub use query::{Suffix, Suffixes};
pub use suffix_tree::GeneralizedSuffixTree;
pub use types::{StringLocation, TerminatorPolicy, TreeConfig, TreeStats};
