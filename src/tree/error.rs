//! Error types for tree operations.

use thiserror::Error;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur when adding strings.
///
/// Invariant violations inside the builder are not represented here; they
/// panic, since the arena can no longer be trusted afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The trailing character of the string already occurs in the buffer
    /// and the configured policy is `Reject`.
    #[error("trailing character {terminator:?} of string {source_index} is not unique")]
    AmbiguousTerminator {
        /// Source index the string would have received
        source_index: usize,
        /// The offending trailing character
        terminator: char,
    },
}
