//! Errors surfaced by the hierarchy core.

use crate::cursor::CursorError;
use thiserror::Error;

/// Result type for hierarchy operations.
pub type Result<T> = std::result::Result<T, HierarchyError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Everything that can go wrong while building or navigating the hierarchy.
pub enum HierarchyError {
    /// The form model failed while the hierarchy was being traversed.
    #[error("{0}")]
    Cursor(#[from] CursorError),

    /// Stepping back to the start of a field list failed; the jump was aborted.
    #[error("could not open the field list: {0}")]
    Navigation(#[source] CursorError),

    /// The visible list broke one of its own invariants.
    #[error("hierarchy invariant violated: {0}")]
    InvariantViolation(String),
}

impl HierarchyError {
    #[must_use]
    /// Create an invariant violation error.
    pub fn invariant(details: impl Into<String>) -> Self {
        Self::InvariantViolation(details.into())
    }
}
