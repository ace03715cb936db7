//! Import error types

use gridbook_core::ErrorKind;
use thiserror::Error;

/// Result type for import operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Errors that can occur while loading decoded content
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// A cell refers to a style the style table does not have
    #[error("Cell {address} refers to unknown style index {index} (table size: {count})")]
    UnknownStyleIndex {
        address: String,
        index: u32,
        count: usize,
    },

    /// A date or time pattern in the options cannot be used
    #[error("Invalid {what} pattern: {pattern}")]
    InvalidPattern {
        what: &'static str,
        pattern: String,
    },

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] gridbook_core::Error),
}

impl ImportError {
    /// The family this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::UnknownStyleIndex { .. } => ErrorKind::Range,
            ImportError::InvalidPattern { .. } => ErrorKind::Format,
            ImportError::Core(e) => e.kind(),
        }
    }
}
