//! Error types for category domain validation.

use thiserror::Error;

/// Errors returned while constructing domain category values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryDomainError {
    /// The category name is empty after trimming.
    #[error("category name must not be empty")]
    EmptyName,

    /// The category name exceeds the persisted column width.
    #[error("category name is {length} characters long, expected at most {max}")]
    NameTooLong {
        /// Length of the rejected name in characters.
        length: usize,
        /// Maximum accepted length in characters.
        max: usize,
    },
}
