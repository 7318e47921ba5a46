//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("task title is {length} characters long, expected at most {max}")]
    TitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Errors returned while parsing the requested listing order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseSortError {
    /// The sort column is not one of the sortable task fields.
    #[error("unknown sort field: {0}")]
    UnknownField(String),

    /// The sort direction is neither `asc` nor `desc`.
    #[error("unknown sort direction: {0}, expected asc or desc")]
    UnknownDirection(String),
}

/// Errors returned while converting raw listing parameters into filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskFilterError {
    /// The status filter is not a known status token.
    #[error(transparent)]
    Status(#[from] ParseTaskStatusError),

    /// The priority filter is not a known priority token.
    #[error(transparent)]
    Priority(#[from] ParseTaskPriorityError),

    /// The category filter is not a valid category identifier.
    #[error("invalid category identifier: {0}")]
    Category(String),

    /// A pagination parameter is not a non-negative integer.
    #[error("invalid {parameter} value: {value}")]
    Pagination {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Raw value supplied by the caller.
        value: String,
    },
}
