//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The comment body is empty after trimming.
    #[error("comment body must not be empty")]
    EmptyCommentBody,

    /// Page number or page size below one.
    #[error("page and limit must be at least 1")]
    InvalidPagination,
}

/// Error returned while parsing status identifiers from persistence or
/// client input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status id: {0}")]
pub struct ParseTaskStatusError(pub i16);
