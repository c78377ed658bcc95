//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing or mutating project values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,
}
