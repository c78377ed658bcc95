//! Service-level error taxonomy for task operations.
//!
//! Request adapters match this enum exhaustively to pick status codes:
//! validation 400, the not-found kinds 404, authorization 403, invalid
//! state 409, persistence 500. (Authentication failures never reach this
//! taxonomy; they are raised by the identity service before the core is
//! invoked.)

use crate::task::ports::TaskRepositoryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the task lifecycle engine.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Malformed or empty input; raised before any collaborator call.
    #[error("{0}")]
    Validation(String),

    /// The project does not exist or the actor lacks visibility of it.
    ///
    /// Ownership mismatches are folded into this kind so project existence
    /// is never disclosed to non-owners.
    #[error("Project not found.")]
    ProjectNotFound,

    /// The task does not exist or the actor lacks visibility of it.
    #[error("Task not found.")]
    TaskNotFound,

    /// The resource is visible but the action is forbidden for this actor.
    #[error("{0}")]
    Authorization(String),

    /// The actor is permitted in principle but the task's current status
    /// disallows the requested transition.
    #[error("{0}")]
    InvalidState(String),

    /// The persistence collaborator failed unexpectedly. Details are
    /// logged, never surfaced to the caller.
    #[error("Task storage failed.")]
    Persistence(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

/// Result type for task lifecycle operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

impl TaskServiceError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an authorization error.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    /// Creates an invalid-state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

/// Maps a task repository failure to the service taxonomy.
///
/// "No matching row" becomes the task-level not-found kind; everything
/// else is logged and surfaced as an opaque persistence failure.
pub(crate) fn task_storage_error(err: TaskRepositoryError) -> TaskServiceError {
    match err {
        TaskRepositoryError::NotFound(_) => TaskServiceError::TaskNotFound,
        other => {
            tracing::error!(error = %other, "task storage failure");
            TaskServiceError::Persistence(Arc::new(other))
        }
    }
}

/// Maps a project repository failure observed during task operations.
pub(crate) fn project_storage_error(
    err: crate::project::ports::ProjectRepositoryError,
) -> TaskServiceError {
    match err {
        crate::project::ports::ProjectRepositoryError::NotFound(_) => {
            TaskServiceError::ProjectNotFound
        }
        other => {
            tracing::error!(error = %other, "project storage failure");
            TaskServiceError::Persistence(Arc::new(other))
        }
    }
}
