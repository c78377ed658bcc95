//! Repository port for task persistence, querying, and the atomic
//! propose/reject procedures.

use crate::project::domain::ProjectId;
use crate::task::domain::{
    Page, PositionAssignment, Task, TaskComment, TaskFilters, TaskId, TaskListing, TaskPatch,
    TaskStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// The propose and reject operations are single atomic procedures on the
/// store: the status change and its accompanying comment are either both
/// visible or neither is. The crate never orchestrates them as two calls.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists and [`TaskRepositoryError::SiblingPositionTaken`]
    /// when another sibling already holds the task's position.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists one page of a project's tasks matching `filters`, ordered by
    /// position, together with the total match count ignoring pagination.
    async fn list(
        &self,
        project_id: ProjectId,
        filters: &TaskFilters,
        page: &Page,
    ) -> TaskRepositoryResult<TaskListing>;

    /// Returns the highest position in the sibling scope
    /// `(project_id, parent_id)`, or `None` for an empty scope.
    ///
    /// An empty scope is a normal signal, not an error.
    async fn max_position(
        &self,
        project_id: ProjectId,
        parent_id: Option<TaskId>,
    ) -> TaskRepositoryResult<Option<i32>>;

    /// Applies a partial update and returns the written row.
    ///
    /// With `project_scope` set, tasks outside that project are invisible
    /// to the update and report not-found.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no matching task
    /// exists.
    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        project_scope: Option<ProjectId>,
    ) -> TaskRepositoryResult<Task>;

    /// Writes a new status (the accept path) and returns the written row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskRepositoryResult<Task>;

    /// Atomic propose procedure: stores `pending_status` and an AI-authored
    /// comment in one step, returning the written row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn propose_status(
        &self,
        id: TaskId,
        pending_status: TaskStatus,
        comment: &str,
    ) -> TaskRepositoryResult<Task>;

    /// Atomic reject procedure: reverts the task to its pre-proposal
    /// status and stores a human-authored rejection comment in one step,
    /// returning the written row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn reject_proposal(&self, id: TaskId, comment: &str) -> TaskRepositoryResult<Task>;

    /// Applies a batch of sibling position reassignments atomically.
    ///
    /// Either every assignment is applied or none is; sibling-position
    /// uniqueness holds once the batch commits.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for the first assignment
    /// whose task does not exist.
    async fn reorder(&self, assignments: &[PositionAssignment]) -> TaskRepositoryResult<()>;

    /// Returns a task's comments in creation order.
    async fn comments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskComment>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Another sibling already holds the requested position.
    ///
    /// This is the retryable outcome of two concurrent allocations racing
    /// over one sibling scope.
    #[error("position {position} already taken in project {project} (parent {parent:?})")]
    SiblingPositionTaken {
        /// The project of the contested scope.
        project: ProjectId,
        /// The parent of the contested scope; `None` is the top-level
        /// group.
        parent: Option<TaskId>,
        /// The contested position.
        position: i32,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
