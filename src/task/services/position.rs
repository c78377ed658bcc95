//! Sibling position allocation.

use super::error::{TaskServiceResult, task_storage_error};
use crate::project::domain::ProjectId;
use crate::task::domain::TaskId;
use crate::task::ports::TaskRepository;

/// Computes the next free position in the sibling scope
/// `(project_id, parent_id)`.
///
/// Returns `max(existing) + 1`, or `1` for an empty scope. The top-level
/// group (`parent_id = None`) and each parent's children are disjoint
/// scopes. Allocation alone is not collision-free under concurrency: the
/// store's uniqueness constraint backs it up, and `create_task` retries on
/// the resulting conflict.
///
/// # Errors
///
/// Returns [`super::TaskServiceError::Persistence`] when the lookup fails;
/// an empty scope is a normal outcome, not an error.
pub async fn next_position<T>(
    repository: &T,
    project_id: ProjectId,
    parent_id: Option<TaskId>,
) -> TaskServiceResult<i32>
where
    T: TaskRepository + ?Sized,
{
    let highest = repository
        .max_position(project_id, parent_id)
        .await
        .map_err(task_storage_error)?;
    Ok(highest.map_or(1, |position| position.saturating_add(1)))
}
