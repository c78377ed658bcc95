//! In-memory repository for task lifecycle tests.
//!
//! Emulates the store-side guarantees the Postgres adapter gets from the
//! database: sibling-position uniqueness, the atomic propose/reject
//! procedures (status change plus comment in one step), and the
//! pre-proposal status the reject procedure reverts to.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::project::domain::ProjectId;
use crate::task::{
    domain::{
        CommentAuthor, Page, PositionAssignment, Task, TaskComment, TaskFilters, TaskId,
        TaskListing, TaskPatch, TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<TaskId, Vec<TaskComment>>,
    // Status each pending task held before its proposal; consumed by reject.
    prior_status: HashMap<TaskId, TaskStatus>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filters(task: &Task, project_id: ProjectId, filters: &TaskFilters) -> bool {
    task.project_id() == project_id
        && task.parent_id() == filters.parent_id()
        && filters.status().is_none_or(|status| task.status() == status)
        && filters
            .delegated()
            .is_none_or(|delegated| task.is_delegated() == delegated)
}

fn sibling_conflict(state: &InMemoryTaskState, task: &Task) -> bool {
    state.tasks.values().any(|existing| {
        existing.id() != task.id()
            && existing.project_id() == task.project_id()
            && existing.parent_id() == task.parent_id()
            && existing.position() == task.position()
    })
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if sibling_conflict(&state, task) {
            return Err(TaskRepositoryError::SiblingPositionTaken {
                project: task.project_id(),
                parent: task.parent_id(),
                position: task.position(),
            });
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(
        &self,
        project_id: ProjectId,
        filters: &TaskFilters,
        page: &Page,
    ) -> TaskRepositoryResult<TaskListing> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_filters(task, project_id, filters))
            .cloned()
            .collect();
        matching.sort_by_key(Task::position);

        let total = matching.len() as u64;
        let offset =
            usize::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = usize::try_from(page.limit()).map_err(TaskRepositoryError::persistence)?;
        let tasks = matching.into_iter().skip(offset).take(limit).collect();
        Ok(TaskListing { tasks, total })
    }

    async fn max_position(
        &self,
        project_id: ProjectId,
        parent_id: Option<TaskId>,
    ) -> TaskRepositoryResult<Option<i32>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id && task.parent_id() == parent_id)
            .map(Task::position)
            .max())
    }

    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        project_scope: Option<ProjectId>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut task = state
            .tasks
            .get(&id)
            .filter(|task| {
                project_scope.is_none_or(|scope| task.project_id() == scope)
            })
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.apply_patch(patch, Utc::now())
            .map_err(TaskRepositoryError::persistence)?;
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut task = state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.transition_status(status, Utc::now());
        state.tasks.insert(id, task.clone());
        // The proposal is resolved; the recorded pre-proposal status is
        // no longer needed.
        state.prior_status.remove(&id);
        Ok(task)
    }

    async fn propose_status(
        &self,
        id: TaskId,
        pending_status: TaskStatus,
        comment: &str,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut task = state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let now = Utc::now();
        if !task.status().is_pending() {
            state.prior_status.insert(id, task.status());
        }
        task.transition_status(pending_status, now);
        let record = TaskComment::create(id, comment, CommentAuthor::AiAgent, now)
            .map_err(TaskRepositoryError::persistence)?;
        state.comments.entry(id).or_default().push(record);
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn reject_proposal(&self, id: TaskId, comment: &str) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut task = state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let now = Utc::now();
        let restored = state.prior_status.remove(&id).unwrap_or(TaskStatus::ToDo);
        task.transition_status(restored, now);
        let record = TaskComment::create(id, comment, CommentAuthor::Human, now)
            .map_err(TaskRepositoryError::persistence)?;
        state.comments.entry(id).or_default().push(record);
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn reorder(&self, assignments: &[PositionAssignment]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        // Stage the whole batch, then validate, then commit: a failure
        // leaves the stored state untouched.
        let mut staged = state.tasks.clone();
        let now = Utc::now();
        for assignment in assignments {
            let task = staged
                .get_mut(&assignment.task_id)
                .ok_or(TaskRepositoryError::NotFound(assignment.task_id))?;
            task.reassign_position(assignment.position, now);
        }

        let mut seen: HashMap<(ProjectId, Option<TaskId>), HashSet<i32>> = HashMap::new();
        for task in staged.values() {
            if !seen
                .entry((task.project_id(), task.parent_id()))
                .or_default()
                .insert(task.position())
            {
                return Err(TaskRepositoryError::SiblingPositionTaken {
                    project: task.project_id(),
                    parent: task.parent_id(),
                    position: task.position(),
                });
            }
        }

        state.tasks = staged;
        Ok(())
    }

    async fn comments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskComment>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.comments.get(&task_id).cloned().unwrap_or_default())
    }
}
