//! Task aggregate root.

use super::{TaskDomainError, TaskId, TaskPatch, TaskStatus};
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Project membership and parentage are fixed at creation; `position`
/// orders a task within its sibling scope (same project, same parent) and
/// `created_by_ai` records how the task came to exist, never changing
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    parent_id: Option<TaskId>,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    position: i32,
    is_delegated: bool,
    created_by_ai: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Owning project.
    pub project_id: ProjectId,
    /// Parent task within the same project, if any.
    pub parent_id: Option<TaskId>,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Position within the sibling scope.
    pub position: i32,
    /// Whether the AI agent created the task.
    pub created_by_ai: bool,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted parent reference, if any.
    pub parent_id: Option<TaskId>,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted sibling position.
    pub position: i32,
    /// Persisted delegation flag.
    pub is_delegated: bool,
    /// Persisted creation-origin flag.
    pub created_by_ai: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One position reassignment within a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAssignment {
    /// The task to move.
    pub task_id: TaskId,
    /// The position it takes within its sibling scope.
    pub position: i32,
}

impl PositionAssignment {
    /// Creates a position assignment.
    #[must_use]
    pub const fn new(task_id: TaskId, position: i32) -> Self {
        Self { task_id, position }
    }
}

impl Task {
    /// Creates a new task.
    ///
    /// Every task starts as [`TaskStatus::ToDo`] and undelegated,
    /// regardless of what the caller asked for.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty
    /// after trimming.
    pub fn create(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = data.title.trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            project_id: data.project_id,
            parent_id: data.parent_id,
            title,
            description: data.description,
            status: TaskStatus::ToDo,
            position: data.position,
            is_delegated: false,
            created_by_ai: data.created_by_ai,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            parent_id: data.parent_id,
            title: data.title,
            description: data.description,
            status: data.status,
            position: data.position,
            is_delegated: data.is_delegated,
            created_by_ai: data.created_by_ai,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the position within the sibling scope.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns `true` when the task is delegated to the AI agent.
    #[must_use]
    pub const fn is_delegated(&self) -> bool {
        self.is_delegated
    }

    /// Returns `true` when the AI agent created the task.
    #[must_use]
    pub const fn created_by_ai(&self) -> bool {
        self.created_by_ai
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// Absent patch fields leave the current values untouched; a present
    /// description replaces the stored one, including clearing it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the patch carries an
    /// empty title.
    pub fn apply_patch(
        &mut self,
        patch: &TaskPatch,
        timestamp: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if let Some(title) = patch.title() {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(TaskDomainError::EmptyTitle);
            }
            self.title = trimmed.to_owned();
        }
        if let Some(description) = patch.description() {
            self.description = description.map(ToOwned::to_owned);
        }
        if let Some(status) = patch.status() {
            self.status = status;
        }
        if let Some(delegated) = patch.delegated() {
            self.is_delegated = delegated;
        }
        self.updated_at = timestamp;
        Ok(())
    }

    /// Moves the task to a new status.
    pub const fn transition_status(&mut self, status: TaskStatus, timestamp: DateTime<Utc>) {
        self.status = status;
        self.updated_at = timestamp;
    }

    /// Moves the task to a new sibling position.
    pub const fn reassign_position(&mut self, position: i32, timestamp: DateTime<Utc>) {
        self.position = position;
        self.updated_at = timestamp;
    }
}
