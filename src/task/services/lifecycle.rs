//! Task lifecycle engine: creation, querying, updates, and the
//! propose/accept/reject delegation protocol.

use super::error::{TaskServiceError, TaskServiceResult, project_storage_error, task_storage_error};
use super::position;
use crate::identity::domain::Actor;
use crate::project::domain::{Project, ProjectId};
use crate::project::ports::ProjectRepository;
use crate::task::{
    domain::{
        NewTaskData, Page, PositionAssignment, Task, TaskComment, TaskFilters, TaskId, TaskListing,
        TaskPatch, TaskStatus,
        access::{self, Access},
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// How often creation re-allocates a position after losing a sibling race.
const MAX_POSITION_ATTEMPTS: u8 = 3;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    parent_id: Option<TaskId>,
    project_id: Option<ProjectId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            parent_id: None,
            project_id: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the parent task.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: TaskId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the target project. Required for human actors; ignored for the
    /// AI agent, whose bound project always wins.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Request payload for listing tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTasksRequest {
    project_id: Option<ProjectId>,
    filters: TaskFilters,
    page: Page,
}

impl ListTasksRequest {
    /// Creates a request for the given pagination window over the
    /// top-level sibling group.
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            project_id: None,
            filters: TaskFilters::new(),
            page,
        }
    }

    /// Sets the target project. Required for human actors; ignored for the
    /// AI agent.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the listing filters.
    #[must_use]
    pub const fn with_filters(mut self, filters: TaskFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Request payload for an AI status proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeStatusRequest {
    proposed_status: TaskStatus,
    comment: String,
}

impl ProposeStatusRequest {
    /// Creates a proposal for the given terminal status with its
    /// explanatory comment.
    #[must_use]
    pub fn new(proposed_status: TaskStatus, comment: impl Into<String>) -> Self {
        Self {
            proposed_status,
            comment: comment.into(),
        }
    }
}

/// Request payload for reordering sibling tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderTasksRequest {
    assignments: Vec<PositionAssignment>,
}

impl ReorderTasksRequest {
    /// Creates a reorder request from position assignments.
    #[must_use]
    pub fn new(assignments: impl IntoIterator<Item = PositionAssignment>) -> Self {
        Self {
            assignments: assignments.into_iter().collect(),
        }
    }

    /// Returns the batch of assignments.
    #[must_use]
    pub fn assignments(&self) -> &[PositionAssignment] {
        &self.assignments
    }

    fn validate_shape(&self) -> TaskServiceResult<()> {
        if self.assignments.is_empty() {
            return Err(TaskServiceError::validation(
                "Reorder payload must not be empty.",
            ));
        }
        if self.assignments.iter().any(|a| a.position < 1) {
            return Err(TaskServiceError::validation("Positions must be at least 1."));
        }
        let mut seen = HashSet::new();
        if self.assignments.iter().any(|a| !seen.insert(a.task_id)) {
            return Err(TaskServiceError::validation(
                "Duplicate task in reorder payload.",
            ));
        }
        Ok(())
    }
}

/// Task lifecycle orchestration service.
///
/// Every operation takes the resolved [`Actor`] and branches on it:
/// humans act on projects they own, the AI agent on the single project its
/// API key is bound to, and the delegation protocol restricts which side
/// may move a task's status and how.
#[derive(Clone)]
pub struct TaskLifecycleService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<T, P, C> TaskLifecycleService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    /// Creates a task in the actor's effective project.
    ///
    /// The new task always starts as [`TaskStatus::ToDo`] and undelegated.
    /// The AI agent may only attach sub-tasks to delegated parents.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for a missing project id
    /// (human actors) or empty title, [`TaskServiceError::ProjectNotFound`]
    /// when the effective project is missing or not owned by the caller,
    /// [`TaskServiceError::TaskNotFound`] for a missing parent, and
    /// [`TaskServiceError::Authorization`] for cross-project or
    /// undelegated parents.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        actor: Actor,
    ) -> TaskServiceResult<Task> {
        if request.title.trim().is_empty() {
            return Err(TaskServiceError::validation("Title is required."));
        }
        let project_id = self
            .effective_project(
                actor,
                request.project_id,
                "Project ID is required to create a task.",
            )
            .await?;

        if let Some(parent_id) = request.parent_id {
            self.check_parent(parent_id, project_id, actor).await?;
        }

        // Allocation races lose to the store's uniqueness constraint; a
        // conflict re-reads the scope and tries again.
        let mut attempt = 0_u8;
        loop {
            attempt = attempt.saturating_add(1);
            let next = position::next_position(
                self.tasks.as_ref(),
                project_id,
                request.parent_id,
            )
            .await?;
            let task = Task::create(
                NewTaskData {
                    project_id,
                    parent_id: request.parent_id,
                    title: request.title.clone(),
                    description: request.description.clone(),
                    position: next,
                    created_by_ai: actor.is_ai(),
                },
                &*self.clock,
            )
            .map_err(|err| TaskServiceError::validation(err.to_string()))?;

            match self.tasks.store(&task).await {
                Ok(()) => break Ok(task),
                Err(TaskRepositoryError::SiblingPositionTaken { .. })
                    if attempt < MAX_POSITION_ATTEMPTS => {}
                Err(err) => break Err(task_storage_error(err)),
            }
        }
    }

    /// Lists one page of the effective project's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when a human actor omits
    /// the project id and [`TaskServiceError::ProjectNotFound`] when the
    /// effective project is missing or not owned by the caller.
    pub async fn get_tasks(
        &self,
        request: ListTasksRequest,
        actor: Actor,
    ) -> TaskServiceResult<TaskListing> {
        let project_id = self
            .effective_project(
                actor,
                request.project_id,
                "Project ID is required for user-based queries.",
            )
            .await?;
        self.tasks
            .list(project_id, &request.filters, &request.page)
            .await
            .map_err(task_storage_error)
    }

    /// Fetches a single task visible to the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for missing tasks and
    /// for tasks outside the actor's reach.
    pub async fn get_task(&self, task_id: TaskId, actor: Actor) -> TaskServiceResult<Task> {
        let task = self.find_task(task_id).await?;
        self.ensure_task_visible(actor, &task).await?;
        Ok(task)
    }

    /// Lists a task's comments in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for missing tasks and
    /// for tasks outside the actor's reach.
    pub async fn get_task_comments(
        &self,
        task_id: TaskId,
        actor: Actor,
    ) -> TaskServiceResult<Vec<TaskComment>> {
        let task = self.find_task(task_id).await?;
        self.ensure_task_visible(actor, &task).await?;
        self.tasks
            .comments_for(task_id)
            .await
            .map_err(task_storage_error)
    }

    /// Applies a partial update to a task.
    ///
    /// Humans may set every field of tasks in their own projects. The AI
    /// agent may only touch title and description of tasks in its bound
    /// project; status and delegation patches are rejected before any
    /// storage call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for an empty patch,
    /// [`TaskServiceError::Authorization`] for locked fields or foreign
    /// owners, and [`TaskServiceError::TaskNotFound`] when no matching
    /// task is visible.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
        actor: Actor,
    ) -> TaskServiceResult<Task> {
        if patch.is_empty() {
            return Err(TaskServiceError::validation(
                "Update payload must not be empty.",
            ));
        }
        if let Some(title) = patch.title() {
            if title.trim().is_empty() {
                return Err(TaskServiceError::validation("Title is required."));
            }
        }
        if let Access::Denied(reason) = access::patch_access(actor, &patch) {
            return Err(TaskServiceError::authorization(reason.message()));
        }

        match actor {
            Actor::Human { .. } => {
                let task = self.find_task(task_id).await?;
                let project = self.find_task_project(task.project_id()).await?;
                if let Access::Denied(reason) = access::project_access(actor, &project) {
                    return Err(TaskServiceError::authorization(reason.message()));
                }
                self.tasks
                    .update(task_id, &patch, None)
                    .await
                    .map_err(task_storage_error)
            }
            Actor::AiAgent { project_id } => self
                .tasks
                .update(task_id, &patch, Some(project_id))
                .await
                .map_err(task_storage_error),
        }
    }

    /// Records an AI proposal to finish or cancel a delegated task.
    ///
    /// A `Done` proposal parks the task as `DonePendingAcceptance`, a
    /// `Canceled` proposal as `CanceledPendingConfirmation`; the proposal
    /// comment is stored atomically with the status change. Eligibility
    /// depends only on delegation, never on the current status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Authorization`] for human callers and
    /// undelegated tasks, [`TaskServiceError::TaskNotFound`] outside the
    /// agent's bound project, [`TaskServiceError::Validation`] for an
    /// empty comment, and [`TaskServiceError::InvalidState`] for statuses
    /// other than `Done` and `Canceled`.
    pub async fn propose_task_status(
        &self,
        task_id: TaskId,
        request: ProposeStatusRequest,
        actor: Actor,
    ) -> TaskServiceResult<Task> {
        let Actor::AiAgent { project_id } = actor else {
            return Err(TaskServiceError::authorization(
                "Only the AI agent may propose status changes.",
            ));
        };
        if request.comment.trim().is_empty() {
            return Err(TaskServiceError::validation("Comment is required."));
        }

        let task = self.find_task(task_id).await?;
        if task.project_id() != project_id {
            return Err(TaskServiceError::TaskNotFound);
        }
        if !task.is_delegated() {
            return Err(TaskServiceError::authorization(
                "AI can only propose status changes for delegated tasks.",
            ));
        }
        let pending = request.proposed_status.as_pending_proposal().ok_or_else(|| {
            TaskServiceError::invalid_state(
                "Invalid status transition proposed. AI can only propose 'Done' (2) or 'Canceled' (3).",
            )
        })?;

        self.tasks
            .propose_status(task_id, pending, request.comment.trim())
            .await
            .map_err(task_storage_error)
    }

    /// Accepts a pending proposal, resolving it to its terminal status
    /// (4→2, 5→3).
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Authorization`] for AI callers,
    /// [`TaskServiceError::TaskNotFound`] for missing tasks and foreign
    /// owners alike, and [`TaskServiceError::InvalidState`] when the task
    /// is not awaiting a decision.
    pub async fn accept_status_proposal(
        &self,
        task_id: TaskId,
        actor: Actor,
    ) -> TaskServiceResult<Task> {
        let task = self.owned_pending_target(task_id, actor).await?;
        let next = task
            .status()
            .accepted()
            .ok_or_else(|| TaskServiceError::invalid_state("This task is not awaiting acceptance."))?;
        self.tasks
            .set_status(task_id, next)
            .await
            .map_err(task_storage_error)
    }

    /// Rejects a pending proposal: the task reverts to a non-pending
    /// status and the rejection comment is recorded atomically with the
    /// status change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Authorization`] for AI callers,
    /// [`TaskServiceError::Validation`] for an empty comment,
    /// [`TaskServiceError::TaskNotFound`] for missing tasks and foreign
    /// owners alike, and [`TaskServiceError::InvalidState`] when the task
    /// is not awaiting a decision.
    pub async fn reject_proposal(
        &self,
        task_id: TaskId,
        comment: impl Into<String> + Send,
        actor: Actor,
    ) -> TaskServiceResult<Task> {
        let body = comment.into();
        if body.trim().is_empty() {
            return Err(TaskServiceError::validation("Comment is required."));
        }
        let task = self.owned_pending_target(task_id, actor).await?;
        if !task.status().is_pending() {
            return Err(TaskServiceError::invalid_state(
                "This task is not awaiting acceptance and its proposal cannot be rejected.",
            ));
        }
        self.tasks
            .reject_proposal(task_id, body.trim())
            .await
            .map_err(task_storage_error)
    }

    /// Atomically reassigns sibling positions for a batch of the user's
    /// tasks.
    ///
    /// Shape problems are rejected before any lookup; every task's
    /// ownership is validated before any change is applied; the store
    /// applies the batch all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Authorization`] for AI callers,
    /// [`TaskServiceError::Validation`] for malformed batches, and
    /// [`TaskServiceError::TaskNotFound`] when any referenced task is
    /// missing or foreign.
    pub async fn reorder_tasks(
        &self,
        request: ReorderTasksRequest,
        actor: Actor,
    ) -> TaskServiceResult<()> {
        let Actor::Human { .. } = actor else {
            return Err(TaskServiceError::authorization(
                "Only a signed-in user may reorder tasks.",
            ));
        };
        request.validate_shape()?;

        let mut targets = Vec::with_capacity(request.assignments().len());
        for assignment in request.assignments() {
            let task = self.find_task(assignment.task_id).await?;
            targets.push((*assignment, task));
        }

        let mut verified: HashSet<ProjectId> = HashSet::new();
        for (_, task) in &targets {
            if verified.contains(&task.project_id()) {
                continue;
            }
            let project = self.find_task_project(task.project_id()).await?;
            if matches!(access::project_access(actor, &project), Access::Denied(_)) {
                return Err(TaskServiceError::TaskNotFound);
            }
            verified.insert(task.project_id());
        }

        let mut scoped_positions: HashMap<(ProjectId, Option<TaskId>), HashSet<i32>> =
            HashMap::new();
        for (assignment, task) in &targets {
            let scope = (task.project_id(), task.parent_id());
            if !scoped_positions
                .entry(scope)
                .or_default()
                .insert(assignment.position)
            {
                return Err(TaskServiceError::validation(
                    "Duplicate position within a sibling group.",
                ));
            }
        }

        self.tasks
            .reorder(request.assignments())
            .await
            .map_err(task_storage_error)
    }

    /// Resolves the effective project for an operation and verifies the
    /// actor may act on it.
    ///
    /// Human actors must name a project and own it; the AI agent's bound
    /// project always wins. Missing projects and foreign owners are folded
    /// into one not-found signal.
    async fn effective_project(
        &self,
        actor: Actor,
        requested: Option<ProjectId>,
        missing_message: &str,
    ) -> TaskServiceResult<ProjectId> {
        let project_id = match actor {
            Actor::Human { .. } => {
                requested.ok_or_else(|| TaskServiceError::validation(missing_message))?
            }
            Actor::AiAgent { project_id } => project_id,
        };
        let project = self.find_project(project_id).await?;
        match access::project_access(actor, &project) {
            Access::Granted => Ok(project_id),
            Access::Denied(_) => Err(TaskServiceError::ProjectNotFound),
        }
    }

    /// Validates a prospective parent: it must exist, live in the
    /// effective project, and — for the AI agent — be delegated.
    async fn check_parent(
        &self,
        parent_id: TaskId,
        project_id: ProjectId,
        actor: Actor,
    ) -> TaskServiceResult<()> {
        let parent = self.find_task(parent_id).await?;
        if parent.project_id() != project_id {
            return Err(TaskServiceError::authorization(
                "Parent task does not belong to the specified project.",
            ));
        }
        if actor.is_ai() && !parent.is_delegated() {
            return Err(TaskServiceError::authorization(
                "AI can only create sub-tasks for delegated tasks.",
            ));
        }
        Ok(())
    }

    /// Fetches the accept/reject target, folding nonexistence and foreign
    /// ownership into one not-found signal and rejecting AI callers.
    async fn owned_pending_target(&self, task_id: TaskId, actor: Actor) -> TaskServiceResult<Task> {
        let Actor::Human { .. } = actor else {
            return Err(TaskServiceError::authorization(
                "Only the project owner may accept or reject proposals.",
            ));
        };
        let task = self.find_task(task_id).await?;
        let project = self.find_task_project(task.project_id()).await?;
        match access::project_access(actor, &project) {
            Access::Granted => Ok(task),
            Access::Denied(_) => Err(TaskServiceError::TaskNotFound),
        }
    }

    async fn ensure_task_visible(&self, actor: Actor, task: &Task) -> TaskServiceResult<()> {
        match actor {
            Actor::AiAgent { project_id } => {
                if task.project_id() == project_id {
                    Ok(())
                } else {
                    Err(TaskServiceError::TaskNotFound)
                }
            }
            Actor::Human { .. } => {
                let project = self.find_task_project(task.project_id()).await?;
                match access::project_access(actor, &project) {
                    Access::Granted => Ok(()),
                    Access::Denied(_) => Err(TaskServiceError::TaskNotFound),
                }
            }
        }
    }

    async fn find_task(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await
            .map_err(task_storage_error)?
            .ok_or(TaskServiceError::TaskNotFound)
    }

    async fn find_project(&self, project_id: ProjectId) -> TaskServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await
            .map_err(project_storage_error)?
            .ok_or(TaskServiceError::ProjectNotFound)
    }

    /// Looks up the project behind a task the caller addressed by task id.
    ///
    /// A missing project reads as a missing task here, so the error the
    /// caller sees matches the resource they asked about.
    async fn find_task_project(&self, project_id: ProjectId) -> TaskServiceResult<Project> {
        self.find_project(project_id).await.map_err(|err| match err {
            TaskServiceError::ProjectNotFound => TaskServiceError::TaskNotFound,
            other => other,
        })
    }
}
