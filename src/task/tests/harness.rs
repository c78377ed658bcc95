//! Shared in-memory harness for task service tests.

use std::sync::Arc;

use crate::identity::domain::Actor;
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, UserId},
    ports::ProjectRepository,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId, TaskPatch},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use mockable::DefaultClock;

pub type TestService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryProjectRepository, DefaultClock>;

/// In-memory service wired to one seeded project and its owner.
pub struct Harness {
    pub service: TestService,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub owner: UserId,
    pub project: Project,
}

/// Builds a service over fresh in-memory repositories with one project.
pub async fn harness() -> Harness {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let owner = UserId::new();
    let project = Project::create(owner, "Orchard", None, &DefaultClock)
        .expect("project creation should succeed");
    projects
        .store(&project)
        .await
        .expect("project store should succeed");

    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&projects),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        tasks,
        projects,
        owner,
        project,
    }
}

impl Harness {
    /// The seeded project's owner as an actor.
    pub fn human(&self) -> Actor {
        Actor::human(self.owner)
    }

    /// The AI agent bound to the seeded project.
    pub fn ai(&self) -> Actor {
        Actor::ai_agent(self.project.id())
    }

    /// Creates a top-level task in the seeded project as its owner.
    pub async fn create_task(&self, title: &str) -> Task {
        self.service
            .create_task(
                CreateTaskRequest::new(title).with_project(self.project.id()),
                self.human(),
            )
            .await
            .expect("task creation should succeed")
    }

    /// Creates a task and delegates it to the AI agent.
    pub async fn delegated_task(&self, title: &str) -> Task {
        let task = self.create_task(title).await;
        self.delegate(task.id()).await
    }

    /// Delegates an existing task as the owner.
    pub async fn delegate(&self, task_id: TaskId) -> Task {
        self.service
            .update_task(task_id, TaskPatch::new().with_delegated(true), self.human())
            .await
            .expect("delegation should succeed")
    }

    /// Seeds a second project owned by a different user.
    pub async fn foreign_project(&self) -> Project {
        let project = Project::create(UserId::new(), "Elsewhere", None, &DefaultClock)
            .expect("project creation should succeed");
        self.projects
            .store(&project)
            .await
            .expect("project store should succeed");
        project
    }
}
