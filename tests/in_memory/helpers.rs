//! Shared wiring for the in-memory integration tests.

use std::sync::Arc;

use gaffer::identity::domain::Actor;
use gaffer::identity::services::CredentialResolver;
use gaffer::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, UserId},
    services::{CreateProjectRequest, ProjectAdminService},
};
use gaffer::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskPatch},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use mockable::DefaultClock;

/// Fully wired in-memory application: both services, the resolver, and
/// one seeded project.
pub struct App {
    pub projects: ProjectAdminService<InMemoryProjectRepository, DefaultClock>,
    pub tasks: TaskLifecycleService<InMemoryTaskRepository, InMemoryProjectRepository, DefaultClock>,
    pub resolver: CredentialResolver<InMemoryProjectRepository>,
    pub owner: UserId,
    pub project: Project,
}

impl App {
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
        self.tasks
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
        self.tasks
            .update_task(task.id(), TaskPatch::new().with_delegated(true), self.human())
            .await
            .expect("delegation should succeed")
    }
}

/// Builds the wired application with one project named `Orchard`.
pub async fn app() -> App {
    let project_repository = Arc::new(InMemoryProjectRepository::new());
    let task_repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);

    let projects = ProjectAdminService::new(Arc::clone(&project_repository), Arc::clone(&clock));
    let tasks = TaskLifecycleService::new(
        Arc::clone(&task_repository),
        Arc::clone(&project_repository),
        Arc::clone(&clock),
    );
    let resolver = CredentialResolver::new(Arc::clone(&project_repository));

    let owner = UserId::new();
    let project = projects
        .create_project(owner, CreateProjectRequest::new("Orchard"))
        .await
        .expect("project creation should succeed");

    App {
        projects,
        tasks,
        resolver,
        owner,
        project,
    }
}
