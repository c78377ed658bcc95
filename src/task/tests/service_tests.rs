//! Service tests for creation, listing, and updates.

use super::harness::harness;
use crate::identity::domain::Actor;
use crate::project::domain::{ProjectId, UserId};
use crate::task::{
    domain::{NewTaskData, Page, Task, TaskFilters, TaskPatch, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
    services::{CreateTaskRequest, ListTasksRequest, TaskServiceError},
};
use mockable::DefaultClock;

fn page(number: u32, limit: u32) -> Page {
    Page::new(number, limit).expect("page should be valid")
}

#[tokio::test(flavor = "multi_thread")]
async fn top_level_positions_allocate_monotonically() {
    let fixture = harness().await;

    let first = fixture.create_task("Task A").await;
    let second = fixture.create_task("Task B").await;

    assert_eq!(first.position(), 1);
    assert_eq!(second.position(), 2);
    assert_eq!(first.status(), TaskStatus::ToDo);
    assert!(!first.created_by_ai());
}

#[tokio::test(flavor = "multi_thread")]
async fn the_store_rejects_sibling_position_collisions() {
    let fixture = harness().await;
    let first = fixture.create_task("First").await;

    let racer = Task::create(
        NewTaskData {
            project_id: fixture.project.id(),
            parent_id: None,
            title: "Racer".to_owned(),
            description: None,
            position: first.position(),
            created_by_ai: false,
        },
        &DefaultClock,
    )
    .expect("creation should succeed");

    let result = fixture.tasks.store(&racer).await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::SiblingPositionTaken { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn child_scope_positions_are_independent() {
    let fixture = harness().await;
    let parent = fixture.create_task("Parent").await;

    let child = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Child")
                .with_project(fixture.project.id())
                .with_parent(parent.id()),
            fixture.human(),
        )
        .await
        .expect("child creation should succeed");

    assert_eq!(child.position(), 1);
    assert_eq!(child.parent_id(), Some(parent.id()));
}

#[tokio::test(flavor = "multi_thread")]
async fn human_creation_requires_a_project_id() {
    let fixture = harness().await;
    let result = fixture
        .service
        .create_task(CreateTaskRequest::new("Orphan"), fixture.human())
        .await;
    assert!(matches!(result, Err(TaskServiceError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_titles_are_rejected_before_storage() {
    let fixture = harness().await;
    let result = fixture
        .service
        .create_task(
            CreateTaskRequest::new("   ").with_project(fixture.project.id()),
            fixture.human(),
        )
        .await;
    assert!(matches!(result, Err(TaskServiceError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_and_foreign_projects_read_as_not_found() {
    let fixture = harness().await;

    let unknown = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Ghost").with_project(ProjectId::new()),
            fixture.human(),
        )
        .await;
    assert!(matches!(unknown, Err(TaskServiceError::ProjectNotFound)));

    let stranger = Actor::human(UserId::new());
    let foreign = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Intruder").with_project(fixture.project.id()),
            stranger,
        )
        .await;
    assert!(matches!(foreign, Err(TaskServiceError::ProjectNotFound)));
}

#[tokio::test(flavor = "multi_thread")]
async fn parents_must_exist_and_share_the_project() {
    let fixture = harness().await;

    let missing = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Child")
                .with_project(fixture.project.id())
                .with_parent(crate::task::domain::TaskId::new()),
            fixture.human(),
        )
        .await;
    assert!(matches!(missing, Err(TaskServiceError::TaskNotFound)));

    let elsewhere = fixture.foreign_project().await;
    let foreign_parent = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Remote parent").with_project(elsewhere.id()),
            Actor::human(elsewhere.user_id()),
        )
        .await
        .expect("foreign task creation should succeed");

    let cross_project = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Child")
                .with_project(fixture.project.id())
                .with_parent(foreign_parent.id()),
            fixture.human(),
        )
        .await;
    assert!(matches!(
        cross_project,
        Err(TaskServiceError::Authorization(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_creation_binds_to_its_own_project() {
    let fixture = harness().await;
    let elsewhere = fixture.foreign_project().await;

    // The client-supplied project id is ignored for the AI agent.
    let task = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Agent idea").with_project(elsewhere.id()),
            fixture.ai(),
        )
        .await
        .expect("AI creation should succeed");

    assert_eq!(task.project_id(), fixture.project.id());
    assert!(task.created_by_ai());
    assert_eq!(task.status(), TaskStatus::ToDo);
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_subtasks_require_a_delegated_parent() {
    let fixture = harness().await;
    let parent = fixture.create_task("Undelegated parent").await;

    let denied = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Sub-task").with_parent(parent.id()),
            fixture.ai(),
        )
        .await;
    assert!(matches!(denied, Err(TaskServiceError::Authorization(_))));

    fixture.delegate(parent.id()).await;
    let granted = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Sub-task").with_parent(parent.id()),
            fixture.ai(),
        )
        .await
        .expect("delegated parent should accept AI sub-tasks");
    assert_eq!(granted.parent_id(), Some(parent.id()));
    assert!(granted.created_by_ai());
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_pages_through_top_level_tasks() {
    let fixture = harness().await;
    for index in 1..=3 {
        fixture.create_task(&format!("Task {index}")).await;
    }

    let first_page = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 2)).with_project(fixture.project.id()),
            fixture.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(first_page.tasks.len(), 2);
    assert_eq!(first_page.total, 3);
    assert_eq!(page(1, 2).total_pages(first_page.total), 2);

    let second_page = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(2, 2)).with_project(fixture.project.id()),
            fixture.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(second_page.tasks.len(), 1);
    assert_eq!(second_page.total, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_never_spans_parent_and_children() {
    let fixture = harness().await;
    let parent = fixture.create_task("Parent").await;
    fixture
        .service
        .create_task(
            CreateTaskRequest::new("Child")
                .with_project(fixture.project.id())
                .with_parent(parent.id()),
            fixture.human(),
        )
        .await
        .expect("child creation should succeed");

    let top_level = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 10)).with_project(fixture.project.id()),
            fixture.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(top_level.total, 1);
    assert!(
        top_level
            .tasks
            .iter()
            .all(|task| task.parent_id().is_none())
    );

    let children = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 10))
                .with_project(fixture.project.id())
                .with_filters(TaskFilters::new().with_parent(parent.id())),
            fixture.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(children.total, 1);
    assert!(
        children
            .tasks
            .iter()
            .all(|task| task.parent_id() == Some(parent.id()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_by_status_and_delegation() {
    let fixture = harness().await;
    let plain = fixture.create_task("Plain").await;
    let delegated = fixture.delegated_task("Delegated").await;
    fixture
        .service
        .update_task(
            plain.id(),
            TaskPatch::new().with_status(TaskStatus::Done),
            fixture.human(),
        )
        .await
        .expect("status update should succeed");

    let done = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 10))
                .with_project(fixture.project.id())
                .with_filters(TaskFilters::new().with_status(TaskStatus::Done)),
            fixture.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(done.total, 1);
    assert_eq!(
        done.tasks.first().map(crate::task::domain::Task::id),
        Some(plain.id())
    );

    let delegated_only = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 10))
                .with_project(fixture.project.id())
                .with_filters(TaskFilters::new().with_delegated(true)),
            fixture.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(delegated_only.total, 1);
    assert_eq!(
        delegated_only
            .tasks
            .first()
            .map(crate::task::domain::Task::id),
        Some(delegated.id())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_requires_a_project_for_humans_and_ignores_it_for_ai() {
    let fixture = harness().await;
    fixture.create_task("Visible").await;
    let elsewhere = fixture.foreign_project().await;

    let missing = fixture
        .service
        .get_tasks(ListTasksRequest::new(page(1, 10)), fixture.human())
        .await;
    assert!(matches!(missing, Err(TaskServiceError::Validation(_))));

    // The AI agent's bound project wins over any client-supplied filter.
    let listing = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 10)).with_project(elsewhere.id()),
            fixture.ai(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(listing.total, 1);
    assert!(
        listing
            .tasks
            .iter()
            .all(|task| task.project_id() == fixture.project.id())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn foreign_listing_reads_as_project_not_found() {
    let fixture = harness().await;
    let elsewhere = fixture.foreign_project().await;

    let result = fixture
        .service
        .get_tasks(
            ListTasksRequest::new(page(1, 10)).with_project(elsewhere.id()),
            fixture.human(),
        )
        .await;
    assert!(matches!(result, Err(TaskServiceError::ProjectNotFound)));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_task_hides_tasks_outside_the_actors_reach() {
    let fixture = harness().await;
    let task = fixture.create_task("Mine").await;

    let fetched = fixture
        .service
        .get_task(task.id(), fixture.human())
        .await
        .expect("owner lookup should succeed");
    assert_eq!(fetched.id(), task.id());

    let stranger = fixture
        .service
        .get_task(task.id(), Actor::human(UserId::new()))
        .await;
    assert!(matches!(stranger, Err(TaskServiceError::TaskNotFound)));

    let elsewhere = fixture.foreign_project().await;
    let foreign_ai = fixture
        .service
        .get_task(task.id(), Actor::ai_agent(elsewhere.id()))
        .await;
    assert!(matches!(foreign_ai, Err(TaskServiceError::TaskNotFound)));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_title_and_clears_description() {
    let fixture = harness().await;
    let task = fixture
        .service
        .create_task(
            CreateTaskRequest::new("Draft")
                .with_project(fixture.project.id())
                .with_description("scratch notes"),
            fixture.human(),
        )
        .await
        .expect("creation should succeed");

    let updated = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new()
                .with_title("Final")
                .with_description(None),
            fixture.human(),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.title(), "Final");
    assert!(updated.description().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_patches_are_rejected() {
    let fixture = harness().await;
    let task = fixture.create_task("Stable").await;

    let result = fixture
        .service
        .update_task(task.id(), TaskPatch::new(), fixture.human())
        .await;
    assert!(matches!(result, Err(TaskServiceError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn humans_may_set_status_and_delegation_directly() {
    let fixture = harness().await;
    let task = fixture.create_task("Flexible").await;

    let updated = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new()
                .with_status(TaskStatus::Done)
                .with_delegated(true),
            fixture.human(),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.status(), TaskStatus::Done);
    assert!(updated.is_delegated());
}

#[tokio::test(flavor = "multi_thread")]
async fn human_updates_of_foreign_tasks_are_forbidden() {
    let fixture = harness().await;
    let task = fixture.create_task("Mine").await;

    let result = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new().with_title("Hijacked"),
            Actor::human(UserId::new()),
        )
        .await;
    assert!(matches!(result, Err(TaskServiceError::Authorization(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_updates_are_scoped_to_the_bound_project() {
    let fixture = harness().await;
    let task = fixture.create_task("Shared").await;
    let elsewhere = fixture.foreign_project().await;

    let renamed = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new().with_title("Agent rename"),
            fixture.ai(),
        )
        .await
        .expect("in-project AI update should succeed");
    assert_eq!(renamed.title(), "Agent rename");

    let invisible = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new().with_title("Cross-project"),
            Actor::ai_agent(elsewhere.id()),
        )
        .await;
    assert!(matches!(invisible, Err(TaskServiceError::TaskNotFound)));
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_patches_of_protected_fields_never_reach_storage() {
    let fixture = harness().await;
    let task = fixture.delegated_task("Delegated").await;

    let status_patch = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new().with_status(TaskStatus::Done),
            fixture.ai(),
        )
        .await;
    assert!(matches!(
        status_patch,
        Err(TaskServiceError::Authorization(_))
    ));

    let delegation_patch = fixture
        .service
        .update_task(
            task.id(),
            TaskPatch::new().with_delegated(false),
            fixture.ai(),
        )
        .await;
    assert!(matches!(
        delegation_patch,
        Err(TaskServiceError::Authorization(_))
    ));

    // The row is untouched.
    let current = fixture
        .service
        .get_task(task.id(), fixture.human())
        .await
        .expect("lookup should succeed");
    assert_eq!(current.status(), TaskStatus::ToDo);
    assert!(current.is_delegated());
}
