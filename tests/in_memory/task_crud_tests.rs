//! End-to-end creation, listing, and update flows.

use super::helpers::app;
use eyre::ensure;
use gaffer::task::{
    domain::{Page, TaskFilters, TaskPatch, TaskStatus},
    services::{CreateTaskRequest, ListTasksRequest},
};

#[tokio::test(flavor = "multi_thread")]
async fn owner_builds_an_ordered_backlog() -> Result<(), eyre::Report> {
    let app = app().await;

    let first = app.create_task("Prepare beds").await;
    let second = app.create_task("Order seeds").await;
    ensure!(first.position() == 1, "first task should take position 1");
    ensure!(second.position() == 2, "second task should take position 2");

    let listing = app
        .tasks
        .get_tasks(
            ListTasksRequest::new(Page::new(1, 10)?).with_project(app.project.id()),
            app.human(),
        )
        .await?;
    ensure!(listing.total == 2, "both tasks should be counted");
    let positions: Vec<i32> = listing.tasks.iter().map(|task| task.position()).collect();
    ensure!(positions == vec![1, 2], "listing should be position-ordered");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn sub_tasks_stay_out_of_the_top_level_listing() {
    let app = app().await;
    let parent = app.create_task("Parent").await;
    app.tasks
        .create_task(
            CreateTaskRequest::new("Child")
                .with_project(app.project.id())
                .with_parent(parent.id()),
            app.human(),
        )
        .await
        .expect("child creation should succeed");

    let top_level = app
        .tasks
        .get_tasks(
            ListTasksRequest::new(Page::new(1, 10).expect("valid page"))
                .with_project(app.project.id()),
            app.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(top_level.total, 1);

    let children = app
        .tasks
        .get_tasks(
            ListTasksRequest::new(Page::new(1, 10).expect("valid page"))
                .with_project(app.project.id())
                .with_filters(TaskFilters::new().with_parent(parent.id())),
            app.human(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(children.total, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn owner_edits_ripple_through_lookup() {
    let app = app().await;
    let task = app.create_task("Draft plan").await;

    app.tasks
        .update_task(
            task.id(),
            TaskPatch::new()
                .with_title("Final plan")
                .with_status(TaskStatus::Done),
            app.human(),
        )
        .await
        .expect("update should succeed");

    let fetched = app
        .tasks
        .get_task(task.id(), app.human())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.title(), "Final plan");
    assert_eq!(fetched.status(), TaskStatus::Done);
}
