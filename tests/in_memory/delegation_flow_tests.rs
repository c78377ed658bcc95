//! End-to-end delegation protocol flows.

use super::helpers::app;
use gaffer::task::{
    domain::{CommentAuthor, TaskStatus},
    services::{ProposeStatusRequest, TaskServiceError},
};

#[tokio::test(flavor = "multi_thread")]
async fn proposal_acceptance_round_trip() {
    let app = app().await;
    let task = app.delegated_task("Water the seedlings").await;
    assert_eq!(task.status(), TaskStatus::ToDo);

    let proposed = app
        .tasks
        .propose_task_status(
            task.id(),
            ProposeStatusRequest::new(TaskStatus::Done, "all rows watered"),
            app.ai(),
        )
        .await
        .expect("proposal should succeed");
    assert_eq!(proposed.status(), TaskStatus::DonePendingAcceptance);

    let comments = app
        .tasks
        .get_task_comments(task.id(), app.human())
        .await
        .expect("comment listing should succeed");
    assert_eq!(comments.len(), 1);
    assert!(
        comments
            .iter()
            .all(|comment| comment.author() == CommentAuthor::AiAgent)
    );

    let accepted = app
        .tasks
        .accept_status_proposal(task.id(), app.human())
        .await
        .expect("acceptance should succeed");
    assert_eq!(accepted.status(), TaskStatus::Done);
}

#[tokio::test(flavor = "multi_thread")]
async fn proposal_rejection_round_trip() {
    let app = app().await;
    let task = app.delegated_task("Prune the orchard").await;

    app.tasks
        .propose_task_status(
            task.id(),
            ProposeStatusRequest::new(TaskStatus::Canceled, "trees look fine"),
            app.ai(),
        )
        .await
        .expect("proposal should succeed");

    let rejected = app
        .tasks
        .reject_proposal(task.id(), "not valid", app.human())
        .await
        .expect("rejection should succeed");
    assert!(!rejected.status().is_pending());

    let comments = app
        .tasks
        .get_task_comments(task.id(), app.human())
        .await
        .expect("comment listing should succeed");
    assert_eq!(comments.len(), 2);
    let rationale = comments.last().expect("rejection comment should exist");
    assert_eq!(rationale.author(), CommentAuthor::Human);
    assert_eq!(rationale.body(), "not valid");

    let retry = app
        .tasks
        .reject_proposal(task.id(), "still not valid", app.human())
        .await;
    assert!(matches!(retry, Err(TaskServiceError::InvalidState(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn undelegated_work_is_closed_to_the_agent() {
    let app = app().await;
    let task = app.create_task("Owner-only errand").await;

    let result = app
        .tasks
        .propose_task_status(
            task.id(),
            ProposeStatusRequest::new(TaskStatus::Done, "done it anyway"),
            app.ai(),
        )
        .await;
    assert!(matches!(result, Err(TaskServiceError::Authorization(_))));
}
