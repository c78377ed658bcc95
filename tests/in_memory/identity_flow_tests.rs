//! End-to-end identity flows: API-key resolution and rotation.

use super::helpers::app;
use gaffer::identity::domain::{Actor, Credentials, IdentityError};
use gaffer::identity::ports::ActorResolver;
use gaffer::task::services::CreateTaskRequest;

#[tokio::test(flavor = "multi_thread")]
async fn the_api_key_binds_the_agent_to_its_project() {
    let app = app().await;

    let actor = app
        .resolver
        .resolve(Credentials::ApiKey(app.project.api_key().into_inner()))
        .await
        .expect("resolution should succeed");
    assert_eq!(actor, Actor::ai_agent(app.project.id()));

    let task = app
        .tasks
        .create_task(CreateTaskRequest::new("Agent groundwork"), actor)
        .await
        .expect("AI creation should succeed");
    assert_eq!(task.project_id(), app.project.id());
    assert!(task.created_by_ai());
}

#[tokio::test(flavor = "multi_thread")]
async fn key_rotation_locks_out_the_old_credential() {
    let app = app().await;
    let old_key = app.project.api_key();

    let new_key = app
        .projects
        .regenerate_api_key(app.project.id(), app.owner)
        .await
        .expect("rotation should succeed");

    let stale = app
        .resolver
        .resolve(Credentials::ApiKey(old_key.into_inner()))
        .await;
    assert!(matches!(stale, Err(IdentityError::AuthenticationRequired)));

    let fresh = app
        .resolver
        .resolve(Credentials::ApiKey(new_key.into_inner()))
        .await
        .expect("resolution should succeed");
    assert_eq!(fresh, Actor::ai_agent(app.project.id()));
}
