//! Credential resolution against project records.

use crate::identity::{
    domain::{Actor, Credentials, IdentityError},
    ports::ActorResolver,
};
use crate::project::{
    domain::ApiKey,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves caller credentials to an [`Actor`].
///
/// API keys resolve through [`ProjectRepository::find_by_api_key`], so a
/// rotated-away key stops authenticating the moment the rotation is
/// persisted. Session credentials are taken at face value; verifying them
/// is the session layer's concern.
#[derive(Clone)]
pub struct CredentialResolver<P>
where
    P: ProjectRepository,
{
    projects: Arc<P>,
}

impl<P> CredentialResolver<P>
where
    P: ProjectRepository,
{
    /// Creates a resolver backed by the given project repository.
    #[must_use]
    pub const fn new(projects: Arc<P>) -> Self {
        Self { projects }
    }
}

#[async_trait]
impl<P> ActorResolver for CredentialResolver<P>
where
    P: ProjectRepository,
{
    async fn resolve(&self, credentials: Credentials) -> Result<Actor, IdentityError> {
        match credentials {
            Credentials::Session(user_id) => Ok(Actor::human(user_id)),
            Credentials::ApiKey(raw_key) => {
                let project = self
                    .projects
                    .find_by_api_key(ApiKey::from_uuid(raw_key))
                    .await
                    .map_err(lookup_error)?;
                project
                    .map(|found| Actor::ai_agent(found.id()))
                    .ok_or(IdentityError::AuthenticationRequired)
            }
        }
    }
}

fn lookup_error(err: ProjectRepositoryError) -> IdentityError {
    tracing::error!(error = %err, "api key lookup failure");
    IdentityError::Persistence(err)
}
