//! Project administration service: ownership-scoped CRUD and API-key
//! rotation.

use crate::project::{
    domain::{ApiKey, Project, ProjectDomainError, ProjectId, UserId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for updating a project's details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: String,
    description: Option<String>,
}

impl UpdateProjectRequest {
    /// Creates a request with the replacement project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for project administration.
///
/// Ownership mismatches and nonexistent projects are both reported as
/// [`ProjectAdminError::NotFound`] so callers cannot probe for projects
/// they do not own. Request adapters map the variants to 400, 404, and 500
/// respectively.
#[derive(Debug, Error)]
pub enum ProjectAdminError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// The project does not exist or is owned by someone else.
    #[error("project not found")]
    NotFound,
    /// Project storage failed unexpectedly.
    #[error("project storage failed")]
    Persistence(#[source] ProjectRepositoryError),
}

/// Result type for project administration operations.
pub type ProjectAdminResult<T> = Result<T, ProjectAdminError>;

/// Project administration orchestration service.
#[derive(Clone)]
pub struct ProjectAdminService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<P>,
    clock: Arc<C>,
}

impl<P, C> ProjectAdminService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project administration service.
    #[must_use]
    pub const fn new(repository: Arc<P>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists the user's projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectAdminError::Persistence`] when the lookup fails.
    pub async fn list_projects(&self, user_id: UserId) -> ProjectAdminResult<Vec<Project>> {
        self.repository
            .list_for_user(user_id)
            .await
            .map_err(storage_error)
    }

    /// Fetches one of the user's projects.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectAdminError::NotFound`] when the project does not
    /// exist or is not owned by `user_id`.
    pub async fn get_project(
        &self,
        id: ProjectId,
        user_id: UserId,
    ) -> ProjectAdminResult<Project> {
        self.owned_project(id, user_id).await
    }

    /// Creates a project owned by `user_id` with a freshly generated API
    /// key.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectAdminError::Domain`] when validation fails or
    /// [`ProjectAdminError::Persistence`] when the store rejects the insert.
    pub async fn create_project(
        &self,
        user_id: UserId,
        request: CreateProjectRequest,
    ) -> ProjectAdminResult<Project> {
        let project = Project::create(user_id, request.name, request.description, &*self.clock)?;
        self.repository
            .store(&project)
            .await
            .map_err(storage_error)?;
        Ok(project)
    }

    /// Replaces a project's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectAdminError::NotFound`] for missing or foreign
    /// projects and [`ProjectAdminError::Domain`] when validation fails.
    pub async fn update_project(
        &self,
        id: ProjectId,
        user_id: UserId,
        request: UpdateProjectRequest,
    ) -> ProjectAdminResult<Project> {
        let mut project = self.owned_project(id, user_id).await?;
        project.update_details(request.name, request.description)?;
        self.repository
            .update(&project)
            .await
            .map_err(storage_error)?;
        Ok(project)
    }

    /// Deletes one of the user's projects. Tasks cascade inside the store.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectAdminError::NotFound`] for missing or foreign
    /// projects.
    pub async fn delete_project(&self, id: ProjectId, user_id: UserId) -> ProjectAdminResult<()> {
        self.owned_project(id, user_id).await?;
        self.repository.delete(id).await.map_err(storage_error)
    }

    /// Rotates the project's API key and returns the new value.
    ///
    /// The prior key stops authenticating as soon as this call returns.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectAdminError::NotFound`] for missing or foreign
    /// projects.
    pub async fn regenerate_api_key(
        &self,
        id: ProjectId,
        user_id: UserId,
    ) -> ProjectAdminResult<ApiKey> {
        let mut project = self.owned_project(id, user_id).await?;
        let api_key = project.rotate_api_key();
        self.repository
            .update(&project)
            .await
            .map_err(storage_error)?;
        Ok(api_key)
    }

    async fn owned_project(&self, id: ProjectId, user_id: UserId) -> ProjectAdminResult<Project> {
        let project = self
            .repository
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(ProjectAdminError::NotFound)?;
        if project.user_id() != user_id {
            return Err(ProjectAdminError::NotFound);
        }
        Ok(project)
    }
}

fn storage_error(err: ProjectRepositoryError) -> ProjectAdminError {
    match err {
        ProjectRepositoryError::NotFound(_) => ProjectAdminError::NotFound,
        other => {
            tracing::error!(error = %other, "project storage failure");
            ProjectAdminError::Persistence(other)
        }
    }
}
