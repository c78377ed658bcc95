//! Project aggregate root.

use super::{ApiKey, ProjectDomainError, ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project aggregate root.
///
/// A project has exactly one owning user and carries the secret API key
/// that authenticates the AI agent bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    user_id: UserId,
    name: String,
    description: Option<String>,
    api_key: ApiKey,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted owning user.
    pub user_id: UserId,
    /// Persisted project name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted API key.
    pub api_key: ApiKey,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `user_id` with a freshly generated
    /// API key.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] when `name` is empty
    /// after trimming.
    pub fn create(
        user_id: UserId,
        name: impl Into<String>,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        Ok(Self {
            id: ProjectId::new(),
            user_id,
            name: validated_name(name)?,
            description,
            api_key: ApiKey::generate(),
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            api_key: data.api_key,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current API key.
    #[must_use]
    pub const fn api_key(&self) -> ApiKey {
        self.api_key
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the project name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] when `name` is empty
    /// after trimming.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), ProjectDomainError> {
        self.name = validated_name(name)?;
        self.description = description;
        Ok(())
    }

    /// Rotates the API key, returning the new value.
    ///
    /// The previously issued key stops authenticating as soon as the
    /// rotated aggregate is persisted.
    pub fn rotate_api_key(&mut self) -> ApiKey {
        self.api_key = ApiKey::generate();
        self.api_key
    }
}

fn validated_name(name: impl Into<String>) -> Result<String, ProjectDomainError> {
    let raw = name.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProjectDomainError::EmptyProjectName);
    }
    Ok(trimmed.to_owned())
}
