//! Domain model for project ownership and API-key management.
//!
//! Projects are the unit of ownership: every task belongs to a project and
//! every project belongs to exactly one user. The per-project API key is
//! the credential that binds the AI agent to a single project.

mod error;
mod ids;
mod project;

pub use error::ProjectDomainError;
pub use ids::{ApiKey, ProjectId, UserId};
pub use project::{PersistedProjectData, Project};
