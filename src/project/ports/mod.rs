//! Port contracts for project persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by project services
//! and by the identity resolver.

pub mod repository;

pub use repository::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
