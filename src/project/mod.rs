//! Project ownership and API-key management.
//!
//! Projects are the ownership boundary of the system: every task belongs to
//! a project, every project to exactly one user, and the per-project API
//! key is the credential that binds the AI agent to a single project. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
