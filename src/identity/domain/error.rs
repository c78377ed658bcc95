//! Error types for identity resolution.

use crate::project::ports::ProjectRepositoryError;
use thiserror::Error;

/// Errors returned while resolving caller credentials to an actor.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No identity could be established for the caller.
    ///
    /// Raised for absent credentials and for API keys that resolve to no
    /// project; the two cases are indistinguishable to the caller so key
    /// existence is never disclosed. Request adapters map this to 401.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Project storage failed while resolving an API key.
    #[error("identity lookup failed")]
    Persistence(#[source] ProjectRepositoryError),
}
