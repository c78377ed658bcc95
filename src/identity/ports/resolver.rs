//! Resolver port handing the core an authenticated actor.

use crate::identity::domain::{Actor, Credentials, IdentityError};
use async_trait::async_trait;

/// Contract for resolving raw credentials to an [`Actor`].
///
/// The request layer depends on this port so the core services only ever
/// see a fully resolved actor, never raw credentials.
#[async_trait]
pub trait ActorResolver: Send + Sync {
    /// Resolves credentials to an actor.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AuthenticationRequired`] when the
    /// credentials establish no identity.
    async fn resolve(&self, credentials: Credentials) -> Result<Actor, IdentityError>;
}
