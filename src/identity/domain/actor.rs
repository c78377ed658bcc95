//! Authenticated caller identity.

use crate::project::domain::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller of a core operation.
///
/// Exactly one of the variants holds: a caller is either a human user or
/// the AI agent bound to one project. A caller with no resolvable identity
/// never reaches the core; the identity service fails with
/// [`super::IdentityError::AuthenticationRequired`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Actor {
    /// A human user identified by their account id.
    Human {
        /// The authenticated user's identifier.
        user_id: UserId,
    },
    /// The AI agent, bound to a single project via its API key.
    AiAgent {
        /// The project the agent's API key resolves to.
        project_id: ProjectId,
    },
}

impl Actor {
    /// Creates a human actor.
    #[must_use]
    pub const fn human(user_id: UserId) -> Self {
        Self::Human { user_id }
    }

    /// Creates an AI actor bound to `project_id`.
    #[must_use]
    pub const fn ai_agent(project_id: ProjectId) -> Self {
        Self::AiAgent { project_id }
    }

    /// Returns `true` for the AI agent.
    #[must_use]
    pub const fn is_ai(&self) -> bool {
        matches!(self, Self::AiAgent { .. })
    }
}

/// Raw caller credentials handed to the identity service by the request
/// layer.
///
/// Credential *verification* (sessions, passwords) is out of scope; a
/// [`Credentials::Session`] value carries a user id the session layer has
/// already authenticated, while [`Credentials::ApiKey`] carries the raw
/// `X-API-Key` header value still to be resolved against project records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// A per-project API key presented by the AI agent.
    ApiKey(Uuid),
    /// A user id from an already-verified session.
    Session(UserId),
}
