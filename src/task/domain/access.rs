//! Authorization decisions for task and project access.
//!
//! Pure decision functions with no I/O: callers fetch the resource first,
//! because ownership is always resolved against the stored
//! `project.user_id` / `task.project_id`, never trusted from input. AI
//! visibility of individual tasks is additionally enforced by
//! project-scoped repository queries, so a task outside the agent's bound
//! project never surfaces at all.

use super::TaskPatch;
use crate::identity::domain::Actor;
use crate::project::domain::Project;

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The action may proceed.
    Granted,
    /// The action is denied.
    Denied(DenialReason),
}

/// Why an authorization decision denied the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The resource belongs to a project the actor cannot act on.
    ForeignProject,
    /// The patch sets the delegation flag, which only humans may touch.
    DelegationLocked,
    /// The patch sets the status directly; the AI must use the propose
    /// protocol instead.
    StatusLocked,
}

impl DenialReason {
    /// Returns the caller-facing denial message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ForeignProject => "You are not authorized to perform this action.",
            Self::DelegationLocked => "AI is not allowed to change the delegation status.",
            Self::StatusLocked => "AI is not allowed to change the task status directly.",
        }
    }
}

/// Decides whether `actor` may act on `project`.
///
/// A human actor is granted access to projects they own; the AI actor only
/// to the single project its API key is bound to.
#[must_use]
pub fn project_access(actor: Actor, project: &Project) -> Access {
    match actor {
        Actor::Human { user_id } => {
            if project.user_id() == user_id {
                Access::Granted
            } else {
                Access::Denied(DenialReason::ForeignProject)
            }
        }
        Actor::AiAgent { project_id } => {
            if project.id() == project_id {
                Access::Granted
            } else {
                Access::Denied(DenialReason::ForeignProject)
            }
        }
    }
}

/// Decides whether `actor` may apply `patch` to a task it can see.
///
/// Humans may set every patch field. The AI agent is locked out of
/// `is_delegated` (always) and `status` (direct writes; status changes go
/// through the propose protocol). Delegation is checked first so a patch
/// touching both reports the delegation lock.
#[must_use]
pub fn patch_access(actor: Actor, patch: &TaskPatch) -> Access {
    match actor {
        Actor::Human { .. } => Access::Granted,
        Actor::AiAgent { .. } => {
            if patch.delegated().is_some() {
                Access::Denied(DenialReason::DelegationLocked)
            } else if patch.status().is_some() {
                Access::Denied(DenialReason::StatusLocked)
            } else {
                Access::Granted
            }
        }
    }
}
