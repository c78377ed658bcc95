//! Task status state machine.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The catalogue is fixed: statuses are small integers shared with the
/// store and with API clients, not user-extensible. `DonePendingAcceptance`
/// and `CanceledPendingConfirmation` are transient proposed states that
/// only the lifecycle engine enters and exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum TaskStatus {
    /// Work has not started or has been handed back.
    ToDo,
    /// Work is complete and confirmed.
    Done,
    /// The task was abandoned and the abandonment confirmed.
    Canceled,
    /// The AI agent reported completion; a human has not yet accepted.
    DonePendingAcceptance,
    /// The AI agent proposed cancellation; a human has not yet confirmed.
    CanceledPendingConfirmation,
}

impl TaskStatus {
    /// Every status, in catalogue order.
    pub const ALL: [Self; 5] = [
        Self::ToDo,
        Self::Done,
        Self::Canceled,
        Self::DonePendingAcceptance,
        Self::CanceledPendingConfirmation,
    ];

    /// Returns the canonical storage identifier.
    #[must_use]
    pub const fn as_id(self) -> i16 {
        match self {
            Self::ToDo => 1,
            Self::Done => 2,
            Self::Canceled => 3,
            Self::DonePendingAcceptance => 4,
            Self::CanceledPendingConfirmation => 5,
        }
    }

    /// Returns the human-readable status label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::Done => "Done",
            Self::Canceled => "Canceled",
            Self::DonePendingAcceptance => "Done, pending acceptance",
            Self::CanceledPendingConfirmation => "Canceled, pending confirmation",
        }
    }

    /// Returns `true` for the transient proposed states.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            Self::DonePendingAcceptance | Self::CanceledPendingConfirmation
        )
    }

    /// Maps a proposable terminal status to the pending status stored while
    /// the proposal awaits a human decision.
    ///
    /// Only `Done` and `Canceled` are proposable; every other status
    /// returns `None`.
    #[must_use]
    pub const fn as_pending_proposal(self) -> Option<Self> {
        match self {
            Self::Done => Some(Self::DonePendingAcceptance),
            Self::Canceled => Some(Self::CanceledPendingConfirmation),
            Self::ToDo | Self::DonePendingAcceptance | Self::CanceledPendingConfirmation => None,
        }
    }

    /// Maps a pending status to the terminal status it resolves to on
    /// acceptance.
    ///
    /// Returns `None` for statuses that are not awaiting a decision.
    #[must_use]
    pub const fn accepted(self) -> Option<Self> {
        match self {
            Self::DonePendingAcceptance => Some(Self::Done),
            Self::CanceledPendingConfirmation => Some(Self::Canceled),
            Self::ToDo | Self::Done | Self::Canceled => None,
        }
    }
}

impl From<TaskStatus> for i16 {
    fn from(status: TaskStatus) -> Self {
        status.as_id()
    }
}

impl TryFrom<i16> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::ToDo),
            2 => Ok(Self::Done),
            3 => Ok(Self::Canceled),
            4 => Ok(Self::DonePendingAcceptance),
            5 => Ok(Self::CanceledPendingConfirmation),
            _ => Err(ParseTaskStatusError(value)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
