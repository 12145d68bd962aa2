use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::formation_validator::FormationIssue;
use crate::models::{PlayerId, SlotId, TeamMode};

/// Why an event left the session unchanged.
///
/// These are coach-facing warnings, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rejection {
    #[error("{player} is already assigned to {existing_slot}")]
    DuplicateAssignment { player: PlayerId, existing_slot: SlotId },

    #[error("slot {slot} does not exist in team mode {team_mode}")]
    SlotNotInTeamMode { slot: SlotId, team_mode: TeamMode },

    #[error("formation is incomplete: {issue}")]
    IncompleteFormation { issue: FormationIssue },

    #[error("{player} is inactive")]
    PlayerInactive { player: PlayerId },

    #[error("{player} is on the field or in goal")]
    PlayerOnField { player: PlayerId },

    #[error("{player} belongs to a pair and cannot be deactivated")]
    PairMemberLocked { player: PlayerId },

    #[error("{player} is already the goalie")]
    AlreadyGoalie { player: PlayerId },

    #[error("{player} is not in any formation slot")]
    GoalieNotInFormation { player: PlayerId },

    #[error("the goalie slot cannot be cleared while the period is running")]
    GoalieRequired,

    #[error("slot {slot} must stay filled while the period is running")]
    SlotRequired { slot: SlotId },

    #[error("no active substitute is available")]
    NoSubstituteAvailable,

    #[error("no field player is queued to come off")]
    NoFieldPlayerQueued,

    #[error("period {period} is not a valid target (current {current}, last {last})")]
    InvalidPeriod { period: u32, current: u32, last: u32 },

    #[error("a period is already running")]
    PeriodRunning,

    #[error("no period is running")]
    PeriodNotRunning,

    #[error("the match is finished")]
    MatchFinished,

    #[error("paired-role strategy does not apply to this configuration")]
    StrategyNotApplicable,
}

/// Result of applying a [`super::SessionEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum EventOutcome {
    Applied,
    Rejected(Rejection),
}

impl EventOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, EventOutcome::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            EventOutcome::Applied => None,
            EventOutcome::Rejected(reason) => Some(reason),
        }
    }
}

impl From<Rejection> for EventOutcome {
    fn from(reason: Rejection) -> Self {
        EventOutcome::Rejected(reason)
    }
}
