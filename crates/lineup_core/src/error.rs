use thiserror::Error;

use crate::models::{PlayerId, SlotId};

/// Hard failures: contract violations by the caller or broken configuration.
///
/// Structural problems a coach can cause from the UI (duplicate picks,
/// incomplete formations) are not errors; they come back as
/// [`crate::engine::Rejection`] inside an `Ok` outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineupError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Duplicate player id in squad: {0}")]
    DuplicatePlayerId(PlayerId),

    #[error("Squad has {found} players, team config expects {expected}")]
    SquadSizeMismatch { expected: u8, found: usize },

    #[error("No team mode for {squad_size} players ({substitution_type}, {formation})")]
    UnsupportedTeamMode {
        squad_size: u8,
        substitution_type: String,
        formation: String,
    },

    #[error("Invalid period count: {0}")]
    InvalidPeriodCount(u32),

    #[error("Inconsistent session state: {0}")]
    InvalidSession(String),

    #[error("Team mode catalogue error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Errors raised while loading a team-mode catalogue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("YAML parse error: {0}")]
    Parse(String),

    #[error("Unknown slot id: {0}")]
    UnknownSlot(String),

    #[error("Unknown team mode id: {0}")]
    UnknownTeamMode(String),

    #[error("Team mode {mode} must have exactly one goalie slot, found {found}")]
    GoalieSlotCount { mode: String, found: usize },

    #[error("Team mode {mode} declares {slots} slots for a squad of {squad_size}")]
    SlotCountMismatch {
        mode: String,
        slots: usize,
        squad_size: u8,
    },

    #[error("Team mode {mode} lists slot {slot} twice")]
    DuplicateSlot { mode: String, slot: SlotId },

    #[error("Team mode {0} is declared twice")]
    DuplicateMode(String),

    #[error("Default period count {default} is outside 1..={max}")]
    InvalidPeriodRange { default: u32, max: u32 },

    #[error("Squad size range {min}..={max} is empty")]
    InvalidSquadRange { min: u8, max: u8 },
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl LineupError {
    /// Stable code for the JSON boundary.
    pub fn code(&self) -> &'static str {
        match self {
            LineupError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            LineupError::DuplicatePlayerId(_) => "DUPLICATE_PLAYER_ID",
            LineupError::SquadSizeMismatch { .. } => "SQUAD_SIZE_MISMATCH",
            LineupError::UnsupportedTeamMode { .. } => "UNSUPPORTED_TEAM_MODE",
            LineupError::InvalidPeriodCount(_) => "INVALID_PERIOD_COUNT",
            LineupError::InvalidSession(_) => "INVALID_SESSION",
            LineupError::Catalog(_) => "CATALOG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, LineupError>;
