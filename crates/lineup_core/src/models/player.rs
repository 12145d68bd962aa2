use serde::{Deserialize, Serialize};
use std::fmt;

use super::formation::SlotId;

// ============================================================================
// PlayerId
// ============================================================================

/// Opaque player identifier supplied by the squad-selection screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Status / role
// ============================================================================

/// Where the player is during the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerStatus {
    OnField,
    #[default]
    Substitute,
    Goalie,
}

/// Role bucket used for time accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerRole {
    Defender,
    Midfielder,
    Attacker,
    Goalie,
    #[default]
    Substitute,
}

impl PlayerRole {
    /// Defender, midfielder and attacker count towards `time_on_field_seconds`.
    #[inline]
    pub const fn is_outfield(self) -> bool {
        matches!(self, PlayerRole::Defender | PlayerRole::Midfielder | PlayerRole::Attacker)
    }

    pub const fn code(self) -> &'static str {
        match self {
            PlayerRole::Defender => "defender",
            PlayerRole::Midfielder => "midfielder",
            PlayerRole::Attacker => "attacker",
            PlayerRole::Goalie => "goalie",
            PlayerRole::Substitute => "substitute",
        }
    }
}

// ============================================================================
// PlayerStats
// ============================================================================

/// Per-match statistics. Reset at squad selection, frozen per period into
/// [`super::GameLogEntry`] snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub current_period_status: PlayerStatus,
    pub current_period_role: PlayerRole,
    pub current_pair_key: Option<SlotId>,
    pub is_inactive: bool,
    pub started_match_as: Option<PlayerStatus>,
    /// Start of the running stint; `None` while no period is running.
    pub last_stint_start_epoch_ms: Option<i64>,

    pub time_on_field_seconds: u64,
    pub time_as_defender_seconds: u64,
    pub time_as_midfielder_seconds: u64,
    pub time_as_attacker_seconds: u64,
    pub time_as_goalie_seconds: u64,
    pub time_as_substitute_seconds: u64,

    pub periods_as_goalie: u32,
    pub periods_as_defender: u32,
    pub periods_as_midfielder: u32,
    pub periods_as_attacker: u32,
}

impl PlayerStats {
    /// Accumulated seconds for one outfield role bucket (0 for goalie/substitute).
    pub fn role_seconds(&self, role: PlayerRole) -> u64 {
        match role {
            PlayerRole::Defender => self.time_as_defender_seconds,
            PlayerRole::Midfielder => self.time_as_midfielder_seconds,
            PlayerRole::Attacker => self.time_as_attacker_seconds,
            PlayerRole::Goalie => self.time_as_goalie_seconds,
            PlayerRole::Substitute => self.time_as_substitute_seconds,
        }
    }

    /// Sum of the outfield role buckets.
    #[inline]
    pub fn outfield_role_seconds(&self) -> u64 {
        self.time_as_defender_seconds + self.time_as_midfielder_seconds + self.time_as_attacker_seconds
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), is_captain: false, stats: PlayerStats::default() }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.stats.is_inactive
    }
}
