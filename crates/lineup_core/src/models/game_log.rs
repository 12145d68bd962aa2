use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerId};

/// One executed rotation inside a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRecord {
    pub at_epoch_ms: i64,
    pub players_off: Vec<PlayerId>,
    pub players_on: Vec<PlayerId>,
}

/// Read-only record of a finished period.
///
/// `players` is a deep copy taken at period close; later mutation of the
/// live squad never reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLogEntry {
    pub period: u32,
    pub started_at_epoch_ms: i64,
    pub ended_at_epoch_ms: i64,
    pub goalie: Option<PlayerId>,
    pub players: Vec<Player>,
    pub substitutions: Vec<SubstitutionRecord>,
}

impl GameLogEntry {
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Wall-clock length of the period in whole seconds (pauses included).
    pub fn duration_seconds(&self) -> u64 {
        let ms = self.ended_at_epoch_ms.saturating_sub(self.started_at_epoch_ms).max(0);
        (ms / 1000) as u64
    }
}
