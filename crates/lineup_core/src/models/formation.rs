//! Formation - slot ↔ player assignment for the active period.
//!
//! Slots are addressed by [`SlotId`]; which slots exist for a given
//! [`TeamMode`] is decided by the team-mode schema, not by this type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::player::{PlayerId, PlayerRole, PlayerStatus};
use super::team_config::TeamMode;
use crate::error::CatalogError;

// ============================================================================
// Slot identifiers
// ============================================================================

/// Pair groups used by paired team modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairKey {
    LeftPair,
    RightPair,
    SubPair,
    SubPair2,
}

impl PairKey {
    pub const fn code(self) -> &'static str {
        match self {
            PairKey::LeftPair => "leftPair",
            PairKey::RightPair => "rightPair",
            PairKey::SubPair => "subPair",
            PairKey::SubPair2 => "subPair2",
        }
    }

    /// Field pairs play, sub pairs wait on the bench.
    #[inline]
    pub const fn is_field(self) -> bool {
        matches!(self, PairKey::LeftPair | PairKey::RightPair)
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "leftPair" => Some(PairKey::LeftPair),
            "rightPair" => Some(PairKey::RightPair),
            "subPair" => Some(PairKey::SubPair),
            "subPair2" => Some(PairKey::SubPair2),
            _ => None,
        }
    }
}

/// The two halves of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairPosition {
    Defender,
    Attacker,
}

impl PairPosition {
    pub const fn code(self) -> &'static str {
        match self {
            PairPosition::Defender => "defender",
            PairPosition::Attacker => "attacker",
        }
    }

    #[inline]
    pub const fn other(self) -> Self {
        match self {
            PairPosition::Defender => PairPosition::Attacker,
            PairPosition::Attacker => PairPosition::Defender,
        }
    }
}

/// Named outfield positions of individual team modes (2-2 and 1-2-1 shapes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPosition {
    LeftDefender,
    RightDefender,
    LeftAttacker,
    RightAttacker,
    Defender,
    LeftMidfielder,
    RightMidfielder,
    Attacker,
}

impl FieldPosition {
    pub const ALL: [FieldPosition; 8] = [
        FieldPosition::LeftDefender,
        FieldPosition::RightDefender,
        FieldPosition::LeftAttacker,
        FieldPosition::RightAttacker,
        FieldPosition::Defender,
        FieldPosition::LeftMidfielder,
        FieldPosition::RightMidfielder,
        FieldPosition::Attacker,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            FieldPosition::LeftDefender => "leftDefender",
            FieldPosition::RightDefender => "rightDefender",
            FieldPosition::LeftAttacker => "leftAttacker",
            FieldPosition::RightAttacker => "rightAttacker",
            FieldPosition::Defender => "defender",
            FieldPosition::LeftMidfielder => "leftMidfielder",
            FieldPosition::RightMidfielder => "rightMidfielder",
            FieldPosition::Attacker => "attacker",
        }
    }

    pub const fn role(self) -> PlayerRole {
        match self {
            FieldPosition::LeftDefender | FieldPosition::RightDefender | FieldPosition::Defender => {
                PlayerRole::Defender
            }
            FieldPosition::LeftMidfielder | FieldPosition::RightMidfielder => PlayerRole::Midfielder,
            FieldPosition::LeftAttacker | FieldPosition::RightAttacker | FieldPosition::Attacker => {
                PlayerRole::Attacker
            }
        }
    }
}

/// A single assignable cell of a formation.
///
/// String form (JSON keys, YAML catalogue): `goalie`, `leftPair.defender`,
/// `leftDefender`, `substitute_1`. The bare `substitute` is read as
/// `substitute_1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SlotId {
    Goalie,
    Pair(PairKey, PairPosition),
    Field(FieldPosition),
    /// 1-based bench slot
    Substitute(u8),
}

impl SlotId {
    /// Status a player holds while sitting in this slot.
    pub const fn status(self) -> PlayerStatus {
        match self {
            SlotId::Goalie => PlayerStatus::Goalie,
            SlotId::Pair(key, _) if key.is_field() => PlayerStatus::OnField,
            SlotId::Pair(..) => PlayerStatus::Substitute,
            SlotId::Field(_) => PlayerStatus::OnField,
            SlotId::Substitute(_) => PlayerStatus::Substitute,
        }
    }

    /// Time-accounting role for this slot.
    pub const fn role(self) -> PlayerRole {
        match self {
            SlotId::Goalie => PlayerRole::Goalie,
            SlotId::Pair(key, _) if !key.is_field() => PlayerRole::Substitute,
            SlotId::Pair(_, PairPosition::Defender) => PlayerRole::Defender,
            SlotId::Pair(_, PairPosition::Attacker) => PlayerRole::Attacker,
            SlotId::Field(position) => position.role(),
            SlotId::Substitute(_) => PlayerRole::Substitute,
        }
    }

    #[inline]
    pub const fn is_field(self) -> bool {
        matches!(self.status(), PlayerStatus::OnField)
    }

    #[inline]
    pub const fn pair_key(self) -> Option<PairKey> {
        match self {
            SlotId::Pair(key, _) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SlotId::Goalie => f.write_str("goalie"),
            SlotId::Pair(key, position) => write!(f, "{}.{}", key.code(), position.code()),
            SlotId::Field(position) => f.write_str(position.code()),
            SlotId::Substitute(n) => write!(f, "substitute_{}", n),
        }
    }
}

impl FromStr for SlotId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CatalogError::UnknownSlot(s.to_string());

        if s == "goalie" {
            return Ok(SlotId::Goalie);
        }
        if s == "substitute" {
            return Ok(SlotId::Substitute(1));
        }
        if let Some(n) = s.strip_prefix("substitute_") {
            let n: u8 = n.parse().map_err(|_| unknown())?;
            return if n == 0 { Err(unknown()) } else { Ok(SlotId::Substitute(n)) };
        }
        if let Some((key, position)) = s.split_once('.') {
            let key = PairKey::from_code(key).ok_or_else(unknown)?;
            let position = match position {
                "defender" => PairPosition::Defender,
                "attacker" => PairPosition::Attacker,
                _ => return Err(unknown()),
            };
            return Ok(SlotId::Pair(key, position));
        }
        FieldPosition::ALL
            .iter()
            .find(|p| p.code() == s)
            .map(|p| SlotId::Field(*p))
            .ok_or_else(unknown)
    }
}

impl From<SlotId> for String {
    fn from(slot: SlotId) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for SlotId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Formation
// ============================================================================

/// Both halves of one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairAssignment {
    pub defender: Option<PlayerId>,
    pub attacker: Option<PlayerId>,
}

/// Current assignment of player ids to slots, tagged by team mode.
///
/// Empty slots are simply absent. Mutation is crate-internal: hosts change a
/// formation through [`crate::engine::MatchSession`] events so the
/// uniqueness invariant is checked on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    team_mode: TeamMode,
    slots: BTreeMap<SlotId, PlayerId>,
}

impl Formation {
    pub fn empty(team_mode: TeamMode) -> Self {
        Self { team_mode, slots: BTreeMap::new() }
    }

    /// Build a formation from raw data (e.g. restored by a persistence layer).
    ///
    /// No uniqueness check happens here; run the result through
    /// [`crate::engine::FormationValidator`]. Empty ids are dropped.
    pub fn from_assignments(
        team_mode: TeamMode,
        assignments: impl IntoIterator<Item = (SlotId, PlayerId)>,
    ) -> Self {
        let slots = assignments.into_iter().filter(|(_, id)| !id.is_empty()).collect();
        Self { team_mode, slots }
    }

    #[inline]
    pub fn team_mode(&self) -> TeamMode {
        self.team_mode
    }

    #[inline]
    pub fn get(&self, slot: SlotId) -> Option<&PlayerId> {
        self.slots.get(&slot)
    }

    #[inline]
    pub fn goalie(&self) -> Option<&PlayerId> {
        self.slots.get(&SlotId::Goalie)
    }

    /// First slot (in slot order) holding `player`.
    pub fn slot_of(&self, player: &PlayerId) -> Option<SlotId> {
        self.slots.iter().find(|(_, id)| *id == player).map(|(slot, _)| *slot)
    }

    #[inline]
    pub fn contains_player(&self, player: &PlayerId) -> bool {
        self.slots.values().any(|id| id == player)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &PlayerId)> {
        self.slots.iter().map(|(slot, id)| (*slot, id))
    }

    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.slots.len()
    }

    pub fn pair(&self, key: PairKey) -> PairAssignment {
        PairAssignment {
            defender: self.get(SlotId::Pair(key, PairPosition::Defender)).cloned(),
            attacker: self.get(SlotId::Pair(key, PairPosition::Attacker)).cloned(),
        }
    }

    /// Writes `player` into `slot`, returning the previous occupant.
    pub(crate) fn assign(&mut self, slot: SlotId, player: PlayerId) -> Option<PlayerId> {
        self.slots.insert(slot, player)
    }

    pub(crate) fn clear(&mut self, slot: SlotId) -> Option<PlayerId> {
        self.slots.remove(&slot)
    }

    pub(crate) fn set(&mut self, slot: SlotId, player: Option<PlayerId>) {
        match player {
            Some(id) => {
                self.slots.insert(slot, id);
            }
            None => {
                self.slots.remove(&slot);
            }
        }
    }

    pub(crate) fn set_pair(&mut self, key: PairKey, pair: PairAssignment) {
        self.set(SlotId::Pair(key, PairPosition::Defender), pair.defender);
        self.set(SlotId::Pair(key, PairPosition::Attacker), pair.attacker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team_config::TacticalFormation;

    #[test]
    fn test_slot_id_string_forms() {
        let cases = [
            (SlotId::Goalie, "goalie"),
            (SlotId::Pair(PairKey::LeftPair, PairPosition::Defender), "leftPair.defender"),
            (SlotId::Pair(PairKey::SubPair2, PairPosition::Attacker), "subPair2.attacker"),
            (SlotId::Field(FieldPosition::RightAttacker), "rightAttacker"),
            (SlotId::Field(FieldPosition::LeftMidfielder), "leftMidfielder"),
            (SlotId::Substitute(2), "substitute_2"),
        ];
        for (slot, text) in cases {
            assert_eq!(slot.to_string(), text);
            assert_eq!(text.parse::<SlotId>().expect("parse"), slot);
        }
    }

    #[test]
    fn test_bare_substitute_is_first_bench_slot() {
        assert_eq!("substitute".parse::<SlotId>().expect("parse"), SlotId::Substitute(1));
    }

    #[test]
    fn test_unknown_slot_rejected() {
        assert!("libero".parse::<SlotId>().is_err());
        assert!("substitute_0".parse::<SlotId>().is_err());
        assert!("midPair.defender".parse::<SlotId>().is_err());
        assert!("leftPair.keeper".parse::<SlotId>().is_err());
    }

    #[test]
    fn test_slot_status_and_role() {
        let sub_def = SlotId::Pair(PairKey::SubPair, PairPosition::Defender);
        assert_eq!(sub_def.status(), PlayerStatus::Substitute);
        assert_eq!(sub_def.role(), PlayerRole::Substitute);

        let right_att = SlotId::Pair(PairKey::RightPair, PairPosition::Attacker);
        assert_eq!(right_att.status(), PlayerStatus::OnField);
        assert_eq!(right_att.role(), PlayerRole::Attacker);

        assert_eq!(SlotId::Field(FieldPosition::RightMidfielder).role(), PlayerRole::Midfielder);
        assert_eq!(SlotId::Goalie.status(), PlayerStatus::Goalie);
    }

    #[test]
    fn test_formation_json_uses_slot_strings() {
        let mode = TeamMode::Individual { squad_size: 6, shape: TacticalFormation::TwoTwo };
        let formation = Formation::from_assignments(
            mode,
            [
                (SlotId::Goalie, PlayerId::from("P6")),
                (SlotId::Field(FieldPosition::LeftDefender), PlayerId::from("P1")),
                (SlotId::Substitute(1), PlayerId::from("")),
            ],
        );
        let json = serde_json::to_value(&formation).expect("serialize");
        assert_eq!(json["teamMode"], "individual_6");
        assert_eq!(json["slots"]["goalie"], "P6");
        assert_eq!(json["slots"]["leftDefender"], "P1");
        assert!(json["slots"].get("substitute_1").is_none(), "empty id dropped");

        let back: Formation = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, formation);
    }

    #[test]
    fn test_assign_returns_previous_occupant() {
        let mode = TeamMode::Pairs { squad_size: 7 };
        let mut formation = Formation::empty(mode);
        let slot = SlotId::Pair(PairKey::LeftPair, PairPosition::Defender);
        assert_eq!(formation.assign(slot, "P1".into()), None);
        assert_eq!(formation.assign(slot, "P2".into()), Some(PlayerId::from("P1")));
        assert_eq!(formation.slot_of(&"P2".into()), Some(slot));
        assert!(!formation.contains_player(&"P1".into()));
    }
}
