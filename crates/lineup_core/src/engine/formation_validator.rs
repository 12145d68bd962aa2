//! FormationValidator - structural gate for "Start Period"
//!
//! Rules:
//! 1. Every required slot of the team-mode schema holds a player id
//! 2. No player id appears in more than one slot (goalie included)
//! 3. Every assigned slot exists in the schema
//!
//! Tactical quality is not judged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::outcome::Rejection;
use super::team_mode::TeamModeSchema;
use crate::models::{Formation, Player, PlayerId, SlotId, TeamMode};

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FormationIssue {
    #[error("formation is laid out for {found}, expected {expected}")]
    WrongTeamMode { expected: TeamMode, found: TeamMode },

    #[error("goalie slot is empty")]
    MissingGoalie,

    #[error("required slot {slot} is empty")]
    MissingSlot { slot: SlotId },

    #[error("{player} is assigned to both {first} and {second}")]
    DuplicatePlayer { player: PlayerId, first: SlotId, second: SlotId },

    #[error("slot {slot} is not part of this team mode")]
    UnknownSlot { slot: SlotId },

    #[error("{player} is not in the squad")]
    UnknownPlayer { player: PlayerId },
}

pub struct FormationValidator;

impl FormationValidator {
    /// Complete = all required slots filled and no duplicates.
    pub fn is_complete(formation: &Formation, schema: &TeamModeSchema) -> bool {
        Self::validate(formation, schema).is_ok()
    }

    /// First structural issue, checked in schema order.
    pub fn validate(formation: &Formation, schema: &TeamModeSchema) -> Result<(), FormationIssue> {
        if formation.team_mode() != schema.mode() {
            return Err(FormationIssue::WrongTeamMode {
                expected: schema.mode(),
                found: formation.team_mode(),
            });
        }

        for (slot, _) in formation.iter() {
            if !schema.contains(slot) {
                return Err(FormationIssue::UnknownSlot { slot });
            }
        }

        for slot in schema.required_slots() {
            if formation.get(slot).is_none() {
                return Err(match slot {
                    SlotId::Goalie => FormationIssue::MissingGoalie,
                    _ => FormationIssue::MissingSlot { slot },
                });
            }
        }

        let mut seen: HashMap<&PlayerId, SlotId> = HashMap::new();
        for (slot, player) in formation.iter() {
            if let Some(first) = seen.insert(player, slot) {
                return Err(FormationIssue::DuplicatePlayer { player: player.clone(), first, second: slot });
            }
        }

        Ok(())
    }

    /// [`Self::validate`] plus squad membership of every assigned id.
    pub fn validate_for_squad(
        formation: &Formation,
        schema: &TeamModeSchema,
        squad: &[Player],
    ) -> Result<(), FormationIssue> {
        for (_, player) in formation.iter() {
            if !squad.iter().any(|p| &p.id == player) {
                return Err(FormationIssue::UnknownPlayer { player: player.clone() });
            }
        }
        Self::validate(formation, schema)
    }

    /// Checks a pending write of `player` into `slot` before it happens.
    ///
    /// Re-writing a player into the slot they already hold is accepted.
    pub fn check_assignment(
        formation: &Formation,
        schema: &TeamModeSchema,
        slot: SlotId,
        player: &PlayerId,
    ) -> Result<(), Rejection> {
        if !schema.contains(slot) {
            return Err(Rejection::SlotNotInTeamMode { slot, team_mode: schema.mode() });
        }
        match formation.slot_of(player) {
            Some(existing_slot) if existing_slot != slot => {
                Err(Rejection::DuplicateAssignment { player: player.clone(), existing_slot })
            }
            _ => Ok(()),
        }
    }
}
