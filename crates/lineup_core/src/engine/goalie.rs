//! GoalieReassignment and per-period goalie pre-selection
//!
//! A goalie change is planned against the current state first and applied
//! as a whole, so the formation and the rotation queue never disagree.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::outcome::Rejection;
use super::rotation_queue::RotationQueue;
use crate::models::{Formation, PlayerId, SlotId};

// ============================================================================
// PeriodGoalieAssignment
// ============================================================================

/// Period number → goalie.
///
/// Period 1 acts as the default for later periods: changing it rewrites every
/// later period that was never set explicitly and still holds the old
/// period-1 value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodGoalieAssignment {
    num_periods: u32,
    goalies: BTreeMap<u32, PlayerId>,
    overridden: BTreeSet<u32>,
}

impl PeriodGoalieAssignment {
    pub fn new(num_periods: u32) -> Self {
        Self { num_periods, goalies: BTreeMap::new(), overridden: BTreeSet::new() }
    }

    #[inline]
    pub fn num_periods(&self) -> u32 {
        self.num_periods
    }

    #[inline]
    pub fn get(&self, period: u32) -> Option<&PlayerId> {
        self.goalies.get(&period)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &PlayerId)> {
        self.goalies.iter().map(|(period, id)| (*period, id))
    }

    #[inline]
    pub fn is_overridden(&self, period: u32) -> bool {
        self.overridden.contains(&period)
    }

    /// Sets the goalie of `period`. Out-of-range periods are ignored and
    /// reported as `false`.
    pub fn set(&mut self, period: u32, goalie: PlayerId) -> bool {
        if period == 0 || period > self.num_periods {
            return false;
        }

        if period == 1 {
            let previous_default = self.goalies.get(&1).cloned();
            for later in 2..=self.num_periods {
                if self.overridden.contains(&later) {
                    continue;
                }
                if self.goalies.get(&later) == previous_default.as_ref() {
                    self.goalies.insert(later, goalie.clone());
                }
            }
        } else {
            self.overridden.insert(period);
        }

        self.goalies.insert(period, goalie);
        true
    }
}

// ============================================================================
// Goalie swap
// ============================================================================

/// A planned goalie change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalieSwap {
    pub new_goalie: PlayerId,
    pub former_goalie: Option<PlayerId>,
    /// Slot the new goalie leaves; the former goalie moves in there.
    pub vacated_slot: Option<SlotId>,
}

/// Plans making `new_goalie` the goalie.
///
/// The player must sit in a formation slot unless the goalie slot is still
/// empty or `allow_unslotted` is set (pre-selection on the setup screen).
pub fn plan_goalie_change(
    formation: &Formation,
    new_goalie: &PlayerId,
    allow_unslotted: bool,
) -> Result<GoalieSwap, Rejection> {
    let former_goalie = formation.goalie().cloned();
    if former_goalie.as_ref() == Some(new_goalie) {
        return Err(Rejection::AlreadyGoalie { player: new_goalie.clone() });
    }

    let vacated_slot = formation.slot_of(new_goalie);
    if vacated_slot.is_none() && former_goalie.is_some() && !allow_unslotted {
        return Err(Rejection::GoalieNotInFormation { player: new_goalie.clone() });
    }

    Ok(GoalieSwap { new_goalie: new_goalie.clone(), former_goalie, vacated_slot })
}

/// Applies a planned swap to formation and queue.
///
/// `former_returns_to_rotation` is false when the former goalie is inactive.
pub fn apply_goalie_swap(
    formation: &mut Formation,
    queue: &mut RotationQueue,
    swap: &GoalieSwap,
    former_returns_to_rotation: bool,
) {
    if let Some(slot) = swap.vacated_slot {
        formation.set(slot, swap.former_goalie.clone());
    }
    formation.assign(SlotId::Goalie, swap.new_goalie.clone());

    queue.remove_player(&swap.new_goalie);
    if let Some(former) = &swap.former_goalie {
        if former_returns_to_rotation {
            queue.add_player(former.clone());
        }
    }

    log::debug!(
        "Goalie change: {} in (from {}), {} out",
        swap.new_goalie,
        swap.vacated_slot.map(|s| s.to_string()).unwrap_or_else(|| "bench".to_string()),
        swap.former_goalie.as_ref().map(|p| p.as_str()).unwrap_or("nobody")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PairKey, PairPosition, TeamMode};

    fn pairs_formation() -> Formation {
        let slots = [
            (SlotId::Goalie, "P7"),
            (SlotId::Pair(PairKey::LeftPair, PairPosition::Defender), "P1"),
            (SlotId::Pair(PairKey::LeftPair, PairPosition::Attacker), "P2"),
            (SlotId::Pair(PairKey::RightPair, PairPosition::Defender), "P3"),
            (SlotId::Pair(PairKey::RightPair, PairPosition::Attacker), "P4"),
            (SlotId::Pair(PairKey::SubPair, PairPosition::Defender), "P5"),
            (SlotId::Pair(PairKey::SubPair, PairPosition::Attacker), "P6"),
        ];
        Formation::from_assignments(
            TeamMode::Pairs { squad_size: 7 },
            slots.iter().map(|(s, p)| (*s, PlayerId::from(*p))),
        )
    }

    fn queue() -> RotationQueue {
        RotationQueue::initialize(["P1", "P2", "P3", "P4", "P5", "P6"].map(PlayerId::from))
    }

    #[test]
    fn test_swap_field_player_into_goal() {
        let mut formation = pairs_formation();
        let mut queue = queue();
        let swap = plan_goalie_change(&formation, &"P3".into(), false).expect("plan");
        apply_goalie_swap(&mut formation, &mut queue, &swap, true);

        let right_def = SlotId::Pair(PairKey::RightPair, PairPosition::Defender);
        assert_eq!(formation.goalie(), Some(&PlayerId::from("P3")));
        assert_eq!(formation.get(right_def), Some(&PlayerId::from("P7")));
        assert!(!queue.contains(&"P3".into()));
        assert!(queue.contains(&"P7".into()));
        assert_eq!(queue.to_vec().last(), Some(&PlayerId::from("P7")));
        assert_eq!(queue.len(), 6);
    }

    #[test]
    fn test_swap_round_trip() {
        let original = pairs_formation();
        let mut formation = original.clone();
        let mut queue = queue();

        let swap = plan_goalie_change(&formation, &"P3".into(), false).expect("plan");
        apply_goalie_swap(&mut formation, &mut queue, &swap, true);
        let back = plan_goalie_change(&formation, &"P7".into(), false).expect("plan back");
        apply_goalie_swap(&mut formation, &mut queue, &back, true);

        assert_eq!(formation, original);
    }

    #[test]
    fn test_first_assignment_without_partner() {
        let mode = TeamMode::Pairs { squad_size: 7 };
        let mut formation = Formation::empty(mode);
        let mut queue = queue();
        queue.add_player("P7".into());

        let swap = plan_goalie_change(&formation, &"P7".into(), false).expect("plan");
        assert_eq!(swap.former_goalie, None);
        assert_eq!(swap.vacated_slot, None);

        apply_goalie_swap(&mut formation, &mut queue, &swap, true);
        assert_eq!(formation.goalie(), Some(&PlayerId::from("P7")));
        assert_eq!(formation.assigned_count(), 1);
        assert!(!queue.contains(&"P7".into()));
    }

    #[test]
    fn test_unslotted_player_is_noop() {
        let mut formation = pairs_formation();
        formation.clear(SlotId::Pair(PairKey::SubPair, PairPosition::Attacker));
        assert_eq!(
            plan_goalie_change(&formation, &"P6".into(), false),
            Err(Rejection::GoalieNotInFormation { player: "P6".into() })
        );
        assert!(plan_goalie_change(&formation, &"P6".into(), true).is_ok());
    }

    #[test]
    fn test_current_goalie_is_noop() {
        let formation = pairs_formation();
        assert_eq!(
            plan_goalie_change(&formation, &"P7".into(), false),
            Err(Rejection::AlreadyGoalie { player: "P7".into() })
        );
    }

    #[test]
    fn test_period_one_cascades_to_defaults() {
        let mut goalies = PeriodGoalieAssignment::new(3);
        goalies.set(1, "X".into());
        assert_eq!(goalies.get(2), Some(&PlayerId::from("X")));
        assert_eq!(goalies.get(3), Some(&PlayerId::from("X")));

        goalies.set(2, "Y".into());
        goalies.set(1, "Z".into());
        assert_eq!(goalies.get(1), Some(&PlayerId::from("Z")));
        assert_eq!(goalies.get(2), Some(&PlayerId::from("Y")));
        assert_eq!(goalies.get(3), Some(&PlayerId::from("Z")));
    }

    #[test]
    fn test_period_override_matching_default_still_sticks() {
        let mut goalies = PeriodGoalieAssignment::new(3);
        goalies.set(1, "X".into());
        goalies.set(3, "X".into());
        goalies.set(1, "Z".into());
        assert_eq!(goalies.get(2), Some(&PlayerId::from("Z")));
        assert_eq!(goalies.get(3), Some(&PlayerId::from("X")));
        assert!(goalies.is_overridden(3));
    }

    #[test]
    fn test_period_out_of_range_ignored() {
        let mut goalies = PeriodGoalieAssignment::new(2);
        assert!(!goalies.set(0, "X".into()));
        assert!(!goalies.set(3, "X".into()));
        assert_eq!(goalies.iter().count(), 0);
    }
}
