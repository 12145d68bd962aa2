//! Live rotation - executes one substitution during a running period
//!
//! The rotation is planned on copies and returned whole; the session
//! commits it and pushes the status changes through the time tracker.
//!
//! Queue order after a rotation:
//! `[remaining on-field players..., entrants..., substitutes..., leavers...]`

use super::outcome::Rejection;
use super::paired_role;
use super::rotation_queue::{QueuePosition, RotationQueue};
use super::team_mode::TeamModeSchema;
use crate::models::{Formation, PairAssignment, PairedRoleStrategy, Player, PlayerId, SlotId};

/// Result of a planned rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPlan {
    pub formation: Formation,
    pub queue: RotationQueue,
    pub players_off: Vec<PlayerId>,
    pub players_on: Vec<PlayerId>,
}

/// Plans the next substitution for the current formation.
pub fn plan_rotation(
    schema: &TeamModeSchema,
    formation: &Formation,
    queue: &RotationQueue,
    players: &[Player],
    strategy: PairedRoleStrategy,
) -> Result<RotationPlan, Rejection> {
    if schema.is_paired() {
        plan_pair_rotation(schema, formation, queue, strategy)
    } else {
        plan_individual_rotation(schema, formation, queue, players)
    }
}

/// First queued player currently in a field slot.
fn next_leaver(formation: &Formation, queue: &RotationQueue) -> Option<(PlayerId, SlotId)> {
    queue.iter().find_map(|id| {
        formation
            .slot_of(id)
            .filter(|slot| slot.is_field())
            .map(|slot| (id.clone(), slot))
    })
}

fn is_active(players: &[Player], id: &PlayerId) -> bool {
    players.iter().find(|p| &p.id == id).map_or(false, Player::is_active)
}

/// Moves `leavers` to the back and places `entrants` right after the last
/// player still on the field.
fn requeue(queue: &mut RotationQueue, formation: &Formation, leavers: &[PlayerId], entrants: &[PlayerId]) {
    for id in leavers.iter().chain(entrants) {
        queue.remove_player(id);
    }

    let order = queue.to_vec();
    let mut index = order
        .iter()
        .rposition(|id| formation.slot_of(id).map_or(false, |slot| slot.is_field()))
        .map_or(0, |i| i + 1);
    for id in entrants {
        queue.insert_at(id.clone(), QueuePosition::Index(index));
        index += 1;
    }
    for id in leavers {
        queue.add_player(id.clone());
    }
}

fn plan_individual_rotation(
    schema: &TeamModeSchema,
    formation: &Formation,
    queue: &RotationQueue,
    players: &[Player],
) -> Result<RotationPlan, Rejection> {
    let (leaver, field_slot) = next_leaver(formation, queue).ok_or(Rejection::NoFieldPlayerQueued)?;

    let bench_slots = schema.substitute_slots();
    let bench: Vec<PlayerId> = bench_slots.iter().filter_map(|slot| formation.get(*slot).cloned()).collect();
    let entrant_idx = bench
        .iter()
        .position(|id| is_active(players, id))
        .ok_or(Rejection::NoSubstituteAvailable)?;
    let entrant = bench[entrant_idx].clone();

    // Active substitutes shift up, the leaver sits behind them, inactive
    // players stay at the end.
    let (mut new_bench, inactive): (Vec<PlayerId>, Vec<PlayerId>) = bench
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| *idx != entrant_idx)
        .map(|(_, id)| id)
        .partition(|id| is_active(players, id));
    new_bench.push(leaver.clone());
    new_bench.extend(inactive);

    let mut next = formation.clone();
    next.assign(field_slot, entrant.clone());
    for (idx, slot) in bench_slots.iter().enumerate() {
        next.set(*slot, new_bench.get(idx).cloned());
    }

    let mut next_queue = queue.clone();
    let players_off = vec![leaver];
    let players_on = vec![entrant];
    requeue(&mut next_queue, &next, &players_off, &players_on);

    Ok(RotationPlan { formation: next, queue: next_queue, players_off, players_on })
}

fn pair_members(pair: &PairAssignment) -> Vec<PlayerId> {
    pair.defender.iter().chain(pair.attacker.iter()).cloned().collect()
}

fn plan_pair_rotation(
    schema: &TeamModeSchema,
    formation: &Formation,
    queue: &RotationQueue,
    strategy: PairedRoleStrategy,
) -> Result<RotationPlan, Rejection> {
    let (_, field_slot) = next_leaver(formation, queue).ok_or(Rejection::NoFieldPlayerQueued)?;
    let field_key = field_slot.pair_key().ok_or(Rejection::NoFieldPlayerQueued)?;

    let sub_keys = schema.sub_pair_keys();
    let Some(first_sub) = sub_keys.first().copied() else {
        return Err(Rejection::NoSubstituteAvailable);
    };

    let incoming = formation.pair(first_sub);
    if incoming.defender.is_none() && incoming.attacker.is_none() {
        return Err(Rejection::NoSubstituteAvailable);
    }
    let outgoing = formation.pair(field_key);

    let mut next = formation.clone();
    next.set_pair(field_key, paired_role::on_reentry(strategy, incoming.clone()));
    for window in sub_keys.windows(2) {
        next.set_pair(window[0], formation.pair(window[1]));
    }
    if let Some(last) = sub_keys.last() {
        next.set_pair(*last, outgoing.clone());
    }

    let players_off = pair_members(&outgoing);
    let players_on = pair_members(&incoming);
    let mut next_queue = queue.clone();
    requeue(&mut next_queue, &next, &players_off, &players_on);

    Ok(RotationPlan { formation: next, queue: next_queue, players_off, players_on })
}
