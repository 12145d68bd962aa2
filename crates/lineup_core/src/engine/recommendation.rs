//! SubstitutionRecommendationGenerator - suggested formation for a period
//!
//! Balancing rule (greatest deficit first, deterministic):
//! - Field places go to the players with the least `time_on_field_seconds`;
//!   ties by rotation-queue position, then squad order.
//! - Pairs: of two pair members, the one with more attacker minutes relative
//!   to defender minutes defends.
//! - Individual slots: the candidate with the largest
//!   `time_on_field - 2 * time_in_slot_role` takes the slot; ties keep
//!   candidate order.
//!
//! The result is a suggestion. Slots already filled in the base formation
//! are kept, and slots stay empty when the eligible pool runs out.

use super::rotation_queue::RotationQueue;
use super::team_mode::TeamModeSchema;
use crate::models::{Formation, PairAssignment, Player, PlayerRole, SlotId};

/// Inputs shared by both generators.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    pub schema: &'a TeamModeSchema,
    pub players: &'a [Player],
    pub queue: &'a RotationQueue,
    /// Formation being built (goalie and any manual picks already set).
    pub base: &'a Formation,
}

pub trait FormationRecommender {
    fn recommend(&self, ctx: &RecommendationContext<'_>) -> Formation;
}

/// Generator for paired team modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairRecommender;

/// Generator for individual team modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndividualRecommender;

/// Picks the generator matching the schema.
pub fn recommend_formation(ctx: &RecommendationContext<'_>) -> Formation {
    let formation = if ctx.schema.is_paired() {
        PairRecommender.recommend(ctx)
    } else {
        IndividualRecommender.recommend(ctx)
    };
    log::debug!(
        "Recommended {} formation: {} of {} slots filled",
        ctx.schema.mode(),
        formation.assigned_count(),
        ctx.schema.slot_specs().len()
    );
    formation
}

/// Active, unassigned, non-goalie players; least field time first.
fn candidates<'a>(ctx: &RecommendationContext<'a>) -> Vec<&'a Player> {
    let mut pool: Vec<(usize, &'a Player)> = ctx
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_active() && !ctx.base.contains_player(&p.id))
        .collect();

    pool.sort_by_key(|(squad_idx, p)| {
        (
            p.stats.time_on_field_seconds,
            ctx.queue.position_of(&p.id).unwrap_or(usize::MAX),
            *squad_idx,
        )
    });
    pool.into_iter().map(|(_, p)| p).collect()
}

/// Attacker minus defender seconds; positive = owes defending time.
#[inline]
fn attack_lean(player: &Player) -> i64 {
    player.stats.time_as_attacker_seconds as i64 - player.stats.time_as_defender_seconds as i64
}

#[inline]
fn role_deficit(player: &Player, role: PlayerRole) -> i64 {
    player.stats.time_on_field_seconds as i64 - 2 * player.stats.role_seconds(role) as i64
}

/// Index of the highest score; the earliest wins ties.
fn pick_best(pool: &[&Player], score: impl Fn(&Player) -> i64) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, player) in pool.iter().enumerate() {
        let s = score(*player);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((idx, s));
        }
    }
    best.map(|(idx, _)| idx)
}

impl FormationRecommender for PairRecommender {
    fn recommend(&self, ctx: &RecommendationContext<'_>) -> Formation {
        let mut formation = ctx.base.clone();
        let mut pool = candidates(ctx).into_iter();

        let mut keys = ctx.schema.field_pair_keys();
        keys.extend(ctx.schema.sub_pair_keys());

        for key in keys {
            let current = formation.pair(key);
            let pair = match (current.defender, current.attacker) {
                (Some(defender), Some(attacker)) => {
                    PairAssignment { defender: Some(defender), attacker: Some(attacker) }
                }
                (Some(defender), None) => {
                    PairAssignment { defender: Some(defender), attacker: pool.next().map(|p| p.id.clone()) }
                }
                (None, Some(attacker)) => {
                    PairAssignment { defender: pool.next().map(|p| p.id.clone()), attacker: Some(attacker) }
                }
                (None, None) => match (pool.next(), pool.next()) {
                    (Some(a), Some(b)) => {
                        let (defender, attacker) = if attack_lean(a) >= attack_lean(b) { (a, b) } else { (b, a) };
                        PairAssignment { defender: Some(defender.id.clone()), attacker: Some(attacker.id.clone()) }
                    }
                    (Some(a), None) if attack_lean(a) >= 0 => {
                        PairAssignment { defender: Some(a.id.clone()), attacker: None }
                    }
                    (Some(a), None) => PairAssignment { defender: None, attacker: Some(a.id.clone()) },
                    (None, _) => PairAssignment::default(),
                },
            };
            formation.set_pair(key, pair);
        }

        formation
    }
}

impl FormationRecommender for IndividualRecommender {
    fn recommend(&self, ctx: &RecommendationContext<'_>) -> Formation {
        let mut formation = ctx.base.clone();
        let pool = candidates(ctx);

        let empty_field: Vec<SlotId> =
            ctx.schema.field_slots().into_iter().filter(|s| formation.get(*s).is_none()).collect();
        let split = empty_field.len().min(pool.len());
        let (field_pool, bench_pool) = pool.split_at(split);

        let mut remaining: Vec<&Player> = field_pool.to_vec();
        for slot in empty_field {
            let role = slot.role();
            let Some(idx) = pick_best(&remaining, |p| role_deficit(p, role)) else {
                break;
            };
            let player = remaining.remove(idx);
            formation.assign(slot, player.id.clone());
        }

        let mut bench = bench_pool.iter();
        for slot in ctx.schema.substitute_slots() {
            if formation.get(slot).is_some() {
                continue;
            }
            match bench.next() {
                Some(player) => {
                    formation.assign(slot, player.id.clone());
                }
                None => break,
            }
        }

        formation
    }
}
