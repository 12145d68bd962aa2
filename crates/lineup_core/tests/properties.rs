//! Property tests over random event sequences.

use lineup_core::data::catalog;
use lineup_core::engine::{MatchSession, SessionEvent};
use lineup_core::models::{Player, PlayerId, SubstitutionType, TacticalFormation, TeamConfig};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Step {
    Assign { slot: usize, player: usize },
    Clear { slot: usize },
    Goalie { player: usize },
    Active { player: usize, active: bool },
    PeriodGoalie { period: u32, player: usize },
    Recommend,
    Start,
    Tick { dt: i64, paused: bool },
    Pause { dt: i64 },
    Resume { dt: i64 },
    Rotate { dt: i64 },
    End { dt: i64 },
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0usize..16, 0usize..16).prop_map(|(slot, player)| Step::Assign { slot, player }),
        2 => (0usize..16, any::<bool>()).prop_map(|(idx, clear)| {
            if clear { Step::Clear { slot: idx } } else { Step::Goalie { player: idx } }
        }),
        2 => (0usize..16, any::<bool>()).prop_map(|(player, active)| Step::Active { player, active }),
        1 => (1u32..4, 0usize..16).prop_map(|(period, player)| Step::PeriodGoalie { period, player }),
        3 => Just(Step::Recommend),
        3 => Just(Step::Start),
        4 => (0i64..120_000, any::<bool>()).prop_map(|(dt, paused)| Step::Tick { dt, paused }),
        2 => (0i64..60_000, any::<bool>()).prop_map(|(dt, pause)| {
            if pause { Step::Pause { dt } } else { Step::Resume { dt } }
        }),
        3 => (0i64..240_000).prop_map(|dt| Step::Rotate { dt }),
        1 => (0i64..600_000).prop_map(|dt| Step::End { dt }),
    ]
}

fn session(config_idx: usize) -> MatchSession {
    let (size, shape, sub) = [
        (7, TacticalFormation::TwoTwo, SubstitutionType::Pairs),
        (9, TacticalFormation::TwoTwo, SubstitutionType::Pairs),
        (6, TacticalFormation::TwoTwo, SubstitutionType::Individual),
        (8, TacticalFormation::OneTwoOne, SubstitutionType::Individual),
    ][config_idx];
    let players = (1..=size).map(|i| Player::new(format!("P{}", i), format!("Player {}", i))).collect();
    MatchSession::new(TeamConfig::new(size, shape, sub), players, 3).expect("session")
}

fn to_event(step: &Step, session: &MatchSession, clock: &mut i64) -> SessionEvent {
    let slots: Vec<_> = session.schema().slots().collect();
    let players = session.players();
    let pick = |idx: usize| players[idx % players.len()].id.clone();
    let mut advance = |dt: i64| {
        *clock += dt;
        *clock as f64
    };

    match step {
        Step::Assign { slot, player } => {
            SessionEvent::AssignSlot { slot: slots[slot % slots.len()], player_id: pick(*player) }
        }
        Step::Clear { slot } => SessionEvent::ClearSlot { slot: slots[slot % slots.len()] },
        Step::Goalie { player } => SessionEvent::ChangeGoalie { player_id: pick(*player) },
        Step::Active { player, active } => SessionEvent::SetPlayerActive { player_id: pick(*player), active: *active },
        Step::PeriodGoalie { period, player } => {
            SessionEvent::SetPeriodGoalie { period: *period, player_id: pick(*player) }
        }
        Step::Recommend => SessionEvent::RecommendFormation,
        Step::Start => SessionEvent::StartPeriod { now_ms: advance(0) },
        Step::Tick { dt, paused } => SessionEvent::Tick { now_ms: advance(*dt), paused: *paused },
        Step::Pause { dt } => SessionEvent::Pause { now_ms: advance(*dt) },
        Step::Resume { dt } => SessionEvent::Resume { now_ms: advance(*dt) },
        Step::Rotate { dt } => SessionEvent::Rotate { now_ms: advance(*dt) },
        Step::End { dt } => SessionEvent::EndPeriod { now_ms: advance(*dt) },
    }
}

fn total_seconds(session: &MatchSession) -> Vec<u64> {
    session
        .players()
        .iter()
        .map(|p| p.stats.time_on_field_seconds + p.stats.time_as_goalie_seconds + p.stats.time_as_substitute_seconds)
        .collect()
}

fn check_invariants(session: &MatchSession) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for (slot, id) in session.formation().iter() {
        prop_assert!(seen.insert(id.clone()), "{} appears twice (again in {})", id, slot);
    }

    let mut queued = session.queue().to_vec();
    let mut eligible = session.rotation_eligible();
    queued.sort();
    eligible.sort();
    prop_assert_eq!(queued, eligible);

    for player in session.players() {
        prop_assert_eq!(player.stats.time_on_field_seconds, player.stats.outfield_role_seconds());
    }

    let integrity = session.check_integrity(catalog());
    prop_assert!(integrity.is_ok(), "{:?}", integrity);
    Ok(())
}

/// While a period runs, every id ahead of the first bench player in the
/// queue holds a field slot.
fn check_queue_order(session: &MatchSession) -> Result<(), TestCaseError> {
    let on_field = |id: &PlayerId| session.formation().slot_of(id).map_or(false, |slot| slot.is_field());
    let queue = session.queue().to_vec();
    if let Some(first_bench) = queue.iter().position(|id| !on_field(id)) {
        for id in &queue[first_bench..] {
            prop_assert!(!on_field(id), "{} on the field behind the bench in {:?}", id, queue);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Uniqueness, queue completeness and time conservation hold after
    /// every event, applied or rejected.
    #[test]
    fn prop_invariants_hold(config_idx in 0usize..4, steps in prop::collection::vec(step(), 1..80)) {
        let mut session = session(config_idx);
        let mut clock = 0i64;

        for step in &steps {
            let event = to_event(step, &session, &mut clock);
            let log_before = session.game_log().to_vec();

            let result = session.apply(&event);
            prop_assert!(result.is_ok(), "{:?} -> {:?}", event, result);
            check_invariants(&session)?;
            if session.is_period_running() {
                check_queue_order(&session)?;
            }
            prop_assert_eq!(&session.game_log()[..log_before.len()], &log_before[..]);
        }
    }

    /// The queue front is the next field player due off right after a
    /// period starts and after every rotation.
    #[test]
    fn prop_queue_front_is_on_field(config_idx in 0usize..4, steps in prop::collection::vec(step(), 1..80)) {
        let mut session = session(config_idx);
        let mut clock = 0i64;

        for step in &steps {
            let event = to_event(step, &session, &mut clock);
            let outcome = session.apply(&event).expect("known players");
            let starts_or_rotates = matches!(event, SessionEvent::StartPeriod { .. } | SessionEvent::Rotate { .. });
            if outcome.is_applied() && starts_or_rotates {
                let front = session.queue().front().cloned();
                let front_slot = front.as_ref().and_then(|id| session.formation().slot_of(id));
                prop_assert!(front_slot.map_or(false, |slot| slot.is_field()), "front {:?} after {:?}", front, event);
                check_queue_order(&session)?;
            }
        }
    }

    /// Nothing is credited while the clock is paused.
    #[test]
    fn prop_paused_intervals_add_nothing(config_idx in 0usize..4, steps in prop::collection::vec(step(), 1..80)) {
        let mut session = session(config_idx);
        let mut clock = 0i64;

        for step in &steps {
            let event = to_event(step, &session, &mut clock);
            let was_paused = session.clock().is_paused;
            let before = total_seconds(&session);

            session.apply(&event).expect("known players");

            let paused_interval = was_paused || matches!(event, SessionEvent::Tick { paused: true, .. });
            if paused_interval {
                prop_assert_eq!(total_seconds(&session), before, "{:?} credited paused time", event);
            }
        }
    }

    /// A rejected event leaves the session untouched.
    #[test]
    fn prop_rejection_is_atomic(config_idx in 0usize..4, steps in prop::collection::vec(step(), 1..60)) {
        let mut session = session(config_idx);
        let mut clock = 0i64;

        for step in &steps {
            let event = to_event(step, &session, &mut clock);
            let before = session.clone();
            let outcome = session.apply(&event).expect("known players");
            if !outcome.is_applied() {
                prop_assert_eq!(&session, &before);
            }
        }
    }
}
