//! PlayerTimeTracker - time-in-role accounting
//!
//! Every transition closes the running stint into the bucket of the role the
//! player held *before* the transition, then restarts the stint clock.
//! Paused intervals are dropped: the stint restarts but nothing is credited.

use crate::models::{Player, PlayerRole, PlayerStats, PlayerStatus};

pub const MS_PER_SECOND: i64 = 1000;

/// Whole seconds between two epoch-ms stamps, rounded to nearest.
///
/// A negative interval (clock skew) counts as zero.
pub fn elapsed_seconds(start_epoch_ms: i64, now_epoch_ms: i64) -> u64 {
    let delta = now_epoch_ms.saturating_sub(start_epoch_ms);
    if delta < 0 {
        log::warn!(
            "Clock went backwards by {} ms (start {}, now {}); counting 0",
            -delta,
            start_epoch_ms,
            now_epoch_ms
        );
        return 0;
    }
    ((delta + MS_PER_SECOND / 2) / MS_PER_SECOND) as u64
}

fn credit(stats: &mut PlayerStats, seconds: u64) {
    if seconds == 0 {
        return;
    }
    match stats.current_period_status {
        PlayerStatus::Goalie => stats.time_as_goalie_seconds += seconds,
        PlayerStatus::Substitute => stats.time_as_substitute_seconds += seconds,
        PlayerStatus::OnField => match stats.current_period_role {
            PlayerRole::Defender => {
                stats.time_as_defender_seconds += seconds;
                stats.time_on_field_seconds += seconds;
            }
            PlayerRole::Midfielder => {
                stats.time_as_midfielder_seconds += seconds;
                stats.time_on_field_seconds += seconds;
            }
            PlayerRole::Attacker => {
                stats.time_as_attacker_seconds += seconds;
                stats.time_on_field_seconds += seconds;
            }
            // On field without an outfield role: nothing sensible to credit.
            PlayerRole::Goalie | PlayerRole::Substitute => {}
        },
    }
}

/// Closes the running stint and restarts it at `now_epoch_ms`.
///
/// No-op for players without a running stint (inactive, or no period running).
pub fn update_player_time_stats(player: &mut Player, now_epoch_ms: i64, is_paused: bool) {
    let Some(start) = player.stats.last_stint_start_epoch_ms else {
        return;
    };
    if !is_paused {
        let seconds = elapsed_seconds(start, now_epoch_ms);
        credit(&mut player.stats, seconds);
    }
    player.stats.last_stint_start_epoch_ms = Some(now_epoch_ms);
}

/// Closes the stint under the old role, then switches role.
pub fn handle_role_change(player: &mut Player, new_role: PlayerRole, now_epoch_ms: i64, is_paused: bool) {
    update_player_time_stats(player, now_epoch_ms, is_paused);
    log::debug!(
        "{}: role {} -> {}",
        player.id,
        player.stats.current_period_role.code(),
        new_role.code()
    );
    player.stats.current_period_role = new_role;
}

/// Closes the stint, then switches status and role together
/// (field ↔ bench ↔ goal).
pub fn handle_status_change(
    player: &mut Player,
    new_status: PlayerStatus,
    new_role: PlayerRole,
    now_epoch_ms: i64,
    is_paused: bool,
) {
    update_player_time_stats(player, now_epoch_ms, is_paused);
    player.stats.current_period_status = new_status;
    player.stats.current_period_role = new_role;
}

/// Starts a stint at period start (or on reactivation).
pub fn start_stint(player: &mut Player, status: PlayerStatus, role: PlayerRole, now_epoch_ms: i64) {
    player.stats.current_period_status = status;
    player.stats.current_period_role = role;
    player.stats.last_stint_start_epoch_ms = Some(now_epoch_ms);
}

/// Closes the running stint and stops the clock (period end, deactivation).
pub fn stop_stint(player: &mut Player, now_epoch_ms: i64, is_paused: bool) {
    update_player_time_stats(player, now_epoch_ms, is_paused);
    player.stats.last_stint_start_epoch_ms = None;
}

/// Deep, independent copy of the squad for a period snapshot.
pub fn snapshot(players: &[Player]) -> Vec<Player> {
    players.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_field(role: PlayerRole, start: i64) -> Player {
        let mut player = Player::new("P1", "Alva");
        start_stint(&mut player, PlayerStatus::OnField, role, start);
        player
    }

    #[test]
    fn test_elapsed_seconds_rounds_and_clamps() {
        assert_eq!(elapsed_seconds(0, 1_000), 1);
        assert_eq!(elapsed_seconds(0, 1_499), 1);
        assert_eq!(elapsed_seconds(0, 1_500), 2);
        assert_eq!(elapsed_seconds(5_000, 1_000), 0);
    }

    #[test]
    fn test_update_credits_previous_role() {
        let mut player = on_field(PlayerRole::Defender, 0);
        update_player_time_stats(&mut player, 60_000, false);

        assert_eq!(player.stats.time_as_defender_seconds, 60);
        assert_eq!(player.stats.time_on_field_seconds, 60);
        assert_eq!(player.stats.last_stint_start_epoch_ms, Some(60_000));
    }

    #[test]
    fn test_paused_interval_not_credited() {
        let mut player = on_field(PlayerRole::Attacker, 0);
        update_player_time_stats(&mut player, 30_000, true);
        assert_eq!(player.stats.time_as_attacker_seconds, 0);
        assert_eq!(player.stats.last_stint_start_epoch_ms, Some(30_000));

        update_player_time_stats(&mut player, 40_000, false);
        assert_eq!(player.stats.time_as_attacker_seconds, 10);
    }

    #[test]
    fn test_role_change_closes_old_bucket() {
        let mut player = on_field(PlayerRole::Defender, 0);
        handle_role_change(&mut player, PlayerRole::Attacker, 45_000, false);
        update_player_time_stats(&mut player, 75_000, false);

        assert_eq!(player.stats.time_as_defender_seconds, 45);
        assert_eq!(player.stats.time_as_attacker_seconds, 30);
        assert_eq!(player.stats.time_on_field_seconds, 75);
        assert_eq!(player.stats.current_period_role, PlayerRole::Attacker);
    }

    #[test]
    fn test_status_change_goalie_and_bench_not_on_field() {
        let mut player = on_field(PlayerRole::Midfielder, 0);
        handle_status_change(&mut player, PlayerStatus::Goalie, PlayerRole::Goalie, 10_000, false);
        handle_status_change(&mut player, PlayerStatus::Substitute, PlayerRole::Substitute, 30_000, false);
        update_player_time_stats(&mut player, 45_000, false);

        assert_eq!(player.stats.time_as_midfielder_seconds, 10);
        assert_eq!(player.stats.time_as_goalie_seconds, 20);
        assert_eq!(player.stats.time_as_substitute_seconds, 15);
        assert_eq!(player.stats.time_on_field_seconds, 10);
    }

    #[test]
    fn test_no_stint_no_credit() {
        let mut player = Player::new("P1", "Alva");
        update_player_time_stats(&mut player, 99_000, false);
        assert_eq!(player.stats.time_as_substitute_seconds, 0);
        assert_eq!(player.stats.last_stint_start_epoch_ms, None);
    }

    #[test]
    fn test_stop_stint_clears_clock() {
        let mut player = on_field(PlayerRole::Defender, 0);
        stop_stint(&mut player, 20_000, false);
        assert_eq!(player.stats.time_as_defender_seconds, 20);
        assert_eq!(player.stats.last_stint_start_epoch_ms, None);

        update_player_time_stats(&mut player, 90_000, false);
        assert_eq!(player.stats.time_as_defender_seconds, 20);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut squad = vec![on_field(PlayerRole::Defender, 0)];
        let frozen = snapshot(&squad);
        update_player_time_stats(&mut squad[0], 50_000, false);

        assert_eq!(frozen[0].stats.time_as_defender_seconds, 0);
        assert_eq!(squad[0].stats.time_as_defender_seconds, 50);
    }
}
