//! MatchSession - owned match state and its transitions
//!
//! Every change goes through [`MatchSession::apply`]. An event is applied to
//! a working copy and committed only when it succeeds, so a rejected event
//! leaves the session exactly as it was.
//!
//! ```rust
//! use lineup_core::engine::{MatchSession, SessionEvent};
//! use lineup_core::models::{Player, SubstitutionType, TacticalFormation, TeamConfig};
//!
//! let config = TeamConfig::new(7, TacticalFormation::TwoTwo, SubstitutionType::Pairs);
//! let squad = (1..=7).map(|i| Player::new(format!("P{}", i), format!("Player {}", i))).collect();
//! let mut session = MatchSession::new(config, squad, 3).unwrap();
//!
//! session.apply(&SessionEvent::ChangeGoalie { player_id: "P7".into() }).unwrap();
//! session.apply(&SessionEvent::RecommendFormation).unwrap();
//! assert!(session.validation_state().is_complete);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::formation_validator::{FormationIssue, FormationValidator};
use super::goalie::{apply_goalie_swap, plan_goalie_change, PeriodGoalieAssignment};
use super::numeric::coerce_epoch_ms;
use super::outcome::{EventOutcome, Rejection};
use super::paired_role;
use super::recommendation::{recommend_formation, RecommendationContext};
use super::rotation::plan_rotation;
use super::rotation_queue::RotationQueue;
use super::team_mode::TeamModeSchema;
use super::time_tracker;
use crate::data::{catalog, TeamModeCatalog};
use crate::error::{LineupError, Result};
use crate::models::{
    Formation, GameLogEntry, PairedRoleStrategy, Player, PlayerId, PlayerRole, PlayerStatus, SlotId,
    SubstitutionRecord, TeamConfig,
};

// ============================================================================
// Events
// ============================================================================

/// Input to [`MatchSession::apply`].
///
/// Timestamps are raw host numbers (epoch ms); invalid ones are replaced by
/// the last valid clock reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    /// Writes a player into a slot. The goalie slot runs a goalie change.
    AssignSlot { slot: SlotId, player_id: PlayerId },
    ClearSlot { slot: SlotId },
    ChangeGoalie { player_id: PlayerId },
    SetPeriodGoalie { period: u32, player_id: PlayerId },
    SetPlayerActive { player_id: PlayerId, active: bool },
    SetCaptain { player_id: Option<PlayerId> },
    SetPairedRoleStrategy { strategy: Option<PairedRoleStrategy> },
    RecommendFormation,
    StartPeriod { now_ms: f64 },
    Tick { now_ms: f64, paused: bool },
    Pause { now_ms: f64 },
    Resume { now_ms: f64 },
    Rotate { now_ms: f64 },
    EndPeriod { now_ms: f64 },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::AssignSlot { .. } => "assignSlot",
            SessionEvent::ClearSlot { .. } => "clearSlot",
            SessionEvent::ChangeGoalie { .. } => "changeGoalie",
            SessionEvent::SetPeriodGoalie { .. } => "setPeriodGoalie",
            SessionEvent::SetPlayerActive { .. } => "setPlayerActive",
            SessionEvent::SetCaptain { .. } => "setCaptain",
            SessionEvent::SetPairedRoleStrategy { .. } => "setPairedRoleStrategy",
            SessionEvent::RecommendFormation => "recommendFormation",
            SessionEvent::StartPeriod { .. } => "startPeriod",
            SessionEvent::Tick { .. } => "tick",
            SessionEvent::Pause { .. } => "pause",
            SessionEvent::Resume { .. } => "resume",
            SessionEvent::Rotate { .. } => "rotate",
            SessionEvent::EndPeriod { .. } => "endPeriod",
        }
    }

    /// Player id referenced by the event, if any.
    fn player_ref(&self) -> Option<&PlayerId> {
        match self {
            SessionEvent::AssignSlot { player_id, .. }
            | SessionEvent::ChangeGoalie { player_id }
            | SessionEvent::SetPeriodGoalie { player_id, .. }
            | SessionEvent::SetPlayerActive { player_id, .. } => Some(player_id),
            SessionEvent::SetCaptain { player_id } => player_id.as_ref(),
            _ => None,
        }
    }
}

// ============================================================================
// Clock & validation state
// ============================================================================

/// Running-period clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodClock {
    /// `Some` while a period is running.
    pub started_at_epoch_ms: Option<i64>,
    pub is_paused: bool,
    /// Last valid timestamp seen; structural edits are stamped with it.
    pub last_epoch_ms: i64,
}

impl PeriodClock {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at_epoch_ms.is_some()
    }
}

/// Setup-screen view of the current formation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationState {
    pub is_complete: bool,
    pub issue: Option<FormationIssue>,
}

// ============================================================================
// MatchSession
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSession {
    config: TeamConfig,
    schema: TeamModeSchema,
    players: Vec<Player>,
    formation: Formation,
    queue: RotationQueue,
    period_goalies: PeriodGoalieAssignment,
    captain_id: Option<PlayerId>,
    num_periods: u32,
    current_period: u32,
    clock: PeriodClock,
    pending_substitutions: Vec<SubstitutionRecord>,
    game_log: Vec<GameLogEntry>,
}

impl MatchSession {
    /// New session against the built-in team-mode catalogue.
    pub fn new(config: TeamConfig, players: Vec<Player>, num_periods: u32) -> Result<Self> {
        Self::with_catalog(catalog(), config, players, num_periods)
    }

    /// New session; stats are reset and nobody is assigned yet.
    pub fn with_catalog(
        catalog: &TeamModeCatalog,
        mut config: TeamConfig,
        mut players: Vec<Player>,
        num_periods: u32,
    ) -> Result<Self> {
        if !catalog.is_period_count_supported(num_periods) {
            return Err(LineupError::InvalidPeriodCount(num_periods));
        }

        let schema = catalog.resolve(&config).cloned().ok_or_else(|| LineupError::UnsupportedTeamMode {
            squad_size: config.squad_size,
            substitution_type: config.substitution_type.code().to_string(),
            formation: config.formation.code().to_string(),
        })?;

        if players.len() != config.squad_size as usize {
            return Err(LineupError::SquadSizeMismatch { expected: config.squad_size, found: players.len() });
        }

        let mut seen = HashSet::new();
        for player in &players {
            if player.id.is_empty() {
                return Err(LineupError::UnknownPlayer(player.id.clone()));
            }
            if !seen.insert(player.id.clone()) {
                return Err(LineupError::DuplicatePlayerId(player.id.clone()));
            }
        }

        if config.paired_role_strategy.is_some() && !paired_role::is_applicable(&config) {
            log::debug!("Ignoring paired-role strategy for {}", schema.mode());
            config.paired_role_strategy = None;
        }

        for player in &mut players {
            player.stats.reset();
        }
        let captain_id = players.iter().find(|p| p.is_captain).map(|p| p.id.clone());
        for player in &mut players {
            player.is_captain = captain_id.as_ref() == Some(&player.id);
        }

        let queue = RotationQueue::initialize(players.iter().map(|p| p.id.clone()));

        log::info!(
            "Match session created: {} players, team mode {}, {} periods",
            players.len(),
            schema.mode(),
            num_periods
        );

        Ok(Self {
            formation: Formation::empty(schema.mode()),
            config,
            schema,
            players,
            queue,
            period_goalies: PeriodGoalieAssignment::new(num_periods),
            captain_id,
            num_periods,
            current_period: 1,
            clock: PeriodClock::default(),
            pending_substitutions: Vec::new(),
            game_log: Vec::new(),
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &TeamConfig {
        &self.config
    }

    pub fn schema(&self) -> &TeamModeSchema {
        &self.schema
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn queue(&self) -> &RotationQueue {
        &self.queue
    }

    pub fn period_goalies(&self) -> &PeriodGoalieAssignment {
        &self.period_goalies
    }

    pub fn captain_id(&self) -> Option<&PlayerId> {
        self.captain_id.as_ref()
    }

    pub fn num_periods(&self) -> u32 {
        self.num_periods
    }

    /// 1-based; `num_periods + 1` once the match is finished.
    pub fn current_period(&self) -> u32 {
        self.current_period
    }

    pub fn clock(&self) -> &PeriodClock {
        &self.clock
    }

    pub fn game_log(&self) -> &[GameLogEntry] {
        &self.game_log
    }

    #[inline]
    pub fn is_period_running(&self) -> bool {
        self.clock.is_running()
    }

    #[inline]
    pub fn is_match_finished(&self) -> bool {
        self.current_period > self.num_periods
    }

    pub fn validation_state(&self) -> ValidationState {
        match FormationValidator::validate_for_squad(&self.formation, &self.schema, &self.players) {
            Ok(()) => ValidationState { is_complete: true, issue: None },
            Err(issue) => ValidationState { is_complete: false, issue: Some(issue) },
        }
    }

    /// Re-checks a session that arrived from outside (e.g. a host's saved
    /// JSON) against the rules `apply` maintains.
    ///
    /// # Errors
    ///
    /// [`LineupError::InvalidSession`] naming the first broken rule.
    pub fn check_integrity(&self, catalog: &TeamModeCatalog) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(LineupError::InvalidSession(msg)) };

        if !catalog.is_period_count_supported(self.num_periods)
            || self.period_goalies.num_periods() != self.num_periods
        {
            return invalid(format!("period count {} out of range", self.num_periods));
        }
        if self.current_period == 0 || self.current_period > self.num_periods + 1 {
            return invalid(format!("current period {} of {}", self.current_period, self.num_periods));
        }
        if self.game_log.len() as u32 != self.current_period - 1 {
            return invalid(format!("{} log entries before period {}", self.game_log.len(), self.current_period));
        }
        if let Some((period, _)) = self.period_goalies.iter().find(|(p, _)| *p == 0 || *p > self.num_periods) {
            return invalid(format!("goalie set for period {}", period));
        }
        if catalog.resolve(&self.config) != Some(&self.schema) {
            return invalid(format!("team mode {} does not match the configuration", self.schema.mode()));
        }

        if self.players.len() != self.config.squad_size as usize {
            return invalid(format!("{} players for squad size {}", self.players.len(), self.config.squad_size));
        }
        let mut seen = HashSet::new();
        if let Some(dupe) = self.players.iter().find(|p| p.id.is_empty() || !seen.insert(&p.id)) {
            return invalid(format!("duplicate or empty player id '{}'", dupe.id));
        }

        let mut slotted = HashSet::new();
        if let Some((slot, id)) = self.formation.iter().find(|(_, id)| !slotted.insert(*id)) {
            return invalid(format!("{} assigned twice (again in {})", id, slot));
        }
        match FormationValidator::validate_for_squad(&self.formation, &self.schema, &self.players) {
            Ok(()) => {}
            Err(FormationIssue::MissingGoalie | FormationIssue::MissingSlot { .. }) if !self.is_period_running() => {}
            Err(issue) => return invalid(format!("formation: {}", issue)),
        }

        let mut queued = self.queue.to_vec();
        let mut eligible = self.rotation_eligible();
        queued.sort();
        eligible.sort();
        if queued != eligible {
            return invalid("rotation queue does not match the active outfield squad".to_string());
        }
        Ok(())
    }

    /// Ids that must be in the rotation queue: active, not in goal.
    pub fn rotation_eligible(&self) -> Vec<PlayerId> {
        let goalie = self.formation.goalie();
        self.players
            .iter()
            .filter(|p| p.is_active() && Some(&p.id) != goalie)
            .map(|p| p.id.clone())
            .collect()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// [`LineupError::UnknownPlayer`] when the event names a player outside
    /// the squad; the session is untouched.
    pub fn apply(&mut self, event: &SessionEvent) -> Result<EventOutcome> {
        if let Some(id) = event.player_ref() {
            if self.player(id).is_none() {
                return Err(LineupError::UnknownPlayer(id.clone()));
            }
        }

        let mut next = self.clone();
        match next.transition(event) {
            Ok(()) => {
                *self = next;
                Ok(EventOutcome::Applied)
            }
            Err(rejection) => {
                log::debug!("Rejected {}: {}", event.name(), rejection);
                Ok(EventOutcome::Rejected(rejection))
            }
        }
    }

    fn transition(&mut self, event: &SessionEvent) -> std::result::Result<(), Rejection> {
        match event {
            SessionEvent::AssignSlot { slot, player_id } => self.assign_slot(*slot, player_id),
            SessionEvent::ClearSlot { slot } => self.clear_slot(*slot),
            SessionEvent::ChangeGoalie { player_id } => self.change_goalie(player_id),
            SessionEvent::SetPeriodGoalie { period, player_id } => self.set_period_goalie(*period, player_id),
            SessionEvent::SetPlayerActive { player_id, active } => self.set_player_active(player_id, *active),
            SessionEvent::SetCaptain { player_id } => {
                self.set_captain(player_id.as_ref());
                Ok(())
            }
            SessionEvent::SetPairedRoleStrategy { strategy } => self.set_paired_role_strategy(*strategy),
            SessionEvent::RecommendFormation => self.recommend(),
            SessionEvent::StartPeriod { now_ms } => self.start_period(*now_ms),
            SessionEvent::Tick { now_ms, paused } => self.tick(*now_ms, *paused),
            SessionEvent::Pause { now_ms } => self.pause(*now_ms),
            SessionEvent::Resume { now_ms } => self.resume(*now_ms),
            SessionEvent::Rotate { now_ms } => self.rotate(*now_ms),
            SessionEvent::EndPeriod { now_ms } => self.end_period(*now_ms),
        }
    }

    fn ensure_not_finished(&self) -> std::result::Result<(), Rejection> {
        if self.is_match_finished() {
            Err(Rejection::MatchFinished)
        } else {
            Ok(())
        }
    }

    fn ensure_running(&self) -> std::result::Result<(), Rejection> {
        if self.is_period_running() {
            Ok(())
        } else {
            Err(Rejection::PeriodNotRunning)
        }
    }

    fn is_active(&self, id: &PlayerId) -> bool {
        self.player(id).map_or(false, Player::is_active)
    }

    fn observe_clock(&mut self, now_ms: f64) -> i64 {
        let now = coerce_epoch_ms(now_ms, self.clock.last_epoch_ms);
        self.clock.last_epoch_ms = now;
        now
    }

    /// Brings every player's status/role in line with the formation, closing
    /// stints through the time tracker. Only meaningful while running.
    fn sync_player_slots(&mut self) {
        let now = self.clock.last_epoch_ms;
        let paused = self.clock.is_paused;
        for player in &mut self.players {
            let slot = self.formation.slot_of(&player.id);
            let (status, role) = slot_status(slot);
            if player.stats.current_period_status != status || player.stats.current_period_role != role {
                time_tracker::handle_status_change(player, status, role, now, paused);
            }
            player.stats.current_pair_key = slot;
        }
    }

    fn after_structural_edit(&mut self) {
        if self.is_period_running() {
            self.sync_player_slots();
            self.order_queue_for_play();
        }
    }

    /// Field players ahead of the bench, so the queue front is always the
    /// next player due off.
    fn order_queue_for_play(&mut self) {
        let formation = &self.formation;
        self.queue.prioritize(|id| formation.slot_of(id).map_or(false, SlotId::is_field));
    }

    /// Keeps inactive players behind active ones on an individual bench.
    fn settle_bench(&mut self) {
        let bench_slots = self.schema.substitute_slots();
        let bench: Vec<PlayerId> =
            bench_slots.iter().filter_map(|slot| self.formation.get(*slot).cloned()).collect();
        let (mut ordered, inactive): (Vec<PlayerId>, Vec<PlayerId>) =
            bench.into_iter().partition(|id| self.is_active(id));
        ordered.extend(inactive);
        for (idx, slot) in bench_slots.iter().enumerate() {
            self.formation.set(*slot, ordered.get(idx).cloned());
        }
    }

    fn assign_slot(&mut self, slot: SlotId, player_id: &PlayerId) -> std::result::Result<(), Rejection> {
        self.ensure_not_finished()?;
        if slot == SlotId::Goalie {
            return self.change_goalie(player_id);
        }
        // Only an individual bench may hold inactive players.
        if !matches!(slot, SlotId::Substitute(_)) && !self.is_active(player_id) {
            return Err(Rejection::PlayerInactive { player: player_id.clone() });
        }
        FormationValidator::check_assignment(&self.formation, &self.schema, slot, player_id)?;

        if let Some(previous) = self.formation.assign(slot, player_id.clone()) {
            if &previous != player_id {
                log::debug!("{} replaces {} in {}", player_id, previous, slot);
            }
        }
        self.settle_bench();
        self.after_structural_edit();
        Ok(())
    }

    fn clear_slot(&mut self, slot: SlotId) -> std::result::Result<(), Rejection> {
        self.ensure_not_finished()?;
        if !self.schema.contains(slot) {
            return Err(Rejection::SlotNotInTeamMode { slot, team_mode: self.schema.mode() });
        }
        if self.is_period_running() {
            if slot == SlotId::Goalie {
                return Err(Rejection::GoalieRequired);
            }
            if self.schema.is_required(slot) && self.formation.get(slot).is_some() {
                return Err(Rejection::SlotRequired { slot });
            }
        }

        if let Some(removed) = self.formation.clear(slot) {
            if slot == SlotId::Goalie && self.is_active(&removed) {
                self.queue.add_player(removed);
            }
        }
        self.settle_bench();
        self.after_structural_edit();
        Ok(())
    }

    fn change_goalie(&mut self, player_id: &PlayerId) -> std::result::Result<(), Rejection> {
        self.ensure_not_finished()?;
        if !self.is_active(player_id) {
            return Err(Rejection::PlayerInactive { player: player_id.clone() });
        }

        let swap = plan_goalie_change(&self.formation, player_id, !self.is_period_running())?;
        let former_returns = swap.former_goalie.as_ref().map_or(false, |id| self.is_active(id));
        apply_goalie_swap(&mut self.formation, &mut self.queue, &swap, former_returns);
        self.period_goalies.set(self.current_period, player_id.clone());

        self.after_structural_edit();
        Ok(())
    }

    fn set_period_goalie(&mut self, period: u32, player_id: &PlayerId) -> std::result::Result<(), Rejection> {
        self.ensure_not_finished()?;
        if period < self.current_period || period > self.num_periods {
            return Err(Rejection::InvalidPeriod { period, current: self.current_period, last: self.num_periods });
        }

        if period == self.current_period {
            if self.is_period_running() {
                return Err(Rejection::PeriodRunning);
            }
            if self.formation.goalie() != Some(player_id) {
                // Records the period goalie as part of the swap.
                return self.change_goalie(player_id);
            }
        }

        self.period_goalies.set(period, player_id.clone());
        Ok(())
    }

    fn set_player_active(&mut self, player_id: &PlayerId, active: bool) -> std::result::Result<(), Rejection> {
        if self.is_active(player_id) == active {
            return Ok(());
        }

        let slot = self.formation.slot_of(player_id);
        let now = self.clock.last_epoch_ms;
        let paused = self.clock.is_paused;
        let running = self.is_period_running();

        if !active {
            match slot {
                Some(s @ SlotId::Pair(..)) if !s.is_field() => {
                    return Err(Rejection::PairMemberLocked { player: player_id.clone() });
                }
                Some(s) if s == SlotId::Goalie || s.is_field() => {
                    return Err(Rejection::PlayerOnField { player: player_id.clone() });
                }
                _ => {}
            }
        }

        let Some(player) = self.players.iter_mut().find(|p| &p.id == player_id) else {
            return Ok(());
        };

        if active {
            player.stats.is_inactive = false;
            if running {
                let (status, role) = slot_status(slot);
                time_tracker::start_stint(player, status, role, now);
            }
            if !self.queue.activate_player(player_id) {
                self.queue.add_player(player_id.clone());
            }
            log::debug!("{} reactivated", player_id);
        } else {
            time_tracker::stop_stint(player, now, paused);
            player.stats.is_inactive = true;
            self.queue.deactivate_player(player_id);
            log::debug!("{} deactivated", player_id);
        }

        self.settle_bench();
        self.after_structural_edit();
        Ok(())
    }

    fn set_captain(&mut self, player_id: Option<&PlayerId>) {
        for player in &mut self.players {
            player.is_captain = Some(&player.id) == player_id;
        }
        self.captain_id = player_id.cloned();
    }

    fn set_paired_role_strategy(
        &mut self,
        strategy: Option<PairedRoleStrategy>,
    ) -> std::result::Result<(), Rejection> {
        if strategy.is_some() && !paired_role::is_applicable(&self.config) {
            return Err(Rejection::StrategyNotApplicable);
        }
        self.config.paired_role_strategy = strategy;
        Ok(())
    }

    fn recommend(&mut self) -> std::result::Result<(), Rejection> {
        self.ensure_not_finished()?;
        if self.is_period_running() {
            return Err(Rejection::PeriodRunning);
        }

        if self.formation.goalie().is_none() {
            if let Some(goalie) = self.period_goalies.get(self.current_period).cloned() {
                if self.is_active(&goalie) {
                    let swap = plan_goalie_change(&self.formation, &goalie, true)?;
                    apply_goalie_swap(&mut self.formation, &mut self.queue, &swap, false);
                }
            }
        }

        let ctx = RecommendationContext {
            schema: &self.schema,
            players: &self.players,
            queue: &self.queue,
            base: &self.formation,
        };
        self.formation = recommend_formation(&ctx);
        Ok(())
    }

    fn start_period(&mut self, now_ms: f64) -> std::result::Result<(), Rejection> {
        self.ensure_not_finished()?;
        if self.is_period_running() {
            return Err(Rejection::PeriodRunning);
        }
        FormationValidator::validate_for_squad(&self.formation, &self.schema, &self.players)
            .map_err(|issue| Rejection::IncompleteFormation { issue })?;
        for (slot, id) in self.formation.iter() {
            if (slot == SlotId::Goalie || slot.is_field()) && !self.is_active(id) {
                return Err(Rejection::PlayerInactive { player: id.clone() });
            }
        }

        let now = self.observe_clock(now_ms);
        self.clock.started_at_epoch_ms = Some(now);
        self.clock.is_paused = false;

        let first_period = self.current_period == 1;
        for player in &mut self.players {
            let slot = self.formation.slot_of(&player.id);
            let (status, role) = slot_status(slot);
            player.stats.current_pair_key = slot;
            if first_period {
                player.stats.started_match_as = Some(status);
            }
            if !player.is_active() {
                player.stats.current_period_status = PlayerStatus::Substitute;
                player.stats.current_period_role = PlayerRole::Substitute;
                continue;
            }

            match role {
                PlayerRole::Goalie => player.stats.periods_as_goalie += 1,
                PlayerRole::Defender => player.stats.periods_as_defender += 1,
                PlayerRole::Midfielder => player.stats.periods_as_midfielder += 1,
                PlayerRole::Attacker => player.stats.periods_as_attacker += 1,
                PlayerRole::Substitute => {}
            }
            time_tracker::start_stint(player, status, role, now);
        }

        if let Some(goalie) = self.formation.goalie().cloned() {
            if self.period_goalies.get(self.current_period) != Some(&goalie) {
                self.period_goalies.set(self.current_period, goalie);
            }
        }
        let eligible = self.rotation_eligible();
        self.queue.sync_with(&eligible);
        self.order_queue_for_play();
        self.pending_substitutions.clear();

        log::info!(
            "Period {}/{} started at {} with goalie {}",
            self.current_period,
            self.num_periods,
            now,
            self.formation.goalie().map(|g| g.as_str()).unwrap_or("-")
        );
        Ok(())
    }

    fn tick(&mut self, now_ms: f64, paused: bool) -> std::result::Result<(), Rejection> {
        self.ensure_running()?;
        let now = self.observe_clock(now_ms);
        // `paused` flags this interval only; Pause/Resume toggle the clock.
        let skip = paused || self.clock.is_paused;
        for player in &mut self.players {
            time_tracker::update_player_time_stats(player, now, skip);
        }
        Ok(())
    }

    fn pause(&mut self, now_ms: f64) -> std::result::Result<(), Rejection> {
        self.ensure_running()?;
        if self.clock.is_paused {
            return Ok(());
        }
        let now = self.observe_clock(now_ms);
        for player in &mut self.players {
            time_tracker::update_player_time_stats(player, now, false);
        }
        self.clock.is_paused = true;
        log::debug!("Period {} paused at {}", self.current_period, now);
        Ok(())
    }

    fn resume(&mut self, now_ms: f64) -> std::result::Result<(), Rejection> {
        self.ensure_running()?;
        if !self.clock.is_paused {
            return Ok(());
        }
        let now = self.observe_clock(now_ms);
        for player in &mut self.players {
            time_tracker::update_player_time_stats(player, now, true);
        }
        self.clock.is_paused = false;
        log::debug!("Period {} resumed at {}", self.current_period, now);
        Ok(())
    }

    fn rotate(&mut self, now_ms: f64) -> std::result::Result<(), Rejection> {
        self.ensure_running()?;
        let strategy = paired_role::effective_strategy(&self.config);
        let plan = plan_rotation(&self.schema, &self.formation, &self.queue, &self.players, strategy)?;

        let now = self.observe_clock(now_ms);
        self.formation = plan.formation;
        self.queue = plan.queue;
        self.sync_player_slots();
        self.order_queue_for_play();

        log::debug!(
            "Rotation at {}: off [{}], on [{}]",
            now,
            join_ids(&plan.players_off),
            join_ids(&plan.players_on)
        );
        self.pending_substitutions.push(SubstitutionRecord {
            at_epoch_ms: now,
            players_off: plan.players_off,
            players_on: plan.players_on,
        });
        Ok(())
    }

    fn end_period(&mut self, now_ms: f64) -> std::result::Result<(), Rejection> {
        self.ensure_running()?;
        let now = self.observe_clock(now_ms);
        let paused = self.clock.is_paused;
        for player in &mut self.players {
            time_tracker::stop_stint(player, now, paused);
        }

        let entry = GameLogEntry {
            period: self.current_period,
            started_at_epoch_ms: self.clock.started_at_epoch_ms.unwrap_or(now),
            ended_at_epoch_ms: now,
            goalie: self.formation.goalie().cloned(),
            players: time_tracker::snapshot(&self.players),
            substitutions: std::mem::take(&mut self.pending_substitutions),
        };
        log::info!(
            "Period {}/{} ended: {} s, {} substitutions",
            entry.period,
            self.num_periods,
            entry.duration_seconds(),
            entry.substitutions.len()
        );
        self.game_log.push(entry);

        for player in &mut self.players {
            player.stats.current_period_status = PlayerStatus::Substitute;
            player.stats.current_period_role = PlayerRole::Substitute;
            player.stats.current_pair_key = None;
        }
        self.clock.started_at_epoch_ms = None;
        self.clock.is_paused = false;
        self.current_period += 1;

        if self.is_match_finished() {
            log::info!("Match finished after {} periods", self.num_periods);
            return Ok(());
        }

        self.formation = Formation::empty(self.schema.mode());
        if let Some(goalie) = self.period_goalies.get(self.current_period).cloned() {
            if self.is_active(&goalie) {
                self.formation.assign(SlotId::Goalie, goalie);
            }
        }
        let eligible = self.rotation_eligible();
        self.queue.sync_with(&eligible);
        Ok(())
    }
}

/// Pure form of [`MatchSession::apply`].
pub fn reduce(session: MatchSession, event: &SessionEvent) -> (MatchSession, Result<EventOutcome>) {
    let mut next = session;
    let outcome = next.apply(event);
    (next, outcome)
}

fn slot_status(slot: Option<SlotId>) -> (PlayerStatus, PlayerRole) {
    match slot {
        Some(slot) => (slot.status(), slot.role()),
        None => (PlayerStatus::Substitute, PlayerRole::Substitute),
    }
}

fn join_ids(ids: &[PlayerId]) -> String {
    ids.iter().map(PlayerId::as_str).collect::<Vec<_>>().join(", ")
}
