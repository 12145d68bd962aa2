//! Scenario runner
//!
//! Replays a scripted match (session setup + event list) against the
//! rotation engine and reports every outcome plus the final state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use lineup_core::api::{CreateSessionRequest, SessionStatus};
use lineup_core::data::catalog;
use lineup_core::engine::{ConfigOptions, EventOutcome, SessionEvent};
use lineup_core::models::TeamMode;

/// Scenario file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub session: CreateSessionRequest,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    pub event: String,
    pub outcome: EventOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub applied: usize,
    pub rejected: usize,
    pub steps: Vec<StepReport>,
    pub status: SessionStatus,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid scenario JSON in {}", path.display()))
}

/// Runs every event in order. Rejections are reported, not fatal.
pub fn run_scenario(scenario: Scenario) -> Result<ScenarioReport> {
    let mut session = scenario.session.into_session().context("Failed to create session")?;
    let mut steps = Vec::with_capacity(scenario.events.len());

    for (index, event) in scenario.events.iter().enumerate() {
        let outcome = session
            .apply(event)
            .with_context(|| format!("Event #{} ({}) failed", index, event.name()))?;
        if let Some(reason) = outcome.rejection() {
            log::warn!("Event #{} ({}) rejected: {}", index, event.name(), reason);
        }
        steps.push(StepReport { index, event: event.name().to_string(), outcome });
    }

    let applied = steps.iter().filter(|s| s.outcome.is_applied()).count();
    log::info!("Scenario done: {} applied, {} rejected", applied, steps.len() - applied);

    Ok(ScenarioReport {
        applied,
        rejected: steps.len() - applied,
        steps,
        status: SessionStatus::from_session(&session),
    })
}

/// Writes the report as JSON to `out`, or to stdout.
pub fn write_report(report: &ScenarioReport, out: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty { serde_json::to_string_pretty(report)? } else { serde_json::to_string(report)? };
    match out {
        Some(path) => fs::write(path, json).with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

/// Team modes and configuration options for one squad size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModesReport {
    pub options: ConfigOptions,
    pub modes: Vec<TeamMode>,
}

pub fn describe_modes(squad_size: u8) -> Option<ModesReport> {
    let options = ConfigOptions::for_squad_size(squad_size)?;
    let modes = catalog()
        .schemas()
        .iter()
        .map(|s| s.mode())
        .filter(|m| m.squad_size() == squad_size)
        .collect();
    Some(ModesReport { options, modes })
}
