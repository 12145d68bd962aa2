//! Session JSON API
//!
//! Stateless string-in/string-out functions: the host keeps the serialized
//! [`MatchSession`] and passes it back with every event.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::catalog;
use crate::engine::numeric::coerce_count;
use crate::engine::{reduce, EventOutcome, MatchSession, SessionEvent, ValidationState};
use crate::error::LineupError;
use crate::models::{Formation, GameLogEntry, Player, PlayerId, TeamConfig};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string() }
    }

    fn invalid_json(what: &str, err: serde_json::Error) -> Self {
        Self::new("INVALID_JSON", &format!("Invalid {} JSON: {}", what, err))
    }
}

/// Parses a host-held session and re-checks it before any event touches it.
fn load_session(session_json: &str) -> Result<MatchSession, ApiError> {
    let session = serde_json::from_str::<MatchSession>(session_json).map_err(|e| ApiError::invalid_json("session", e))?;
    session.check_integrity(catalog()).map_err(|err| {
        warn!("Refusing session: {}", err);
        ApiError::from(err)
    })?;
    Ok(session)
}

impl From<LineupError> for ApiError {
    fn from(err: LineupError) -> Self {
        Self::new(err.code(), &err.to_string())
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, schema_version: API_VERSION.to_string() }
    }

    pub fn error(error: ApiError) -> Self {
        Self { success: false, data: None, error: Some(error), schema_version: API_VERSION.to_string() }
    }
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> String {
    let response = match result {
        Ok(data) => ApiResponse::success(data),
        Err(err) => ApiResponse::error(err),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

// ============================================================================
// Requests / responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInput {
    pub id: PlayerId,
    pub name: String,
}

/// Squad-selection result handed over by the setup screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub team_config: TeamConfig,
    pub players: Vec<PlayerInput>,
    /// Raw host number; defaults to the catalogue's period count.
    #[serde(default)]
    pub num_periods: Option<f64>,
    #[serde(default)]
    pub captain_id: Option<PlayerId>,
    #[serde(default)]
    pub period_goalies: BTreeMap<u32, PlayerId>,
}

impl CreateSessionRequest {
    /// Builds the session and applies captain and goalie pre-selection.
    ///
    /// Pre-selections the session refuses are logged and skipped.
    pub fn into_session(self) -> Result<MatchSession, LineupError> {
        let catalog = catalog();
        let default_periods = catalog.default_periods;
        let num_periods = self
            .num_periods
            .map_or(default_periods, |raw| coerce_count(raw, default_periods, catalog.max_periods));
        let players = self.players.into_iter().map(|p| Player::new(p.id, p.name)).collect();

        let mut session = MatchSession::new(self.team_config, players, num_periods)?;

        let mut setup = Vec::new();
        if self.captain_id.is_some() {
            setup.push(SessionEvent::SetCaptain { player_id: self.captain_id });
        }
        setup.extend(
            self.period_goalies
                .into_iter()
                .map(|(period, player_id)| SessionEvent::SetPeriodGoalie { period, player_id }),
        );
        for event in setup {
            if let EventOutcome::Rejected(reason) = session.apply(&event)? {
                warn!("Skipping {}: {}", event.name(), reason);
            }
        }
        Ok(session)
    }
}

/// Read-only view for the match screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub current_period: u32,
    pub num_periods: u32,
    pub is_period_running: bool,
    pub is_paused: bool,
    pub is_match_finished: bool,
    pub formation: Formation,
    pub queue: Vec<PlayerId>,
    pub validation: ValidationState,
    pub players: Vec<Player>,
    pub game_log: Vec<GameLogEntry>,
}

impl SessionStatus {
    pub fn from_session(session: &MatchSession) -> Self {
        Self {
            current_period: session.current_period(),
            num_periods: session.num_periods(),
            is_period_running: session.is_period_running(),
            is_paused: session.clock().is_paused,
            is_match_finished: session.is_match_finished(),
            formation: session.formation().clone(),
            queue: session.queue().to_vec(),
            validation: session.validation_state(),
            players: session.players().to_vec(),
            game_log: session.game_log().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session: MatchSession,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub outcome: EventOutcome,
    pub session: MatchSession,
    pub status: SessionStatus,
}

// ============================================================================
// Entry points
// ============================================================================

/// Create a session from a JSON [`CreateSessionRequest`].
///
/// # Returns
/// JSON string containing `ApiResponse<SessionCreated>`
pub fn create_session_json(request_json: &str) -> String {
    let result = serde_json::from_str::<CreateSessionRequest>(request_json)
        .map_err(|e| {
            error!("Failed to parse CreateSessionRequest: {}", e);
            ApiError::invalid_json("request", e)
        })
        .and_then(|request| request.into_session().map_err(ApiError::from))
        .map(|session| {
            info!("Created session for {} players", session.players().len());
            SessionCreated { status: SessionStatus::from_session(&session), session }
        });
    respond(result)
}

/// Apply one JSON [`SessionEvent`] to a JSON [`MatchSession`].
///
/// Rejected events still succeed at the API level; the reason is in
/// `outcome`.
///
/// # Returns
/// JSON string containing `ApiResponse<EventResponse>`
pub fn apply_event_json(session_json: &str, event_json: &str) -> String {
    let result = load_session(session_json).and_then(|session| {
            let event = serde_json::from_str::<SessionEvent>(event_json)
                .map_err(|e| ApiError::invalid_json("event", e))?;
            let (session, outcome) = reduce(session, &event);
            let outcome = outcome.map_err(|err| {
                warn!("Event {} failed: {}", event.name(), err);
                ApiError::from(err)
            })?;
            Ok(EventResponse { outcome, status: SessionStatus::from_session(&session), session })
        });
    respond(result)
}

/// Status view of a JSON [`MatchSession`].
///
/// # Returns
/// JSON string containing `ApiResponse<SessionStatus>`
pub fn session_status_json(session_json: &str) -> String {
    let result = load_session(session_json).map(|session| SessionStatus::from_session(&session));
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn request() -> Value {
        json!({
            "teamConfig": { "squadSize": 7, "formation": "2-2", "substitutionType": "pairs" },
            "players": (1..=7).map(|i| json!({ "id": format!("P{}", i), "name": format!("Player {}", i) })).collect::<Vec<_>>(),
            "numPeriods": 2,
            "captainId": "P2",
            "periodGoalies": { "1": "P7", "2": "P6" }
        })
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).expect("valid JSON response")
    }

    #[test]
    fn test_create_session_applies_preselection() {
        let response = parse(&create_session_json(&request().to_string()));
        assert_eq!(response["success"], true);
        assert_eq!(response["schemaVersion"], "v1");

        let status = &response["data"]["status"];
        assert_eq!(status["numPeriods"], 2);
        assert_eq!(status["formation"]["teamMode"], "pairs_7");
        assert_eq!(status["formation"]["slots"]["goalie"], "P7");
        assert_eq!(status["validation"]["isComplete"], false);
        assert_eq!(response["data"]["session"]["captainId"], "P2");
    }

    #[test]
    fn test_create_session_errors() {
        let response = parse(&create_session_json("not json"));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "INVALID_JSON");

        let mut short = request();
        short["players"].as_array_mut().expect("array").pop();
        let response = parse(&create_session_json(&short.to_string()));
        assert_eq!(response["error"]["code"], "SQUAD_SIZE_MISMATCH");
    }

    #[test]
    fn test_invalid_period_count_falls_back() {
        let mut req = request();
        req["numPeriods"] = json!(-3);
        let response = parse(&create_session_json(&req.to_string()));
        assert_eq!(response["data"]["status"]["numPeriods"], catalog().default_periods);

        req["numPeriods"] = json!(20_000_000);
        let response = parse(&create_session_json(&req.to_string()));
        assert_eq!(response["data"]["status"]["numPeriods"], catalog().default_periods);
        let goalies = &response["data"]["session"]["periodGoalies"]["goalies"];
        assert_eq!(goalies.as_object().map(|m| m.len()), Some(catalog().default_periods as usize));
    }

    #[test]
    fn test_tampered_session_is_refused() {
        let created = parse(&create_session_json(&request().to_string()));
        let session = &created["data"]["session"];

        let mut short_queue = session.clone();
        short_queue["queue"]["order"].as_array_mut().expect("queue order").pop();
        let response = parse(&apply_event_json(&short_queue.to_string(), r#"{"type":"recommendFormation"}"#));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "INVALID_SESSION");

        let mut huge = session.clone();
        huge["numPeriods"] = json!(400_000_000u32);
        huge["periodGoalies"]["numPeriods"] = json!(400_000_000u32);
        let event = r#"{"type":"setPeriodGoalie","period":1,"playerId":"P5"}"#;
        let response = parse(&apply_event_json(&huge.to_string(), event));
        assert_eq!(response["error"]["code"], "INVALID_SESSION");

        let mut doubled = session.clone();
        doubled["formation"]["slots"]["subPair.defender"] = json!("P7");
        let response = parse(&session_status_json(&doubled.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_SESSION");

        let response = parse(&apply_event_json(&session.to_string(), event));
        assert_eq!(response["success"], true);
    }

    #[test]
    fn test_apply_event_round_trip() {
        let created = parse(&create_session_json(&request().to_string()));
        let session = created["data"]["session"].to_string();

        let response = parse(&apply_event_json(&session, r#"{"type":"recommendFormation"}"#));
        assert_eq!(response["success"], true);
        assert_eq!(response["data"]["outcome"]["status"], "applied");
        assert_eq!(response["data"]["status"]["validation"]["isComplete"], true);

        let session = response["data"]["session"].to_string();
        let response = parse(&apply_event_json(&session, r#"{"type":"tick","nowMs":1000,"paused":false}"#));
        assert_eq!(response["data"]["outcome"]["status"], "rejected");
        assert_eq!(response["data"]["outcome"]["reason"]["kind"], "periodNotRunning");
    }

    #[test]
    fn test_apply_event_unknown_player() {
        let created = parse(&create_session_json(&request().to_string()));
        let session = created["data"]["session"].to_string();
        let response = parse(&apply_event_json(&session, r#"{"type":"changeGoalie","playerId":"Ghost"}"#));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "UNKNOWN_PLAYER");
    }

    #[test]
    fn test_session_status_json() {
        let created = parse(&create_session_json(&request().to_string()));
        let session = created["data"]["session"].to_string();
        let response = parse(&session_status_json(&session));
        assert_eq!(response["data"]["currentPeriod"], 1);
        assert_eq!(response["data"]["queue"].as_array().map(Vec::len), Some(6));

        let response = parse(&session_status_json("{}"));
        assert_eq!(response["error"]["code"], "INVALID_JSON");
    }
}
