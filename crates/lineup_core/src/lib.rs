//! # lineup_core - Squad Rotation & Formation Engine
//!
//! Bookkeeping for a coach running a small-sided youth match: who plays
//! where in each period, who comes off next, and how long everyone has
//! spent in each role.
//!
//! ## Features
//! - Team modes as data (paired and individual substitution, 2-2 and 1-2-1)
//! - Formation completeness and uniqueness validation
//! - Fair rotation queue and balanced formation recommendations
//! - Time-in-role tracking with pause support and per-period snapshots
//! - JSON API for host integration

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{apply_event_json, create_session_json, session_status_json, ApiError, ApiResponse};
pub use engine::{
    reduce, EventOutcome, FormationIssue, FormationValidator, MatchSession, Rejection, RotationQueue,
    SessionEvent, TeamModeSchema,
};
pub use error::{CatalogError, LineupError, Result};
pub use models::{
    Formation, GameLogEntry, Player, PlayerId, PlayerRole, PlayerStats, PlayerStatus, SlotId, TeamConfig,
    TeamMode,
};
