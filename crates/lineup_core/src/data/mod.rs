//! Static configuration data shipped with the engine.

pub mod team_modes;

pub use team_modes::{catalog, TeamModeCatalog, TEAM_MODES_YAML};
