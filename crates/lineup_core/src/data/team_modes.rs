//! Team-mode catalogue loading
//!
//! The slot layout of every supported team mode is data, embedded from
//! `data/team_modes.yaml` at compile time and parsed once.
//!
//! ```rust
//! use lineup_core::data::team_modes::catalog;
//! use lineup_core::models::TeamMode;
//!
//! let schema = catalog().schema(TeamMode::Pairs { squad_size: 7 }).unwrap();
//! assert!(schema.is_paired());
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::engine::team_mode::{ConfigOptions, SlotSpec, TeamModeSchema};
use crate::error::CatalogError;
use crate::models::{MatchFormat, SlotId, SubstitutionType, TacticalFormation, TeamConfig, TeamMode};

// =============================================================================
// Embedded YAML Data
// =============================================================================

/// Team-mode catalogue YAML (embedded at compile time)
pub const TEAM_MODES_YAML: &str = include_str!("../../data/team_modes.yaml");

static CATALOG: OnceLock<TeamModeCatalog> = OnceLock::new();

/// Built-in catalogue.
///
/// # Panics
///
/// Panics if the embedded YAML is malformed. The data ships inside the
/// binary and is covered by `test_embedded_catalog_parses`.
pub fn catalog() -> &'static TeamModeCatalog {
    CATALOG.get_or_init(|| {
        TeamModeCatalog::from_yaml_str(TEAM_MODES_YAML).expect("Failed to parse team_modes.yaml")
    })
}

// =============================================================================
// YAML structures
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawCatalog {
    min_squad_size: u8,
    max_squad_size: u8,
    default_periods: u32,
    max_periods: u32,
    modes: Vec<RawMode>,
}

#[derive(Debug, Deserialize)]
struct RawMode {
    id: TeamMode,
    #[serde(default)]
    format: MatchFormat,
    required: Vec<SlotId>,
    #[serde(default)]
    optional: Vec<SlotId>,
}

// =============================================================================
// Catalogue
// =============================================================================

/// Validated set of team-mode schemas plus squad-size limits.
#[derive(Debug, Clone)]
pub struct TeamModeCatalog {
    pub min_squad_size: u8,
    pub max_squad_size: u8,
    pub default_periods: u32,
    /// Upper bound for a match's period count.
    pub max_periods: u32,
    schemas: Vec<TeamModeSchema>,
}

impl TeamModeCatalog {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_yaml::from_str(yaml)?;

        if raw.min_squad_size > raw.max_squad_size {
            return Err(CatalogError::InvalidSquadRange {
                min: raw.min_squad_size,
                max: raw.max_squad_size,
            });
        }

        if raw.default_periods == 0 || raw.default_periods > raw.max_periods {
            return Err(CatalogError::InvalidPeriodRange {
                default: raw.default_periods,
                max: raw.max_periods,
            });
        }

        let mut seen_modes = HashSet::new();
        let mut schemas = Vec::with_capacity(raw.modes.len());

        for mode in raw.modes {
            let code = mode.id.to_string();
            if !seen_modes.insert(mode.id) {
                return Err(CatalogError::DuplicateMode(code));
            }

            let slots: Vec<SlotSpec> = mode
                .required
                .iter()
                .map(|slot| SlotSpec { slot: *slot, required: true })
                .chain(mode.optional.iter().map(|slot| SlotSpec { slot: *slot, required: false }))
                .collect();

            let mut seen_slots = HashSet::new();
            for spec in &slots {
                if !seen_slots.insert(spec.slot) {
                    return Err(CatalogError::DuplicateSlot { mode: code, slot: spec.slot });
                }
            }

            let goalie_slots = slots.iter().filter(|s| s.slot == SlotId::Goalie).count();
            let goalie_required = mode.required.contains(&SlotId::Goalie);
            if goalie_slots != 1 || !goalie_required {
                return Err(CatalogError::GoalieSlotCount { mode: code, found: goalie_slots });
            }

            if slots.len() != mode.id.squad_size() as usize {
                return Err(CatalogError::SlotCountMismatch {
                    mode: code,
                    slots: slots.len(),
                    squad_size: mode.id.squad_size(),
                });
            }

            schemas.push(TeamModeSchema::new(mode.id, mode.format, slots));
        }

        log::debug!(
            "Loaded team-mode catalogue: {} modes, squad size {}..={}",
            schemas.len(),
            raw.min_squad_size,
            raw.max_squad_size
        );

        Ok(Self {
            min_squad_size: raw.min_squad_size,
            max_squad_size: raw.max_squad_size,
            default_periods: raw.default_periods,
            max_periods: raw.max_periods,
            schemas,
        })
    }

    pub fn schemas(&self) -> &[TeamModeSchema] {
        &self.schemas
    }

    pub fn schema(&self, mode: TeamMode) -> Option<&TeamModeSchema> {
        self.schemas.iter().find(|s| s.mode() == mode)
    }

    #[inline]
    pub fn is_squad_size_supported(&self, squad_size: u8) -> bool {
        (self.min_squad_size..=self.max_squad_size).contains(&squad_size)
    }

    #[inline]
    pub fn is_period_count_supported(&self, num_periods: u32) -> bool {
        (1..=self.max_periods).contains(&num_periods)
    }

    /// Deterministic mode selection for a configuration.
    pub fn resolve(&self, config: &TeamConfig) -> Option<&TeamModeSchema> {
        if !self.is_squad_size_supported(config.squad_size) {
            return None;
        }
        self.schema(config.team_mode()).filter(|s| s.format() == config.format)
    }

    /// Formations and substitution types selectable for a squad size.
    ///
    /// `None` when the size is outside the configured range; the setup screen
    /// disables its dependent sections in that case.
    pub fn options_for(&self, squad_size: u8) -> Option<ConfigOptions> {
        if !self.is_squad_size_supported(squad_size) {
            return None;
        }

        let mut formations = Vec::new();
        let mut substitution_types = Vec::new();
        // Individual first: it is the default substitution type.
        for sub_type in [SubstitutionType::Individual, SubstitutionType::Pairs] {
            for shape in [TacticalFormation::TwoTwo, TacticalFormation::OneTwoOne] {
                let exists = self.schemas.iter().any(|s| {
                    let mode = s.mode();
                    mode.squad_size() == squad_size
                        && mode.substitution_type() == sub_type
                        && mode.shape() == shape
                });
                if exists {
                    if !substitution_types.contains(&sub_type) {
                        substitution_types.push(sub_type);
                    }
                    if !formations.contains(&shape) {
                        formations.push(shape);
                    }
                }
            }
        }

        if substitution_types.is_empty() {
            return None;
        }
        Some(ConfigOptions { squad_size, formations, substitution_types })
    }
}
