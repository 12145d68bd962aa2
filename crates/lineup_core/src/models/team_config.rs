use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

// ============================================================================
// Configuration enums
// ============================================================================

/// Match format. Only small-sided 5v5 is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    #[serde(rename = "5v5")]
    FiveASide,
}

impl MatchFormat {
    pub const fn code(self) -> &'static str {
        match self {
            MatchFormat::FiveASide => "5v5",
        }
    }
}

/// Tactical shape of the four outfield players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TacticalFormation {
    #[default]
    #[serde(rename = "2-2")]
    TwoTwo,
    #[serde(rename = "1-2-1")]
    OneTwoOne,
}

impl TacticalFormation {
    pub const fn code(self) -> &'static str {
        match self {
            TacticalFormation::TwoTwo => "2-2",
            TacticalFormation::OneTwoOne => "1-2-1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubstitutionType {
    Pairs,
    #[default]
    Individual,
}

impl SubstitutionType {
    pub const fn code(self) -> &'static str {
        match self {
            SubstitutionType::Pairs => "pairs",
            SubstitutionType::Individual => "individual",
        }
    }
}

/// How a pair's defender/attacker roles behave across rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairedRoleStrategy {
    #[default]
    KeepThroughoutPeriod,
    SwapEveryRotation,
}

// ============================================================================
// TeamMode
// ============================================================================

/// Squad configuration a formation is laid out for.
///
/// String codes: `pairs_7`, `individual_6` (2-2 shape), `individual_6_121`
/// (1-2-1 shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TeamMode {
    Pairs { squad_size: u8 },
    Individual { squad_size: u8, shape: TacticalFormation },
}

impl TeamMode {
    #[inline]
    pub const fn squad_size(self) -> u8 {
        match self {
            TeamMode::Pairs { squad_size } | TeamMode::Individual { squad_size, .. } => squad_size,
        }
    }

    #[inline]
    pub const fn is_paired(self) -> bool {
        matches!(self, TeamMode::Pairs { .. })
    }

    pub const fn substitution_type(self) -> SubstitutionType {
        match self {
            TeamMode::Pairs { .. } => SubstitutionType::Pairs,
            TeamMode::Individual { .. } => SubstitutionType::Individual,
        }
    }

    /// Paired modes only exist in the 2-2 shape.
    pub const fn shape(self) -> TacticalFormation {
        match self {
            TeamMode::Pairs { .. } => TacticalFormation::TwoTwo,
            TeamMode::Individual { shape, .. } => shape,
        }
    }
}

impl fmt::Display for TeamMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamMode::Pairs { squad_size } => write!(f, "pairs_{}", squad_size),
            TeamMode::Individual { squad_size, shape: TacticalFormation::TwoTwo } => {
                write!(f, "individual_{}", squad_size)
            }
            TeamMode::Individual { squad_size, shape: TacticalFormation::OneTwoOne } => {
                write!(f, "individual_{}_121", squad_size)
            }
        }
    }
}

impl FromStr for TeamMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CatalogError::UnknownTeamMode(s.to_string());
        let parse_size = |n: &str| n.parse::<u8>().map_err(|_| unknown());

        if let Some(rest) = s.strip_prefix("pairs_") {
            return Ok(TeamMode::Pairs { squad_size: parse_size(rest)? });
        }
        if let Some(rest) = s.strip_prefix("individual_") {
            return match rest.split_once('_') {
                None => Ok(TeamMode::Individual {
                    squad_size: parse_size(rest)?,
                    shape: TacticalFormation::TwoTwo,
                }),
                Some((size, "121")) => Ok(TeamMode::Individual {
                    squad_size: parse_size(size)?,
                    shape: TacticalFormation::OneTwoOne,
                }),
                Some(_) => Err(unknown()),
            };
        }
        Err(unknown())
    }
}

impl From<TeamMode> for String {
    fn from(mode: TeamMode) -> Self {
        mode.to_string()
    }
}

impl TryFrom<String> for TeamMode {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// TeamConfig
// ============================================================================

/// Squad configuration chosen on the setup screen.
///
/// Changing the squad size goes through
/// [`crate::engine::team_mode::reconfigure_for_squad_size`] so that
/// incompatible choices are re-derived rather than carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    #[serde(default)]
    pub format: MatchFormat,
    pub squad_size: u8,
    #[serde(default)]
    pub formation: TacticalFormation,
    #[serde(default)]
    pub substitution_type: SubstitutionType,
    #[serde(default)]
    pub paired_role_strategy: Option<PairedRoleStrategy>,
}

impl TeamConfig {
    pub fn new(
        squad_size: u8,
        formation: TacticalFormation,
        substitution_type: SubstitutionType,
    ) -> Self {
        Self {
            format: MatchFormat::FiveASide,
            squad_size,
            formation,
            substitution_type,
            paired_role_strategy: None,
        }
    }

    /// Team mode implied by this configuration (existence is checked
    /// against the catalogue separately).
    pub fn team_mode(&self) -> TeamMode {
        match self.substitution_type {
            SubstitutionType::Pairs => TeamMode::Pairs { squad_size: self.squad_size },
            SubstitutionType::Individual => {
                TeamMode::Individual { squad_size: self.squad_size, shape: self.formation }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_mode_codes_round_trip() {
        let modes = [
            TeamMode::Pairs { squad_size: 7 },
            TeamMode::Individual { squad_size: 6, shape: TacticalFormation::TwoTwo },
            TeamMode::Individual { squad_size: 8, shape: TacticalFormation::OneTwoOne },
        ];
        for mode in modes {
            let code = mode.to_string();
            assert_eq!(code.parse::<TeamMode>().expect("parse"), mode, "code {}", code);
        }
        assert_eq!(TeamMode::Pairs { squad_size: 7 }.to_string(), "pairs_7");
        assert_eq!(
            TeamMode::Individual { squad_size: 8, shape: TacticalFormation::OneTwoOne }.to_string(),
            "individual_8_121"
        );
    }

    #[test]
    fn test_team_mode_rejects_garbage() {
        assert!("pairs_x".parse::<TeamMode>().is_err());
        assert!("individual_6_22".parse::<TeamMode>().is_err());
        assert!("relay_6".parse::<TeamMode>().is_err());
    }

    #[test]
    fn test_config_team_mode() {
        let pairs = TeamConfig::new(7, TacticalFormation::TwoTwo, SubstitutionType::Pairs);
        assert_eq!(pairs.team_mode(), TeamMode::Pairs { squad_size: 7 });
        assert!(pairs.team_mode().is_paired());

        let individual = TeamConfig::new(6, TacticalFormation::OneTwoOne, SubstitutionType::Individual);
        assert_eq!(
            individual.team_mode(),
            TeamMode::Individual { squad_size: 6, shape: TacticalFormation::OneTwoOne }
        );
    }

    #[test]
    fn test_config_json_shape() {
        let json = r#"{"squadSize":7,"formation":"2-2","substitutionType":"pairs","pairedRoleStrategy":"SWAP_EVERY_ROTATION"}"#;
        let config: TeamConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.format, MatchFormat::FiveASide);
        assert_eq!(config.substitution_type, SubstitutionType::Pairs);
        assert_eq!(config.paired_role_strategy, Some(PairedRoleStrategy::SwapEveryRotation));
    }
}
