//! TeamModeSchema - slot layout per team mode
//!
//! Consumers iterate the schema instead of matching on team modes, so a new
//! mode only needs a catalogue entry.

use serde::{Deserialize, Serialize};

use super::paired_role;
use crate::data::{catalog, TeamModeCatalog};
use crate::models::{MatchFormat, PairKey, SlotId, SubstitutionType, TacticalFormation, TeamConfig, TeamMode};

/// One slot of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSpec {
    pub slot: SlotId,
    /// Required slots must be filled before a period can start.
    pub required: bool,
}

/// Ordered slot set of one team mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamModeSchema {
    mode: TeamMode,
    format: MatchFormat,
    slots: Vec<SlotSpec>,
}

impl TeamModeSchema {
    pub fn new(mode: TeamMode, format: MatchFormat, slots: Vec<SlotSpec>) -> Self {
        Self { mode, format, slots }
    }

    /// Schema of the built-in catalogue for `config`.
    pub fn resolve(config: &TeamConfig) -> Option<&'static TeamModeSchema> {
        catalog().resolve(config)
    }

    #[inline]
    pub fn mode(&self) -> TeamMode {
        self.mode
    }

    #[inline]
    pub fn format(&self) -> MatchFormat {
        self.format
    }

    /// Pair-based modes group slots into atomic pairs.
    #[inline]
    pub fn is_paired(&self) -> bool {
        self.mode.is_paired()
    }

    pub fn slot_specs(&self) -> &[SlotSpec] {
        &self.slots
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.iter().map(|s| s.slot)
    }

    pub fn required_slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.iter().filter(|s| s.required).map(|s| s.slot)
    }

    #[inline]
    pub fn contains(&self, slot: SlotId) -> bool {
        self.slots.iter().any(|s| s.slot == slot)
    }

    pub fn is_required(&self, slot: SlotId) -> bool {
        self.slots.iter().any(|s| s.slot == slot && s.required)
    }

    /// Outfield slots in schema order.
    pub fn field_slots(&self) -> Vec<SlotId> {
        self.slots().filter(|s| s.is_field()).collect()
    }

    /// Individual bench slots in schema order (empty for paired modes).
    pub fn substitute_slots(&self) -> Vec<SlotId> {
        self.slots().filter(|s| matches!(s, SlotId::Substitute(_))).collect()
    }

    /// Pair keys in schema order, field pairs first.
    pub fn pair_keys(&self) -> Vec<PairKey> {
        let mut keys: Vec<PairKey> = Vec::new();
        for key in self.slots().filter_map(SlotId::pair_key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn field_pair_keys(&self) -> Vec<PairKey> {
        self.pair_keys().into_iter().filter(|k| k.is_field()).collect()
    }

    pub fn sub_pair_keys(&self) -> Vec<PairKey> {
        self.pair_keys().into_iter().filter(|k| !k.is_field()).collect()
    }

    /// Number of players on the pitch besides the goalie.
    #[inline]
    pub fn field_player_count(&self) -> usize {
        self.slots.iter().filter(|s| s.slot.is_field()).count()
    }
}

/// Selectable configuration values for one squad size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOptions {
    pub squad_size: u8,
    pub formations: Vec<TacticalFormation>,
    pub substitution_types: Vec<SubstitutionType>,
}

impl ConfigOptions {
    /// Options of the built-in catalogue; `None` outside the supported range.
    pub fn for_squad_size(squad_size: u8) -> Option<Self> {
        catalog().options_for(squad_size)
    }
}

/// Re-derives a configuration after the squad size changed.
///
/// Choices that are still valid survive; incompatible ones fall back to the
/// first available option. A paired-role strategy is kept only where it
/// applies. Returns `None` for an unsupported squad size.
pub fn reconfigure_for_squad_size(
    catalog: &TeamModeCatalog,
    config: &TeamConfig,
    squad_size: u8,
) -> Option<TeamConfig> {
    let options = catalog.options_for(squad_size)?;

    let substitution_type = if options.substitution_types.contains(&config.substitution_type) {
        config.substitution_type
    } else {
        options.substitution_types[0]
    };

    let mode_exists = |shape: TacticalFormation| {
        let candidate = TeamConfig { squad_size, formation: shape, substitution_type, ..config.clone() };
        catalog.resolve(&candidate).is_some()
    };
    let formation = if mode_exists(config.formation) {
        config.formation
    } else {
        options.formations.iter().copied().find(|f| mode_exists(*f))?
    };

    let mut next = TeamConfig {
        format: config.format,
        squad_size,
        formation,
        substitution_type,
        paired_role_strategy: None,
    };
    if paired_role::is_applicable(&next) {
        next.paired_role_strategy = config.paired_role_strategy;
    } else if config.paired_role_strategy.is_some() {
        log::debug!("Dropping paired-role strategy: not applicable for {} players", squad_size);
    }

    if next.substitution_type != config.substitution_type || next.formation != config.formation {
        log::debug!(
            "Squad size {} -> {}: re-derived {} / {}",
            config.squad_size,
            squad_size,
            next.substitution_type.code(),
            next.formation.code()
        );
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog;
    use crate::models::{FieldPosition, PairPosition, PairedRoleStrategy};

    #[test]
    fn test_schema_queries_pairs_7() {
        let schema = catalog().schema(TeamMode::Pairs { squad_size: 7 }).expect("pairs_7");
        assert_eq!(schema.field_player_count(), 4);
        assert_eq!(schema.field_pair_keys(), vec![PairKey::LeftPair, PairKey::RightPair]);
        assert_eq!(schema.sub_pair_keys(), vec![PairKey::SubPair]);
        assert!(schema.substitute_slots().is_empty());
        assert!(schema.is_required(SlotId::Pair(PairKey::SubPair, PairPosition::Attacker)));
    }

    #[test]
    fn test_individual_bench_is_optional() {
        let schema = catalog()
            .schema(TeamMode::Individual { squad_size: 6, shape: TacticalFormation::TwoTwo })
            .expect("individual_6");
        assert!(schema.is_required(SlotId::Goalie));
        assert!(schema.is_required(SlotId::Field(FieldPosition::LeftDefender)));
        assert!(!schema.is_required(SlotId::Substitute(1)));
        assert_eq!(schema.required_slots().count(), 5);
    }

    #[test]
    fn test_resolve_and_options() {
        let config = TeamConfig::new(7, TacticalFormation::TwoTwo, SubstitutionType::Individual);
        let schema = TeamModeSchema::resolve(&config).expect("individual_7");
        assert_eq!(schema.substitute_slots(), vec![SlotId::Substitute(1), SlotId::Substitute(2)]);

        let seven = ConfigOptions::for_squad_size(7).expect("7 supported");
        assert_eq!(seven.substitution_types, vec![SubstitutionType::Individual, SubstitutionType::Pairs]);
        let eight = ConfigOptions::for_squad_size(8).expect("8 supported");
        assert_eq!(eight.substitution_types, vec![SubstitutionType::Individual]);
        assert!(ConfigOptions::for_squad_size(4).is_none());
    }

    #[test]
    fn test_reconfigure_keeps_compatible_choices() {
        let config = TeamConfig::new(7, TacticalFormation::OneTwoOne, SubstitutionType::Individual);
        let next = reconfigure_for_squad_size(catalog(), &config, 8).expect("8 supported");
        assert_eq!(next.squad_size, 8);
        assert_eq!(next.formation, TacticalFormation::OneTwoOne);
        assert_eq!(next.substitution_type, SubstitutionType::Individual);
    }

    #[test]
    fn test_reconfigure_drops_incompatible_pairs() {
        let mut config = TeamConfig::new(7, TacticalFormation::TwoTwo, SubstitutionType::Pairs);
        config.paired_role_strategy = Some(PairedRoleStrategy::SwapEveryRotation);

        let eight = reconfigure_for_squad_size(catalog(), &config, 8).expect("8 supported");
        assert_eq!(eight.substitution_type, SubstitutionType::Individual);
        assert_eq!(eight.paired_role_strategy, None);

        let nine = reconfigure_for_squad_size(catalog(), &config, 9).expect("9 supported");
        assert_eq!(nine.substitution_type, SubstitutionType::Pairs);
        assert_eq!(nine.paired_role_strategy, Some(PairedRoleStrategy::SwapEveryRotation));
    }

    #[test]
    fn test_reconfigure_out_of_range_disables() {
        let config = TeamConfig::new(7, TacticalFormation::TwoTwo, SubstitutionType::Individual);
        assert!(reconfigure_for_squad_size(catalog(), &config, 3).is_none());
        assert!(reconfigure_for_squad_size(catalog(), &config, 12).is_none());
    }
}
