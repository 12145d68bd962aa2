//! PairedRoleStrategy - defender/attacker handling of rotating pairs
//!
//! Only meaningful for 5v5 in the 2-2 shape with 7 or 9 players, where the
//! squad splits evenly into pairs behind the goalie.

use crate::models::{MatchFormat, PairAssignment, PairedRoleStrategy, TacticalFormation, TeamConfig};

/// Squad sizes where the outfield squad divides into pairs.
pub const PAIRED_ROLE_SQUAD_SIZES: [u8; 2] = [7, 9];

/// Whether the strategy choice exists for this configuration.
pub fn is_applicable(config: &TeamConfig) -> bool {
    config.format == MatchFormat::FiveASide
        && config.formation == TacticalFormation::TwoTwo
        && PAIRED_ROLE_SQUAD_SIZES.contains(&config.squad_size)
}

/// Strategy in effect; inapplicable configurations ignore the stored value.
pub fn effective_strategy(config: &TeamConfig) -> PairedRoleStrategy {
    if is_applicable(config) {
        config.paired_role_strategy.unwrap_or_default()
    } else {
        PairedRoleStrategy::KeepThroughoutPeriod
    }
}

/// Pair layout for a pair coming back onto the field.
pub fn on_reentry(strategy: PairedRoleStrategy, pair: PairAssignment) -> PairAssignment {
    match strategy {
        PairedRoleStrategy::KeepThroughoutPeriod => pair,
        PairedRoleStrategy::SwapEveryRotation => {
            PairAssignment { defender: pair.attacker, attacker: pair.defender }
        }
    }
}
