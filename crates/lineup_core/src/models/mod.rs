pub mod formation;
pub mod game_log;
pub mod player;
pub mod team_config;

pub use formation::{FieldPosition, Formation, PairAssignment, PairKey, PairPosition, SlotId};
pub use game_log::{GameLogEntry, SubstitutionRecord};
pub use player::{Player, PlayerId, PlayerRole, PlayerStats, PlayerStatus};
pub use team_config::{
    MatchFormat, PairedRoleStrategy, SubstitutionType, TacticalFormation, TeamConfig, TeamMode,
};
