//! Rotation and formation engine.

pub mod formation_validator;
pub mod goalie;
pub mod numeric;
pub mod outcome;
pub mod paired_role;
pub mod recommendation;
pub mod rotation;
pub mod rotation_queue;
pub mod session;
pub mod team_mode;
pub mod time_tracker;

pub use formation_validator::{FormationIssue, FormationValidator};
pub use goalie::{apply_goalie_swap, plan_goalie_change, GoalieSwap, PeriodGoalieAssignment};
pub use outcome::{EventOutcome, Rejection};
pub use recommendation::{
    recommend_formation, FormationRecommender, IndividualRecommender, PairRecommender,
    RecommendationContext,
};
pub use rotation::{plan_rotation, RotationPlan};
pub use rotation_queue::{QueuePosition, RotationQueue};
pub use session::{reduce, MatchSession, PeriodClock, SessionEvent, ValidationState};
pub use team_mode::{reconfigure_for_squad_size, ConfigOptions, SlotSpec, TeamModeSchema};
