//! # ts_core - Deterministic Tennis Match Simulation Engine
//!
//! Point-by-point tennis simulation driven by skill-based probability
//! models (serve, rally, fatigue) composed into game, set and match
//! state machines, with a statistics tracker observing the point stream.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Exact tennis scoring: deuce/advantage margins, 6-6 tiebreaks with
//!   rotating serve, best-of-N sets
//! - Injectable point resolvers (silent or point-by-point tracing)
//! - Parallel batch sweeps over tier and rating pairings

pub mod batch;
pub mod engine;
pub mod error;
pub mod models;

// Re-export the main API surface.
pub use batch::{
    BatchPlan, BatchReport, CompetitorPool, MatchRecord, MatrixEntry, MatrixReport,
    PairingAggregate, PairingOutcome,
};
pub use engine::config::{
    DoubleFaultTier, FatigueConfig, RallyConfig, RatingConfig, RatingWeights, ServeConfig,
    SimulationConfig, TierBand, TierRanges,
};
pub use engine::match_sim::{MatchEngine, MatchPlan};
pub use engine::point::{PointResolver, SilentResolver, TraceResolver};
pub use engine::skill::overall_rating;
pub use engine::stats::{MatchSummary, OutcomeTally, StatsTracker};
pub use error::{Result, SimError};
pub use models::{
    Competitor, MatchParticipant, MatchResult, OutcomeKind, PointOutcome, SetScore, Skill,
    SkillSet, Tier,
};
