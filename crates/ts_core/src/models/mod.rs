pub mod competitor;
pub mod outcome;
pub mod result;

pub use competitor::{Competitor, MatchParticipant, Skill, SkillSet, Tier};
pub use outcome::{OutcomeKind, PointOutcome};
pub use result::{MatchResult, SetScore};
