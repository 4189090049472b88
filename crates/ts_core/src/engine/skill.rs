//! Effective-skill math: match-long fatigue discounting and overall rating.
//!
//! Every in-match probability formula reads skills through
//! [`MatchParticipant::effective_skill`]; only the physical skills
//! (serve power, groundstroke, reflex) decay with fatigue.

use crate::engine::config::{FatigueConfig, RatingWeights};
use crate::models::competitor::{MatchParticipant, Skill, SkillSet};

/// Hard cap on the match-long fatigue penalty.
pub(crate) const MAX_FATIGUE_PENALTY: f32 = 0.4;
/// An effective skill never drops below this.
pub(crate) const MIN_EFFECTIVE_SKILL: f32 = 1.0;

impl MatchParticipant<'_> {
    /// Skill value after match-long fatigue, guaranteed within
    /// `[1.0, base]`. Stamina, strength and clutch pass through unmodified.
    pub fn effective_skill(&self, skill: Skill, fatigue: &FatigueConfig) -> f32 {
        let base = self.skill(skill) as f32;
        match skill {
            Skill::ServePower | Skill::Groundstroke | Skill::Reflex => {
                let stamina = self.skill(Skill::Stamina) as f32;
                let penalty =
                    (self.fatigue / (stamina * fatigue.stamina_scalar)).min(MAX_FATIGUE_PENALTY);
                (base * (1.0 - penalty)).max(MIN_EFFECTIVE_SKILL)
            }
            Skill::ServeAccuracy | Skill::Stamina | Skill::Strength | Skill::Clutch => base,
        }
    }
}

/// Integer part of the fixed weighted average of the seven skills.
/// Summed in f64 so integer-valued sums truncate stably.
pub fn overall_rating(skills: &SkillSet, weights: &RatingWeights) -> u8 {
    let weighted = skills.get(Skill::Groundstroke) as f64 * weights.groundstroke as f64
        + skills.get(Skill::Reflex) as f64 * weights.reflex as f64
        + skills.get(Skill::Strength) as f64 * weights.strength as f64
        + skills.get(Skill::ServePower) as f64 * weights.serve_power as f64
        + skills.get(Skill::ServeAccuracy) as f64 * weights.serve_accuracy as f64
        + skills.get(Skill::Clutch) as f64 * weights.clutch as f64
        + skills.get(Skill::Stamina) as f64 * weights.stamina as f64;
    weighted as u8
}
