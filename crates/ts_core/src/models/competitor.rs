//! Competitor profiles and per-match participant state.
//!
//! A `Competitor` is the immutable skill profile shared across a whole
//! simulation session; `MatchParticipant` is the small mutable state
//! (fatigue, games, sets) cloned from it at the start of every match.
//! Keeping the two apart lets any number of concurrent matches read the
//! same profile without racing on match-scoped fields.

use serde::Serialize;

use crate::engine::config::{RatingConfig, TierRanges};
use crate::engine::skill::overall_rating;
use crate::error::{Result, SimError};

/// The seven rated skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Skill {
    ServePower,
    ServeAccuracy,
    Groundstroke,
    Reflex,
    Stamina,
    Strength,
    Clutch,
}

impl Skill {
    pub const ALL: [Skill; 7] = [
        Skill::ServePower,
        Skill::ServeAccuracy,
        Skill::Groundstroke,
        Skill::Reflex,
        Skill::Stamina,
        Skill::Strength,
        Skill::Clutch,
    ];

    /// Short code used in roster displays (SP, SA, GS, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Skill::ServePower => "SP",
            Skill::ServeAccuracy => "SA",
            Skill::Groundstroke => "GS",
            Skill::Reflex => "REF",
            Skill::Stamina => "STA",
            Skill::Strength => "STR",
            Skill::Clutch => "CLT",
        }
    }
}

/// Seven integer skills, each guaranteed to be in [1, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillSet {
    serve_power: u8,
    serve_accuracy: u8,
    groundstroke: u8,
    reflex: u8,
    stamina: u8,
    strength: u8,
    clutch: u8,
}

impl SkillSet {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Builds a skill set, rejecting any value outside [1, 100].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        serve_power: u8,
        serve_accuracy: u8,
        groundstroke: u8,
        reflex: u8,
        stamina: u8,
        strength: u8,
        clutch: u8,
    ) -> Result<Self> {
        let set = Self {
            serve_power,
            serve_accuracy,
            groundstroke,
            reflex,
            stamina,
            strength,
            clutch,
        };
        for skill in Skill::ALL {
            let value = set.get(skill);
            if !(Self::MIN..=Self::MAX).contains(&value) {
                return Err(SimError::SkillOutOfRange { skill, value });
            }
        }
        Ok(set)
    }

    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::ServePower => self.serve_power,
            Skill::ServeAccuracy => self.serve_accuracy,
            Skill::Groundstroke => self.groundstroke,
            Skill::Reflex => self.reflex,
            Skill::Stamina => self.stamina,
            Skill::Strength => self.strength,
            Skill::Clutch => self.clutch,
        }
    }
}

/// Immutable competitor profile: identity, skills, derived overall rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitor {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub skills: SkillSet,
    overall: u8,
}

impl Competitor {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        country: impl Into<String>,
        skills: SkillSet,
        rating: &RatingConfig,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            country: country.into(),
            skills,
            overall: overall_rating(&skills, &rating.weights),
        }
    }

    /// Weighted average of the seven skills, fixed at construction.
    pub fn overall(&self) -> u8 {
        self.overall
    }

    pub fn tier(&self, ranges: &TierRanges) -> Tier {
        Tier::from_overall(self.overall, ranges)
    }
}

impl std::fmt::Display for Competitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = Skill::ALL
            .map(|skill| format!("{}: {}", skill.code(), self.skills.get(skill)))
            .join(", ");
        write!(f, "{} [{}] (OVR: {} | {})", self.name, self.country, self.overall, line)
    }
}

/// Overall-rating bands used for batch pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Elite,
    Pro,
    Challenger,
    Futures,
    Beginner,
}

impl Tier {
    /// Strongest first, the order batch sweeps iterate in.
    pub const ALL: [Tier; 5] = [
        Tier::Elite,
        Tier::Pro,
        Tier::Challenger,
        Tier::Futures,
        Tier::Beginner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Elite => "Elite",
            Tier::Pro => "Pro",
            Tier::Challenger => "Challenger",
            Tier::Futures => "Futures",
            Tier::Beginner => "Beginner",
        }
    }

    pub fn from_overall(overall: u8, ranges: &TierRanges) -> Tier {
        for tier in Tier::ALL {
            let band = ranges.band(tier);
            if overall >= band.min && overall <= band.max {
                return tier;
            }
        }
        // Bands cover [1, 100]; anything outside clamps to the edges.
        if overall > ranges.band(Tier::Elite).max {
            Tier::Elite
        } else {
            Tier::Beginner
        }
    }
}

/// Match-scoped mutable state layered over a shared profile.
///
/// Fatigue counts accumulated rally shots and only ever grows during a
/// match; `games_won` is the running games counter of the current set.
#[derive(Debug, Clone)]
pub struct MatchParticipant<'a> {
    pub profile: &'a Competitor,
    pub fatigue: f32,
    pub games_won: u8,
    pub sets_won: u8,
}

impl<'a> MatchParticipant<'a> {
    pub fn new(profile: &'a Competitor) -> Self {
        Self {
            profile,
            fatigue: 0.0,
            games_won: 0,
            sets_won: 0,
        }
    }

    /// Base (unfatigued) skill value.
    pub fn skill(&self, skill: Skill) -> u8 {
        self.profile.skills.get(skill)
    }
}
