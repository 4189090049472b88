//! Overall-rating weights and tier bands.

use serde::{Deserialize, Serialize};

use super::invalid;
use crate::error::Result;
use crate::models::competitor::Tier;

/// Weights of the seven skills in the overall rating; must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingWeights {
    /// Groundstroke at 25%
    pub groundstroke: f32,
    /// Reflex at 20%
    pub reflex: f32,
    /// Strength at 20%
    pub strength: f32,
    /// Serve power at 12.5%
    pub serve_power: f32,
    /// Serve accuracy at 12.5%
    pub serve_accuracy: f32,
    /// Clutch at 5%
    pub clutch: f32,
    /// Stamina at 5%
    pub stamina: f32,
}

impl RatingWeights {
    pub fn sum(&self) -> f32 {
        self.groundstroke
            + self.reflex
            + self.strength
            + self.serve_power
            + self.serve_accuracy
            + self.clutch
            + self.stamina
    }
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            groundstroke: 0.25,
            reflex: 0.20,
            strength: 0.20,
            serve_power: 0.125,
            serve_accuracy: 0.125,
            clutch: 0.05,
            stamina: 0.05,
        }
    }
}

/// Inclusive overall-rating range of one tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierBand {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierRanges {
    pub elite: TierBand,
    pub pro: TierBand,
    pub challenger: TierBand,
    pub futures: TierBand,
    pub beginner: TierBand,
}

impl TierRanges {
    pub fn band(&self, tier: Tier) -> TierBand {
        match tier {
            Tier::Elite => self.elite,
            Tier::Pro => self.pro,
            Tier::Challenger => self.challenger,
            Tier::Futures => self.futures,
            Tier::Beginner => self.beginner,
        }
    }
}

impl Default for TierRanges {
    fn default() -> Self {
        Self {
            elite: TierBand { min: 86, max: 100 },
            pro: TierBand { min: 71, max: 85 },
            challenger: TierBand { min: 51, max: 70 },
            futures: TierBand { min: 31, max: 50 },
            beginner: TierBand { min: 1, max: 30 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RatingConfig {
    pub weights: RatingWeights,
    pub tiers: TierRanges,
}

impl RatingConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if (self.weights.sum() - 1.0).abs() > 1e-3 {
            return Err(invalid(format!(
                "rating weights must sum to 1.0, got {}",
                self.weights.sum()
            )));
        }
        for tier in Tier::ALL {
            let band = self.tiers.band(tier);
            if band.min == 0 || band.min > band.max || band.max > 100 {
                return Err(invalid(format!(
                    "tier band {:?} is empty or out of range",
                    tier
                )));
            }
        }
        Ok(())
    }
}
