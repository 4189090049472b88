//! Rally-phase tuning: shot quality weights and return checks.

use serde::{Deserialize, Serialize};

use super::invalid;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RallyConfig {
    /// Gaussian sigma on every sampled shot quality (default: 20.0)
    pub quality_sigma: f32,
    /// Serve quality weight on serve power, scale x10 (default: 6.5)
    pub serve_power_weight: f32,
    /// Serve quality weight on serve accuracy, scale x10 (default: 4.4)
    pub serve_accuracy_weight: f32,
    /// Rally shot weight on groundstroke (default: 6.0)
    pub rally_groundstroke_weight: f32,
    /// Rally shot weight on strength (default: 4.0)
    pub rally_strength_weight: f32,
    /// Defense weight on groundstroke (default: 6.0)
    pub defense_groundstroke_weight: f32,
    /// Defense weight on reflex (default: 4.0)
    pub defense_reflex_weight: f32,
    /// Baseline return success chance (default: 0.65)
    pub success_threshold: f32,
    /// Shot quality clamp ceiling, also the challenge normalizer (default: 1250.0)
    pub quality_ceiling: f32,
    /// Hard cap on rally length (default: 35)
    pub max_rally_length: u32,
}

impl RallyConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.quality_sigma <= 0.0 {
            return Err(invalid("quality_sigma must be positive"));
        }
        if self.quality_ceiling <= 1.0 {
            return Err(invalid("quality_ceiling must exceed the quality floor"));
        }
        if !(0.0..=1.0).contains(&self.success_threshold) {
            return Err(invalid("success_threshold must be within [0, 1]"));
        }
        if self.max_rally_length == 0 {
            return Err(invalid("max_rally_length must be at least 1"));
        }
        Ok(())
    }
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            quality_sigma: 20.0,
            serve_power_weight: 6.5,
            serve_accuracy_weight: 4.4,
            rally_groundstroke_weight: 6.0,
            rally_strength_weight: 4.0,
            defense_groundstroke_weight: 6.0,
            defense_reflex_weight: 4.0,
            success_threshold: 0.65,
            quality_ceiling: 1250.0,
            max_rally_length: 35,
        }
    }
}
