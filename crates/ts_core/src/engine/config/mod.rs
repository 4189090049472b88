//! # Simulation Tuning Configuration
//!
//! Every numeric knob of the probability models lives here, grouped by
//! concern. The defaults are the tuned "game feel" constants; a scenario
//! file can replace any of them without code changes.
//!
//! ## Usage
//! ```rust
//! use ts_core::engine::config::SimulationConfig;
//!
//! let config = SimulationConfig::default();
//! config.validate().expect("defaults are valid");
//! ```

mod fatigue_config;
mod rally_config;
mod rating_config;
mod serve_config;

pub use fatigue_config::FatigueConfig;
pub use rally_config::RallyConfig;
pub use rating_config::{RatingConfig, RatingWeights, TierBand, TierRanges};
pub use serve_config::{DoubleFaultTier, ServeConfig};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Full tuning bundle, one immutable value per simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// Serve phase: faults, double faults, aces.
    pub serve: ServeConfig,
    /// Rally phase: shot quality and return checks.
    pub rally: RallyConfig,
    /// Match-long and in-rally fatigue.
    pub fatigue: FatigueConfig,
    /// Overall-rating weights and tier bands.
    pub rating: RatingConfig,
}

impl SimulationConfig {
    /// Rejects configurations the probability models cannot run on.
    pub fn validate(&self) -> Result<()> {
        self.serve.validate()?;
        self.rally.validate()?;
        self.fatigue.validate()?;
        self.rating.validate()?;
        Ok(())
    }
}

pub(crate) fn invalid(reason: impl Into<String>) -> SimError {
    SimError::InvalidConfig {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip_preserves_tuning() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.serve.ace_ceiling_factor, config.serve.ace_ceiling_factor);
        assert_eq!(back.rally.max_rally_length, config.rally.max_rally_length);
        assert_eq!(back.rating.weights.groundstroke, config.rating.weights.groundstroke);
        back.validate().unwrap();
    }

    #[test]
    fn test_bad_sigma_rejected() {
        let mut config = SimulationConfig::default();
        config.serve.fault_sigma = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsorted_tiers_rejected() {
        let mut config = SimulationConfig::default();
        config.serve.double_fault_tiers.swap(0, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = SimulationConfig::default();
        config.rating.weights.clutch = 0.5;
        assert!(config.validate().is_err());
    }
}
