//! Serve-phase tuning: fault chance, double-fault tiers, ace chance.

use serde::{Deserialize, Serialize};

use super::invalid;
use crate::error::Result;

/// One double-fault tier: applies to servers whose accuracy is at or
/// below `max_accuracy`. The table is ordered ascending and the first
/// matching tier wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DoubleFaultTier {
    pub max_accuracy: u8,
    pub rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Gaussian sigma applied to the first-serve success chance (default: 5.0)
    pub fault_sigma: f32,
    /// Baseline first-serve success before accuracy scaling (default: 45.0)
    pub baseline_floor: f32,
    /// First-serve success gained per point of accuracy (default: 0.4)
    pub accuracy_weight: f32,
    /// Success lost per point of serve power above the threshold (default: 0.12)
    pub power_penalty_rate: f32,
    /// Serve power above this costs first-serve consistency (default: 50.0)
    pub power_threshold: f32,
    /// Global scale on the ace chance (default: 0.35)
    pub ace_ceiling_factor: f32,
    /// Lower bound on the receiver defense multiplier (default: 0.05)
    pub defense_floor: f32,
    /// Base double-fault rates keyed by ascending accuracy thresholds
    pub double_fault_tiers: Vec<DoubleFaultTier>,
    /// Double-fault shift per point of clutch away from 50 (default: 0.07)
    pub clutch_modifier_rate: f32,
    /// Floor on the final double-fault rate (default: 1.0)
    pub min_double_fault_rate: f32,
}

impl ServeConfig {
    /// Base double-fault rate for a serve accuracy value: the first tier
    /// whose threshold is at or above the accuracy. Accuracy past the last
    /// tier falls back to 100 (only reachable with a truncated table).
    pub fn double_fault_rate(&self, accuracy: f32) -> f32 {
        for tier in &self.double_fault_tiers {
            if accuracy <= tier.max_accuracy as f32 {
                return tier.rate;
            }
        }
        100.0
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.fault_sigma <= 0.0 {
            return Err(invalid("fault_sigma must be positive"));
        }
        if self.double_fault_tiers.is_empty() {
            return Err(invalid("double_fault_tiers must not be empty"));
        }
        let ascending = self
            .double_fault_tiers
            .windows(2)
            .all(|pair| pair[0].max_accuracy < pair[1].max_accuracy);
        if !ascending {
            return Err(invalid(
                "double_fault_tiers thresholds must be strictly ascending",
            ));
        }
        if self.min_double_fault_rate < 0.0 {
            return Err(invalid("min_double_fault_rate must not be negative"));
        }
        Ok(())
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            fault_sigma: 5.0,
            baseline_floor: 45.0,
            accuracy_weight: 0.4,
            power_penalty_rate: 0.12,
            power_threshold: 50.0,
            ace_ceiling_factor: 0.35,
            defense_floor: 0.05,
            double_fault_tiers: vec![
                DoubleFaultTier { max_accuracy: 30, rate: 24.0 },
                DoubleFaultTier { max_accuracy: 50, rate: 19.0 },
                DoubleFaultTier { max_accuracy: 70, rate: 15.5 },
                DoubleFaultTier { max_accuracy: 85, rate: 13.5 },
                DoubleFaultTier { max_accuracy: 100, rate: 9.0 },
            ],
            clutch_modifier_rate: 0.07,
            min_double_fault_rate: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_lookup_takes_first_match() {
        let serve = ServeConfig::default();
        assert_eq!(serve.double_fault_rate(12.0), 24.0);
        assert_eq!(serve.double_fault_rate(30.0), 24.0);
        assert_eq!(serve.double_fault_rate(31.0), 19.0);
        assert_eq!(serve.double_fault_rate(70.0), 15.5);
        assert_eq!(serve.double_fault_rate(99.0), 9.0);
    }
}
