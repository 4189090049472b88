//! Fatigue tuning: match-long decay and in-rally quality discount.

use serde::{Deserialize, Serialize};

use super::invalid;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueConfig {
    /// Resistance to match-long fatigue; higher = more resistance
    /// (default: 60.0). Penalty = fatigue / (stamina * scalar).
    pub stamina_scalar: f32,
    /// In-rally fatigue: per-shot penalty = (scalar - stamina) / divisor
    /// (defaults: 105.0 / 10000.0).
    pub rally_fatigue_scalar: f32,
    pub rally_fatigue_divisor: f32,
}

impl FatigueConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.stamina_scalar <= 0.0 {
            return Err(invalid("stamina_scalar must be positive"));
        }
        if self.rally_fatigue_divisor <= 0.0 {
            return Err(invalid("rally_fatigue_divisor must be positive"));
        }
        Ok(())
    }
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            stamina_scalar: 60.0,
            rally_fatigue_scalar: 105.0,
            rally_fatigue_divisor: 10000.0,
        }
    }
}
