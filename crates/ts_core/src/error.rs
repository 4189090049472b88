use thiserror::Error;

use crate::models::Skill;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("skill {skill:?} out of range: {value} (expected 1..=100)")]
    SkillOutOfRange { skill: Skill, value: u8 },

    #[error("best-of set count must be odd and nonzero, got {best_of}")]
    InvalidBestOf { best_of: u8 },

    #[error("no competitors available for {pool}")]
    EmptyPool { pool: String },

    #[error("invalid simulation config: {reason}")]
    InvalidConfig { reason: String },
}

impl SimError {
    /// Errors that a batch run survives by skipping the current pairing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::EmptyPool { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
