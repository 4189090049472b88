//! Finished-match result data.

use serde::Serialize;

use crate::engine::stats::StatsTracker;

/// Final game count of one set, side 0 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetScore {
    pub games: [u8; 2],
    /// The set went to 6-6 and was decided by a tiebreak (recorded 7-6).
    pub tiebreak: bool,
}

/// Everything a match hands back to its caller.
///
/// Read-only after the match ends; the statistics inside are the finalized
/// accumulator owned by this match alone.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// Participant index (0 or 1) of the match winner.
    pub winner: usize,
    pub winner_id: u32,
    pub sets_won: [u8; 2],
    pub set_scores: Vec<SetScore>,
    pub statistics: StatsTracker,
}

impl MatchResult {
    /// Total sets played, never more than the configured best-of.
    pub fn sets_played(&self) -> u8 {
        self.sets_won[0] + self.sets_won[1]
    }

    /// Final score from the winner's perspective, e.g. "3-1".
    pub fn score_line(&self) -> String {
        let loser = 1 - self.winner;
        format!("{}-{}", self.sets_won[self.winner], self.sets_won[loser])
    }
}
