//! Match statistics: a pure accumulator over the point stream plus
//! game/set boundary events, finalized into a formatted summary.
//!
//! The tracker holds no simulation logic and is owned by exactly one
//! match. Any summary ratio with a zero denominator resolves to `None`
//! and renders as "N/A"; nothing here ever fails.

use serde::Serialize;

use crate::models::outcome::{OutcomeKind, PointOutcome};

/// Tally of how points ended, match-wide.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OutcomeTally {
    pub aces: u32,
    pub double_faults: u32,
    pub forced_errors: u32,
}

impl OutcomeTally {
    fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Ace => self.aces += 1,
            OutcomeKind::DoubleFault => self.double_faults += 1,
            OutcomeKind::ForcedError => self.forced_errors += 1,
        }
    }
}

/// Per-match statistics accumulator. Two-element arrays are indexed by
/// participant (side 0 / side 1).
#[derive(Debug, Clone, Serialize)]
pub struct StatsTracker {
    names: [String; 2],
    pub total_points: u32,
    pub points_won: [u32; 2],
    pub outcomes: OutcomeTally,
    pub rally_length_sum: u64,
    pub rally_samples: u32,
    pub longest_rally: u32,
    pub serves_attempted: [u32; 2],
    pub first_serve_faults: [u32; 2],
    pub first_serve_points_won: [u32; 2],
    pub second_serve_points_faced: [u32; 2],
    pub second_serve_points_won: [u32; 2],
    pub service_games_played: [u32; 2],
    pub service_games_won: [u32; 2],
    pub games_per_set: Vec<u8>,
    pub tiebreaks_played: u32,
}

impl StatsTracker {
    pub fn new(names: [String; 2]) -> Self {
        Self {
            names,
            total_points: 0,
            points_won: [0; 2],
            outcomes: OutcomeTally::default(),
            rally_length_sum: 0,
            rally_samples: 0,
            longest_rally: 0,
            serves_attempted: [0; 2],
            first_serve_faults: [0; 2],
            first_serve_points_won: [0; 2],
            second_serve_points_faced: [0; 2],
            second_serve_points_won: [0; 2],
            service_games_played: [0; 2],
            service_games_won: [0; 2],
            games_per_set: Vec::new(),
            tiebreaks_played: 0,
        }
    }

    pub fn name(&self, side: usize) -> &str {
        &self.names[side]
    }

    /// Records one resolved point served by `server`.
    ///
    /// Double faults do not count as a serve attempt; every other point
    /// is attributed to the first-serve or second-serve bucket by the
    /// fault flag.
    pub fn record_point(&mut self, server: usize, outcome: &PointOutcome) {
        self.total_points += 1;
        self.points_won[outcome.winner] += 1;
        self.outcomes.record(outcome.kind);
        self.longest_rally = self.longest_rally.max(outcome.rally_length);
        if outcome.rally_length > 0 {
            self.rally_length_sum += outcome.rally_length as u64;
            self.rally_samples += 1;
        }

        if outcome.kind == OutcomeKind::DoubleFault {
            return;
        }
        self.serves_attempted[server] += 1;
        if !outcome.first_serve_fault {
            if outcome.winner == server {
                self.first_serve_points_won[server] += 1;
            }
        } else {
            self.first_serve_faults[server] += 1;
            self.second_serve_points_faced[server] += 1;
            if outcome.winner == server {
                self.second_serve_points_won[server] += 1;
            }
        }
    }

    pub fn record_service_game(&mut self, server: usize, winner: usize) {
        self.service_games_played[server] += 1;
        if server == winner {
            self.service_games_won[server] += 1;
        }
    }

    pub fn record_set(&mut self, games: [u8; 2]) {
        self.games_per_set.push(games[0] + games[1]);
    }

    pub fn record_tiebreak(&mut self) {
        self.tiebreaks_played += 1;
    }

    /// First serves that landed in, per side.
    pub fn first_serves_in(&self, side: usize) -> u32 {
        self.serves_attempted[side] - self.first_serve_faults[side]
    }

    /// Finalizes the counters into the summary view.
    pub fn summarize(&self) -> MatchSummary {
        let total_games: u32 = self.games_per_set.iter().map(|&g| g as u32).sum();
        MatchSummary {
            names: self.names.clone(),
            total_points: self.total_points,
            avg_rally_length: ratio(self.rally_length_sum as f32, self.rally_samples),
            longest_rally: self.longest_rally,
            tiebreaks_played: self.tiebreaks_played,
            avg_games_per_set: ratio(total_games as f32, self.games_per_set.len() as u32),
            hold_pct: [
                pct(self.service_games_won[0], self.service_games_played[0]),
                pct(self.service_games_won[1], self.service_games_played[1]),
            ],
            first_serve_win_pct: [
                pct(self.first_serve_points_won[0], self.first_serves_in(0)),
                pct(self.first_serve_points_won[1], self.first_serves_in(1)),
            ],
            second_serve_win_pct: [
                pct(self.second_serve_points_won[0], self.second_serve_points_faced[0]),
                pct(self.second_serve_points_won[1], self.second_serve_points_faced[1]),
            ],
        }
    }
}

/// `numerator / denominator`, or `None` on a zero denominator.
pub(crate) fn ratio(numerator: f32, denominator: u32) -> Option<f32> {
    if denominator == 0 {
        None
    } else {
        Some(numerator / denominator as f32)
    }
}

/// Percentage, or `None` on a zero denominator.
pub(crate) fn pct(numerator: u32, denominator: u32) -> Option<f32> {
    ratio(numerator as f32 * 100.0, denominator)
}

pub(crate) fn fmt_pct(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "N/A".to_string(),
    }
}

pub(crate) fn fmt_avg(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Finalized match summary; undefined ratios are `None` ("N/A").
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub names: [String; 2],
    pub total_points: u32,
    pub avg_rally_length: Option<f32>,
    pub longest_rally: u32,
    pub tiebreaks_played: u32,
    pub avg_games_per_set: Option<f32>,
    pub hold_pct: [Option<f32>; 2],
    pub first_serve_win_pct: [Option<f32>; 2],
    pub second_serve_win_pct: [Option<f32>; 2],
}

impl MatchSummary {
    /// Human-readable metric rows, formatted for display.
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Total Points".to_string(), self.total_points.to_string()),
            ("Avg Rally Length".to_string(), fmt_avg(self.avg_rally_length)),
            ("Longest Rally".to_string(), self.longest_rally.to_string()),
            ("Tiebreaks Played".to_string(), self.tiebreaks_played.to_string()),
            ("Avg Games per Set".to_string(), fmt_avg(self.avg_games_per_set)),
        ];
        for side in 0..2 {
            let name = &self.names[side];
            rows.push((format!("{name} Hold %"), fmt_pct(self.hold_pct[side])));
        }
        for side in 0..2 {
            let name = &self.names[side];
            rows.push((
                format!("{name} 1st Srv Win %"),
                fmt_pct(self.first_serve_win_pct[side]),
            ));
        }
        for side in 0..2 {
            let name = &self.names[side];
            rows.push((
                format!("{name} 2nd Srv Win %"),
                fmt_pct(self.second_serve_win_pct[side]),
            ));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> StatsTracker {
        StatsTracker::new(["Ava".to_string(), "Bea".to_string()])
    }

    fn point(winner: usize, kind: OutcomeKind, rally: u32, fault: bool) -> PointOutcome {
        PointOutcome {
            winner,
            kind,
            rally_length: rally,
            first_serve_fault: fault,
        }
    }

    #[test]
    fn test_points_won_sums_to_total() {
        let mut stats = tracker();
        stats.record_point(0, &point(0, OutcomeKind::Ace, 0, false));
        stats.record_point(0, &point(1, OutcomeKind::ForcedError, 4, true));
        stats.record_point(1, &point(0, OutcomeKind::DoubleFault, 0, true));
        assert_eq!(
            stats.points_won[0] + stats.points_won[1],
            stats.total_points
        );
    }

    #[test]
    fn test_double_fault_is_not_a_serve_attempt() {
        let mut stats = tracker();
        stats.record_point(1, &point(0, OutcomeKind::DoubleFault, 0, true));
        assert_eq!(stats.serves_attempted[1], 0);
        assert_eq!(stats.first_serve_faults[1], 0);
        assert_eq!(stats.outcomes.double_faults, 1);
        assert_eq!(stats.points_won[0], 1);
    }

    #[test]
    fn test_serve_buckets_split_on_fault_flag() {
        let mut stats = tracker();
        // First serve in, server won.
        stats.record_point(0, &point(0, OutcomeKind::ForcedError, 3, false));
        // Second serve in, server lost.
        stats.record_point(0, &point(1, OutcomeKind::ForcedError, 5, true));
        // Second serve in, server won.
        stats.record_point(0, &point(0, OutcomeKind::Ace, 0, true));

        assert_eq!(stats.serves_attempted[0], 3);
        assert_eq!(stats.first_serves_in(0), 1);
        assert_eq!(stats.first_serve_points_won[0], 1);
        assert_eq!(stats.first_serve_faults[0], 2);
        assert_eq!(stats.second_serve_points_faced[0], 2);
        assert_eq!(stats.second_serve_points_won[0], 1);
    }

    #[test]
    fn test_rally_samples_skip_serve_winners() {
        let mut stats = tracker();
        stats.record_point(0, &point(0, OutcomeKind::Ace, 0, false));
        stats.record_point(0, &point(0, OutcomeKind::ForcedError, 7, false));
        stats.record_point(0, &point(1, OutcomeKind::ForcedError, 2, false));
        assert_eq!(stats.rally_samples, 2);
        assert_eq!(stats.rally_length_sum, 9);
        assert_eq!(stats.longest_rally, 7);
        let summary = stats.summarize();
        assert_eq!(summary.avg_rally_length, Some(4.5));
    }

    #[test]
    fn test_zero_denominators_render_not_applicable() {
        let stats = tracker();
        let summary = stats.summarize();
        assert_eq!(summary.avg_rally_length, None);
        assert_eq!(summary.hold_pct, [None, None]);
        assert_eq!(summary.first_serve_win_pct, [None, None]);
        assert_eq!(summary.second_serve_win_pct, [None, None]);

        let rows = summary.rows();
        let hold = rows
            .iter()
            .find(|(label, _)| label == "Ava Hold %")
            .unwrap();
        assert_eq!(hold.1, "N/A");
    }

    #[test]
    fn test_boundary_events() {
        let mut stats = tracker();
        stats.record_service_game(0, 0);
        stats.record_service_game(1, 0);
        stats.record_set([6, 3]);
        stats.record_tiebreak();
        assert_eq!(stats.service_games_won, [1, 0]);
        assert_eq!(stats.service_games_played, [1, 1]);
        assert_eq!(stats.games_per_set, vec![9]);
        assert_eq!(stats.tiebreaks_played, 1);
        let summary = stats.summarize();
        assert_eq!(summary.hold_pct[0], Some(100.0));
        assert_eq!(summary.hold_pct[1], Some(0.0));
        assert_eq!(summary.avg_games_per_set, Some(9.0));
    }
}
