//! Match state machine: best-of-N sets driven down through games and
//! tiebreaks to individual points.
//!
//! `MatchEngine` owns the per-match RNG, the participants' match state,
//! the stats tracker and the injected point resolver. The game, set and
//! tiebreak loops live in sibling modules as `impl MatchEngine` blocks.

mod game;
mod set;
mod tiebreak;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::engine::config::SimulationConfig;
use crate::engine::point::PointResolver;
use crate::engine::stats::StatsTracker;
use crate::error::{Result, SimError};
use crate::models::competitor::{Competitor, MatchParticipant};
use crate::models::result::{MatchResult, SetScore};

/// Inputs of one match. Competitor profiles are borrowed and never
/// mutated, so the same profile can appear in many concurrent plans.
#[derive(Debug, Clone, Copy)]
pub struct MatchPlan<'a> {
    pub competitors: [&'a Competitor; 2],
    /// Best-of-N sets; any odd N is valid (3 and 5 in practice).
    pub best_of: u8,
    pub seed: u64,
}

pub struct MatchEngine<'a> {
    pub(crate) rng: ChaCha8Rng,
    /// Seed the RNG was built from, for reproduction reports.
    original_seed: u64,
    pub(crate) config: &'a SimulationConfig,
    pub(crate) resolver: &'a dyn PointResolver,
    pub(crate) players: [MatchParticipant<'a>; 2],
    sets_to_win: u8,
    pub(crate) tracker: StatsTracker,
    pub(crate) set_scores: Vec<SetScore>,
}

impl<'a> MatchEngine<'a> {
    pub fn new(
        plan: MatchPlan<'a>,
        config: &'a SimulationConfig,
        resolver: &'a dyn PointResolver,
    ) -> Result<Self> {
        if plan.best_of == 0 || plan.best_of % 2 == 0 {
            return Err(SimError::InvalidBestOf {
                best_of: plan.best_of,
            });
        }
        let [first, second] = plan.competitors;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(plan.seed),
            original_seed: plan.seed,
            config,
            resolver,
            players: [MatchParticipant::new(first), MatchParticipant::new(second)],
            sets_to_win: plan.best_of / 2 + 1,
            tracker: StatsTracker::new([first.name.clone(), second.name.clone()]),
            set_scores: Vec::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.original_seed
    }

    /// Runs the match to completion.
    ///
    /// The initial server alternates at the start of every set; the match
    /// ends the instant either side reaches the sets-to-win count.
    pub fn simulate(mut self) -> MatchResult {
        let mut initial_server = 0usize;
        while self.players[0].sets_won < self.sets_to_win
            && self.players[1].sets_won < self.sets_to_win
        {
            self.play_set(initial_server);
            debug!(
                sets = ?[self.players[0].sets_won, self.players[1].sets_won],
                "match score"
            );
            initial_server = 1 - initial_server;
        }

        let winner = if self.players[0].sets_won >= self.sets_to_win {
            0
        } else {
            1
        };
        debug!(
            winner = %self.players[winner].profile.name,
            sets = ?[self.players[0].sets_won, self.players[1].sets_won],
            "match complete"
        );
        MatchResult {
            winner,
            winner_id: self.players[winner].profile.id,
            sets_won: [self.players[0].sets_won, self.players[1].sets_won],
            set_scores: self.set_scores,
            statistics: self.tracker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RatingConfig;
    use crate::engine::point::SilentResolver;
    use crate::models::competitor::SkillSet;

    fn flat_competitor(id: u32, name: &str, value: u8) -> Competitor {
        let skills =
            SkillSet::new(value, value, value, value, value, value, value).unwrap();
        Competitor::new(id, name, "USA", skills, &RatingConfig::default())
    }

    fn run(best_of: u8, seed: u64, a: &Competitor, b: &Competitor) -> MatchResult {
        let config = SimulationConfig::default();
        let plan = MatchPlan {
            competitors: [a, b],
            best_of,
            seed,
        };
        MatchEngine::new(plan, &config, &SilentResolver)
            .unwrap()
            .simulate()
    }

    #[test]
    fn test_even_best_of_rejected() {
        let a = flat_competitor(1, "A", 50);
        let b = flat_competitor(2, "B", 50);
        let config = SimulationConfig::default();
        for best_of in [0u8, 2, 4] {
            let plan = MatchPlan {
                competitors: [&a, &b],
                best_of,
                seed: 1,
            };
            assert!(MatchEngine::new(plan, &config, &SilentResolver).is_err());
        }
    }

    #[test]
    fn test_identical_competitors_finish_a_match() {
        // Two flat-50 profiles must still produce a terminating match.
        let a = flat_competitor(1, "Mirror A", 50);
        let b = flat_competitor(2, "Mirror B", 50);
        let result = run(3, 42, &a, &b);
        assert!(result.winner < 2);
        assert_eq!(result.sets_won[result.winner], 2);
        assert!(result.sets_played() <= 3);
    }

    #[test]
    fn test_winner_reaches_sets_to_win() {
        let a = flat_competitor(1, "A", 68);
        let b = flat_competitor(2, "B", 55);
        for (best_of, needed) in [(3u8, 2u8), (5, 3)] {
            for seed in 0..20 {
                let result = run(best_of, seed, &a, &b);
                assert_eq!(result.sets_won[result.winner], needed);
                assert!(result.sets_won[1 - result.winner] < needed);
                assert!(result.sets_played() <= best_of);
                assert_eq!(result.set_scores.len() as u8, result.sets_played());
            }
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_match() {
        let a = flat_competitor(1, "A", 77);
        let b = flat_competitor(2, "B", 74);
        let one = run(5, 123, &a, &b);
        let two = run(5, 123, &a, &b);
        assert_eq!(one.winner, two.winner);
        assert_eq!(one.sets_won, two.sets_won);
        assert_eq!(one.set_scores, two.set_scores);
        assert_eq!(one.statistics.total_points, two.statistics.total_points);
        assert_eq!(one.statistics.points_won, two.statistics.points_won);
        assert_eq!(one.statistics.longest_rally, two.statistics.longest_rally);
    }

    #[test]
    fn test_points_won_invariant_over_full_match() {
        let a = flat_competitor(1, "A", 81);
        let b = flat_competitor(2, "B", 62);
        for seed in 0..10 {
            let result = run(3, seed, &a, &b);
            let stats = &result.statistics;
            assert_eq!(stats.points_won[0] + stats.points_won[1], stats.total_points);
            assert!(stats.longest_rally <= SimulationConfig::default().rally.max_rally_length);
        }
    }

    #[test]
    fn test_set_scores_are_valid_tennis_scores() {
        let a = flat_competitor(1, "A", 70);
        let b = flat_competitor(2, "B", 65);
        for seed in 0..30 {
            let result = run(3, seed, &a, &b);
            for set in &result.set_scores {
                let (win, lose) = if set.games[0] > set.games[1] {
                    (set.games[0], set.games[1])
                } else {
                    (set.games[1], set.games[0])
                };
                if set.tiebreak {
                    assert_eq!((win, lose), (7, 6));
                } else {
                    assert!(win >= 6);
                    assert!(win - lose >= 2);
                }
            }
        }
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// Property: any pairing and seed produces a legal best-of-N
            /// result with consistent statistics.
            #[test]
            fn prop_match_result_is_legal(
                seed in any::<u64>(),
                skill_a in 1u8..=100,
                skill_b in 1u8..=100,
                best_of in prop::sample::select(vec![1u8, 3, 5])
            ) {
                let a = flat_competitor(1, "A", skill_a);
                let b = flat_competitor(2, "B", skill_b);
                let result = run(best_of, seed, &a, &b);
                let needed = best_of / 2 + 1;
                prop_assert_eq!(result.sets_won[result.winner], needed);
                prop_assert!(result.sets_won[1 - result.winner] < needed);
                prop_assert!(result.sets_played() <= best_of);
                let stats = &result.statistics;
                prop_assert_eq!(
                    stats.points_won[0] + stats.points_won[1],
                    stats.total_points
                );
                for set in &result.set_scores {
                    let (win, lose) = if set.games[0] > set.games[1] {
                        (set.games[0], set.games[1])
                    } else {
                        (set.games[1], set.games[0])
                    };
                    if set.tiebreak {
                        prop_assert_eq!((win, lose), (7, 6));
                    } else {
                        prop_assert!(win >= 6 && win - lose >= 2);
                    }
                }
            }
        }
    }

    #[test]
    fn test_match_state_resets_between_runs() {
        // Reusing the same profiles must not leak fatigue or score.
        let a = flat_competitor(1, "A", 60);
        let b = flat_competitor(2, "B", 60);
        let _ = run(3, 5, &a, &b);
        let config = SimulationConfig::default();
        let plan = MatchPlan {
            competitors: [&a, &b],
            best_of: 3,
            seed: 6,
        };
        let engine = MatchEngine::new(plan, &config, &SilentResolver).unwrap();
        assert_eq!(engine.players[0].fatigue, 0.0);
        assert_eq!(engine.players[0].sets_won, 0);
        assert_eq!(engine.players[1].games_won, 0);
    }
}
