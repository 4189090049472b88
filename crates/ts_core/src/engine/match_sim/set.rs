//! One set: games with alternating serve until a side has >= 6 with a
//! 2-game lead, or a tiebreak at 6-6.

use tracing::debug;

use super::MatchEngine;
use crate::models::result::SetScore;

impl MatchEngine<'_> {
    /// Plays one set starting with `initial_server`; returns the winner
    /// index. Credits the set to the winner's `sets_won` and records the
    /// per-set game counts.
    pub(crate) fn play_set(&mut self, initial_server: usize) -> usize {
        self.players[0].games_won = 0;
        self.players[1].games_won = 0;
        debug!(
            initial_server = %self.players[initial_server].profile.name,
            "set start"
        );

        let mut server = initial_server;
        let mut tiebreak = false;
        loop {
            let (a, b) = (self.players[0].games_won, self.players[1].games_won);
            if (a >= 6 && a >= b + 2) || (b >= 6 && b >= a + 2) {
                break;
            }
            if a == 6 && b == 6 {
                // At 6-6 the rotation puts the set's opening server on
                // serve again; the tiebreak starts from the same spot.
                let tiebreak_winner = self.play_tiebreak(server);
                self.players[tiebreak_winner].games_won += 1;
                tiebreak = true;
                break;
            }
            self.play_game(server);
            debug!(
                games = ?[self.players[0].games_won, self.players[1].games_won],
                "set score"
            );
            server = 1 - server;
        }

        let games = [self.players[0].games_won, self.players[1].games_won];
        let winner = if games[0] > games[1] { 0 } else { 1 };
        self.tracker.record_set(games);
        self.set_scores.push(SetScore { games, tiebreak });
        self.players[winner].sets_won += 1;
        debug!(
            winner = %self.players[winner].profile.name,
            games = ?games,
            tiebreak,
            "set won"
        );
        winner
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::engine::config::{RatingConfig, SimulationConfig};
    use crate::engine::match_sim::MatchPlan;
    use crate::engine::point::{PointResolver, SilentResolver};
    use crate::models::competitor::{Competitor, MatchParticipant, SkillSet};
    use crate::models::outcome::{OutcomeKind, PointOutcome};

    fn flat_competitor(id: u32, name: &str, value: u8) -> Competitor {
        let skills =
            SkillSet::new(value, value, value, value, value, value, value).unwrap();
        Competitor::new(id, name, "USA", skills, &RatingConfig::default())
    }

    /// Replays a fixed winner sequence instead of rolling dice.
    struct ScriptedResolver {
        winners: RefCell<VecDeque<usize>>,
    }

    impl ScriptedResolver {
        fn new(winners: impl IntoIterator<Item = usize>) -> Self {
            Self {
                winners: RefCell::new(winners.into_iter().collect()),
            }
        }
    }

    impl PointResolver for ScriptedResolver {
        fn resolve(
            &self,
            _players: &[MatchParticipant<'_>; 2],
            _server: usize,
            _config: &SimulationConfig,
            _rng: &mut ChaCha8Rng,
        ) -> PointOutcome {
            let winner = self
                .winners
                .borrow_mut()
                .pop_front()
                .expect("script ran out of points");
            PointOutcome {
                winner,
                kind: OutcomeKind::ForcedError,
                rally_length: 1,
                first_serve_fault: false,
            }
        }
    }

    #[test]
    fn test_set_winner_has_margin_or_tiebreak() {
        let a = flat_competitor(1, "A", 60);
        let b = flat_competitor(2, "B", 58);
        let config = SimulationConfig::default();
        for seed in 0..40 {
            let plan = MatchPlan {
                competitors: [&a, &b],
                best_of: 3,
                seed,
            };
            let mut engine = MatchEngine::new(plan, &config, &SilentResolver).unwrap();
            let winner = engine.play_set(0);
            let games = engine.set_scores[0].games;
            let (win, lose) = (games[winner], games[1 - winner]);
            if engine.set_scores[0].tiebreak {
                assert_eq!((win, lose), (7, 6));
                assert_eq!(engine.tracker.tiebreaks_played, 1);
            } else {
                assert!(win >= 6);
                assert!(win - lose >= 2);
                assert_eq!(engine.tracker.tiebreaks_played, 0);
            }
            assert_eq!(engine.players[winner].sets_won, 1);
        }
    }

    #[test]
    fn test_six_all_triggers_exactly_one_tiebreak() {
        // Script every service hold: 12 games of 4 straight points for the
        // serving side (server alternates 0,1,0,1,...), then 7 tiebreak
        // points for side 0.
        let mut winners = Vec::new();
        for game in 0..12 {
            let server = game % 2;
            winners.extend([server; 4]);
        }
        winners.extend([0; 7]);
        let resolver = ScriptedResolver::new(winners);

        let a = flat_competitor(1, "A", 50);
        let b = flat_competitor(2, "B", 50);
        let config = SimulationConfig::default();
        let plan = MatchPlan {
            competitors: [&a, &b],
            best_of: 3,
            seed: 0,
        };
        let mut engine = MatchEngine::new(plan, &config, &resolver).unwrap();
        let winner = engine.play_set(0);

        assert_eq!(winner, 0);
        assert_eq!(engine.tracker.tiebreaks_played, 1);
        assert_eq!(engine.set_scores.len(), 1);
        assert!(engine.set_scores[0].tiebreak);
        assert_eq!(engine.set_scores[0].games, [7, 6]);
        assert_eq!(engine.tracker.games_per_set, vec![13]);
        // Script fully consumed: 48 game points + 7 tiebreak points.
        assert!(resolver.winners.borrow().is_empty());
    }

    #[test]
    fn test_straight_holds_by_one_side_end_six_love() {
        // Side 0 wins every point: breaks at love, set ends 6-0 with no
        // tiebreak.
        let resolver = ScriptedResolver::new(vec![0; 24]);
        let a = flat_competitor(1, "A", 50);
        let b = flat_competitor(2, "B", 50);
        let config = SimulationConfig::default();
        let plan = MatchPlan {
            competitors: [&a, &b],
            best_of: 3,
            seed: 0,
        };
        let mut engine = MatchEngine::new(plan, &config, &resolver).unwrap();
        let winner = engine.play_set(0);
        assert_eq!(winner, 0);
        assert_eq!(engine.set_scores[0].games, [6, 0]);
        assert!(!engine.set_scores[0].tiebreak);
        assert_eq!(engine.tracker.tiebreaks_played, 0);
    }
}
