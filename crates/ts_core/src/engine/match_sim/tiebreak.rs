//! The 6-6 tiebreak: first to 7 points with a 2-point lead, serve
//! rotating every two points after the opening point.

use tracing::debug;

use super::MatchEngine;

impl MatchEngine<'_> {
    /// Plays the tiebreak; returns the winner index. The winner is later
    /// credited one extra game by the set loop, making the set 7-6.
    pub(crate) fn play_tiebreak(&mut self, initial_server: usize) -> usize {
        self.tracker.record_tiebreak();
        debug!(
            initial_server = %self.players[initial_server].profile.name,
            "tiebreak start"
        );

        let mut points = [0u32; 2];
        let mut point_num = 1u32;
        loop {
            let server = tiebreak_server(initial_server, point_num);
            let outcome =
                self.resolver
                    .resolve(&self.players, server, self.config, &mut self.rng);
            self.tracker.record_point(server, &outcome);
            let rally = outcome.rally_length as f32;
            self.players[0].fatigue += rally;
            self.players[1].fatigue += rally;
            points[outcome.winner] += 1;
            debug!(points = ?points, "tiebreak score");

            if (points[0] >= 7 && points[0] >= points[1] + 2)
                || (points[1] >= 7 && points[1] >= points[0] + 2)
            {
                break;
            }
            point_num += 1;
        }

        let winner = if points[0] > points[1] { 0 } else { 1 };
        debug!(
            winner = %self.players[winner].profile.name,
            points = ?points,
            "tiebreak won"
        );
        winner
    }
}

/// Server of tiebreak point `point_num` (1-based): the initial server
/// opens, then serve changes every two points. Points 2-3 go to the other
/// side, 4-5 back to the opener, and so on.
pub(crate) fn tiebreak_server(initial_server: usize, point_num: u32) -> usize {
    if point_num == 1 {
        initial_server
    } else if (point_num - 2) % 4 < 2 {
        1 - initial_server
    } else {
        initial_server
    }
}
