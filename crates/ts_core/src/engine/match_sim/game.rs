//! One service game: points until a side has >= 4 with a 2-point lead.

use tracing::debug;

use super::MatchEngine;

impl MatchEngine<'_> {
    /// Plays one game served by `server`; returns the winner index.
    ///
    /// Each resolved point adds its rally length to both participants'
    /// fatigue. Deuce and advantage fall out of the >= 2 margin rule; no
    /// explicit deuce state is needed.
    pub(crate) fn play_game(&mut self, server: usize) -> usize {
        let receiver = 1 - server;
        debug!(
            server = %self.players[server].profile.name,
            fatigue = format_args!("{:.1}", self.players[server].fatigue),
            "new game"
        );

        let mut server_points = 0u32;
        let mut receiver_points = 0u32;
        loop {
            let outcome =
                self.resolver
                    .resolve(&self.players, server, self.config, &mut self.rng);
            self.tracker.record_point(server, &outcome);
            let rally = outcome.rally_length as f32;
            self.players[0].fatigue += rally;
            self.players[1].fatigue += rally;

            if outcome.winner == server {
                server_points += 1;
            } else {
                receiver_points += 1;
            }

            let game_over = (server_points >= 4 && server_points >= receiver_points + 2)
                || (receiver_points >= 4 && receiver_points >= server_points + 2);
            if game_over {
                break;
            }
            debug!(
                score = %game_score_label(server_points, receiver_points),
                rally = outcome.rally_length,
                "game score"
            );
        }

        let winner = if server_points > receiver_points {
            server
        } else {
            receiver
        };
        self.tracker.record_service_game(server, winner);
        self.players[winner].games_won += 1;
        debug!(winner = %self.players[winner].profile.name, "game won");
        winner
    }
}

/// Conventional scoreboard label for a game tally, server first:
/// "15-30", "Deuce", "Adv server" / "Adv receiver".
pub(crate) fn game_score_label(server_points: u32, receiver_points: u32) -> String {
    if server_points >= 3 && receiver_points >= 3 {
        return match server_points.cmp(&receiver_points) {
            std::cmp::Ordering::Equal => "Deuce".to_string(),
            std::cmp::Ordering::Greater => "Adv server".to_string(),
            std::cmp::Ordering::Less => "Adv receiver".to_string(),
        };
    }
    let call = |points: u32| match points {
        0 => "0",
        1 => "15",
        2 => "30",
        _ => "40",
    };
    format!("{}-{}", call(server_points), call(receiver_points))
}
