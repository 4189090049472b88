//! Point resolution: serve phase and rally phase.
//!
//! A point is a strict sequence of Bernoulli checks (first-serve ace,
//! first-serve fault, double fault, second-serve ace) followed by a rally
//! of alternating return checks. One resolution core drives both the
//! silent and the tracing resolver, so probabilities and RNG draw order
//! are identical between the two variants.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use tracing::info;

use crate::engine::config::SimulationConfig;
use crate::models::competitor::{MatchParticipant, Skill};
use crate::models::outcome::{OutcomeKind, PointOutcome};

/// Second serves trade quality for safety.
const SECOND_SERVE_QUALITY_FACTOR: f32 = 0.80;
/// Second-serve ace chances are a fifth of first-serve chances.
const SECOND_SERVE_ACE_DIVISOR: f32 = 5.0;
/// Cap on the in-rally shot-quality discount.
const MAX_RALLY_PENALTY: f32 = 0.3;

/// Strategy for resolving one point. Injected into the match engine so a
/// caller chooses tracing or silent resolution without touching any
/// global state; both variants are statistically identical.
pub trait PointResolver {
    fn resolve(
        &self,
        players: &[MatchParticipant<'_>; 2],
        server: usize,
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
    ) -> PointOutcome;
}

/// Resolves points without any observation. The batch default.
pub struct SilentResolver;

impl PointResolver for SilentResolver {
    fn resolve(
        &self,
        players: &[MatchParticipant<'_>; 2],
        server: usize,
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
    ) -> PointOutcome {
        run_point(players, server, config, rng, &mut NoTrace)
    }
}

/// Resolves points while emitting a human-readable `tracing` event for
/// every check. Consumes the RNG in exactly the same order as
/// [`SilentResolver`].
pub struct TraceResolver;

impl PointResolver for TraceResolver {
    fn resolve(
        &self,
        players: &[MatchParticipant<'_>; 2],
        server: usize,
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
    ) -> PointOutcome {
        run_point(players, server, config, rng, &mut EventTrace)
    }
}

/// Observation sink for the resolution core. Implementations must not
/// draw from the RNG.
trait PointTrace {
    fn point_start(&mut self, _server: &MatchParticipant<'_>) {}
    fn first_serve(&mut self, _landed: bool) {}
    fn second_serve_in(&mut self) {}
    fn rally_start(&mut self, _striker: &MatchParticipant<'_>, _quality: f32, _second: bool) {}
    fn shot(&mut self, _shot: u32, _returner: &MatchParticipant<'_>, _chance: f32, _success: bool) {
    }
    fn next_shot(&mut self, _striker: &MatchParticipant<'_>, _quality: f32) {}
    fn rally_capped(&mut self, _cap: u32) {}
    fn point_won(&mut self, _winner: &MatchParticipant<'_>, _kind: OutcomeKind) {}
}

struct NoTrace;

impl PointTrace for NoTrace {}

struct EventTrace;

impl PointTrace for EventTrace {
    fn point_start(&mut self, server: &MatchParticipant<'_>) {
        info!(server = %server.profile.name, fatigue = server.fatigue, "new point");
    }

    fn first_serve(&mut self, landed: bool) {
        if landed {
            info!("first serve in");
        } else {
            info!("first serve fault");
        }
    }

    fn second_serve_in(&mut self) {
        info!("second serve in");
    }

    fn rally_start(&mut self, striker: &MatchParticipant<'_>, quality: f32, second: bool) {
        info!(
            striker = %striker.profile.name,
            quality = format_args!("{quality:.2}"),
            second_serve = second,
            "rally start"
        );
    }

    fn shot(&mut self, shot: u32, returner: &MatchParticipant<'_>, chance: f32, success: bool) {
        info!(
            shot,
            returner = %returner.profile.name,
            chance = format_args!("{:.2}%", chance * 100.0),
            success,
            "return attempt"
        );
    }

    fn next_shot(&mut self, striker: &MatchParticipant<'_>, quality: f32) {
        info!(
            striker = %striker.profile.name,
            quality = format_args!("{quality:.2}"),
            "shot"
        );
    }

    fn rally_capped(&mut self, cap: u32) {
        info!(cap, "rally reached maximum length");
    }

    fn point_won(&mut self, winner: &MatchParticipant<'_>, kind: OutcomeKind) {
        info!(winner = %winner.profile.name, via = kind.label(), "point won");
    }
}

/// Gaussian draw around `mean`; one standard-normal sample scaled by sigma.
fn gauss(rng: &mut ChaCha8Rng, mean: f32, sigma: f32) -> f32 {
    let z: f32 = rng.sample(StandardNormal);
    mean + sigma * z
}

/// Ace check: serve attack against the receiver's reflex.
fn ace_check(
    server: &MatchParticipant<'_>,
    receiver: &MatchParticipant<'_>,
    second_serve: bool,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> bool {
    let power = server.effective_skill(Skill::ServePower, &config.fatigue);
    let accuracy = server.effective_skill(Skill::ServeAccuracy, &config.fatigue);
    let reflex = receiver.effective_skill(Skill::Reflex, &config.fatigue);

    let attack = ((power + accuracy) / 200.0).powi(2) * 100.0;
    let defense = ((100.0 - reflex) / 100.0).max(config.serve.defense_floor);
    let mut chance = attack * defense * config.serve.ace_ceiling_factor;
    if second_serve {
        chance /= SECOND_SERVE_ACE_DIVISOR;
    }
    chance = chance.max(0.001);
    rng.gen_range(0.0..100.0) < chance
}

/// First-serve check: true when the serve lands in. The success chance is
/// accuracy-driven, penalized for excess power, then Gaussian-perturbed;
/// a uniform draw above the perturbed chance is a fault.
fn first_serve_lands(
    server: &MatchParticipant<'_>,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> bool {
    let accuracy = server.effective_skill(Skill::ServeAccuracy, &config.fatigue);
    let power = server.effective_skill(Skill::ServePower, &config.fatigue);

    let base = config.serve.baseline_floor + accuracy * config.serve.accuracy_weight
        - (power - config.serve.power_threshold) * config.serve.power_penalty_rate;
    let base = base.clamp(1.0, 99.0);
    let chance = gauss(rng, base, config.serve.fault_sigma).clamp(0.0, 100.0);
    rng.gen_range(0.0..100.0) <= chance
}

/// Double-fault check on the second serve: tiered base rate by serve
/// accuracy, shifted by clutch.
fn double_fault_check(
    server: &MatchParticipant<'_>,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> bool {
    let accuracy = server.effective_skill(Skill::ServeAccuracy, &config.fatigue);
    let clutch = server.skill(Skill::Clutch) as f32;

    let base = config.serve.double_fault_rate(accuracy);
    let shifted = base - (clutch - 50.0) * config.serve.clutch_modifier_rate;
    let rate = shifted.clamp(config.serve.min_double_fault_rate, 99.0);
    rng.gen_range(0.0..100.0) < rate
}

/// Shot quality of the serve entering the rally.
fn serve_quality(
    server: &MatchParticipant<'_>,
    second_serve: bool,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> f32 {
    let power = server.effective_skill(Skill::ServePower, &config.fatigue);
    let accuracy = server.effective_skill(Skill::ServeAccuracy, &config.fatigue);

    let mut base =
        power * config.rally.serve_power_weight + accuracy * config.rally.serve_accuracy_weight;
    if second_serve {
        base *= SECOND_SERVE_QUALITY_FACTOR;
    }
    gauss(rng, base, config.rally.quality_sigma).clamp(1.0, config.rally.quality_ceiling)
}

/// Return check: success chance from the returner's defense against the
/// incoming quality, clamped to [0.01, 0.99]. Returns (success, chance).
fn return_check(
    returner: &MatchParticipant<'_>,
    incoming_quality: f32,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> (bool, f32) {
    let groundstroke = returner.effective_skill(Skill::Groundstroke, &config.fatigue);
    let reflex = returner.effective_skill(Skill::Reflex, &config.fatigue);

    let defense = groundstroke * config.rally.defense_groundstroke_weight
        + reflex * config.rally.defense_reflex_weight;
    let challenge = incoming_quality - defense;
    let chance = (config.rally.success_threshold - challenge / config.rally.quality_ceiling)
        .clamp(0.01, 0.99);
    (rng.gen::<f32>() < chance, chance)
}

/// Quality of a rally shot, discounted as the rally drags on. Low stamina
/// pays a steeper per-shot price; the discount caps at 30%.
fn rally_quality(
    striker: &MatchParticipant<'_>,
    rally_length: u32,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> f32 {
    let groundstroke = striker.effective_skill(Skill::Groundstroke, &config.fatigue);
    let strength = striker.skill(Skill::Strength) as f32;
    let stamina = striker.skill(Skill::Stamina) as f32;

    let per_shot =
        (config.fatigue.rally_fatigue_scalar - stamina) / config.fatigue.rally_fatigue_divisor;
    let penalty = (rally_length as f32 * per_shot).min(MAX_RALLY_PENALTY);
    let base = (groundstroke * config.rally.rally_groundstroke_weight
        + strength * config.rally.rally_strength_weight)
        * (1.0 - penalty);
    gauss(rng, base, config.rally.quality_sigma).clamp(1.0, config.rally.quality_ceiling)
}

fn run_point(
    players: &[MatchParticipant<'_>; 2],
    server: usize,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
    trace: &mut dyn PointTrace,
) -> PointOutcome {
    let receiver = 1 - server;
    trace.point_start(&players[server]);

    if ace_check(&players[server], &players[receiver], false, config, rng) {
        trace.point_won(&players[server], OutcomeKind::Ace);
        return PointOutcome {
            winner: server,
            kind: OutcomeKind::Ace,
            rally_length: 0,
            first_serve_fault: false,
        };
    }

    let first_serve_in = first_serve_lands(&players[server], config, rng);
    trace.first_serve(first_serve_in);
    let first_serve_fault = !first_serve_in;

    if first_serve_fault {
        if double_fault_check(&players[server], config, rng) {
            trace.point_won(&players[receiver], OutcomeKind::DoubleFault);
            return PointOutcome {
                winner: receiver,
                kind: OutcomeKind::DoubleFault,
                rally_length: 0,
                first_serve_fault: true,
            };
        }
        trace.second_serve_in();
        if ace_check(&players[server], &players[receiver], true, config, rng) {
            trace.point_won(&players[server], OutcomeKind::Ace);
            return PointOutcome {
                winner: server,
                kind: OutcomeKind::Ace,
                rally_length: 0,
                first_serve_fault: true,
            };
        }
    }

    let mut incoming_quality = serve_quality(&players[server], first_serve_fault, config, rng);
    trace.rally_start(&players[server], incoming_quality, first_serve_fault);

    // Rally: the returner faces the incoming ball; a failed return is a
    // forced error won by the striker who hit it.
    let mut striker = server;
    let mut returner = receiver;
    let mut rally_length = 0u32;
    loop {
        rally_length += 1;
        let (success, chance) = return_check(&players[returner], incoming_quality, config, rng);
        trace.shot(rally_length, &players[returner], chance, success);
        if !success {
            trace.point_won(&players[striker], OutcomeKind::ForcedError);
            return PointOutcome {
                winner: striker,
                kind: OutcomeKind::ForcedError,
                rally_length,
                first_serve_fault,
            };
        }

        incoming_quality = rally_quality(&players[returner], rally_length, config, rng);
        std::mem::swap(&mut striker, &mut returner);
        trace.next_shot(&players[striker], incoming_quality);

        if rally_length >= config.rally.max_rally_length {
            trace.rally_capped(config.rally.max_rally_length);
            trace.point_won(&players[striker], OutcomeKind::ForcedError);
            return PointOutcome {
                winner: striker,
                kind: OutcomeKind::ForcedError,
                rally_length,
                first_serve_fault,
            };
        }
    }
}
