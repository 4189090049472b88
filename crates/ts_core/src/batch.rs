//! High-volume batch sweeps: many matches per pairing across tier or
//! overall-rating buckets, embarrassingly parallel across match seeds.
//!
//! Competitor profiles are shared read-only between workers; every match
//! clones its own participant state, so no two matches ever touch the
//! same mutable data. An empty bucket is a "no data" condition: the
//! pairing is skipped with a warning and the sweep continues.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::engine::config::{SimulationConfig, TierRanges};
use crate::engine::match_sim::{MatchEngine, MatchPlan};
use crate::engine::point::SilentResolver;
use crate::engine::stats::{fmt_avg, fmt_pct};
use crate::error::{Result, SimError};
use crate::models::competitor::{Competitor, Tier};
use crate::models::result::MatchResult;

/// Sweep parameters shared by every pairing.
#[derive(Debug, Clone, Copy)]
pub struct BatchPlan {
    pub matches_per_pairing: u32,
    pub best_of: u8,
}

/// A roster grouped on demand into pairing buckets.
#[derive(Debug, Clone, Default)]
pub struct CompetitorPool {
    competitors: Vec<Competitor>,
}

impl CompetitorPool {
    pub fn new(competitors: Vec<Competitor>) -> Self {
        Self { competitors }
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    pub fn all(&self) -> &[Competitor] {
        &self.competitors
    }

    /// Competitors whose overall rating falls in the tier's band.
    pub fn tier(&self, tier: Tier, ranges: &TierRanges) -> Vec<&Competitor> {
        self.competitors
            .iter()
            .filter(|c| c.tier(ranges) == tier)
            .collect()
    }

    /// Competitors with exactly this overall rating.
    pub fn with_overall(&self, overall: u8) -> Vec<&Competitor> {
        self.competitors
            .iter()
            .filter(|c| c.overall() == overall)
            .collect()
    }
}

/// One match line of the sweep log.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatchRecord {
    pub index: u32,
    pub competitors: [u32; 2],
    pub winner_id: u32,
    pub sets_won: [u8; 2],
    pub sets_played: u8,
}

/// Aggregate counters of one pairing, side 0 = first bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PairingAggregate {
    pub matches: u32,
    pub wins: [u32; 2],
    pub total_points: u64,
    pub rally_length_sum: u64,
    pub rally_samples: u64,
    pub longest_rally: u32,
    pub tiebreaks: u32,
    pub sets_played: u32,
    pub games_played: u64,
    pub aces: u64,
    pub double_faults: u64,
    pub serves_attempted: u64,
    pub first_serve_faults: u64,
    pub service_games_played: [u64; 2],
    pub service_games_won: [u64; 2],
    pub first_serves_in: [u64; 2],
    pub first_serve_points_won: [u64; 2],
    pub second_serves_faced: [u64; 2],
    pub second_serve_points_won: [u64; 2],
}

impl PairingAggregate {
    fn absorb(&mut self, result: &MatchResult) {
        let stats = &result.statistics;
        self.matches += 1;
        self.wins[result.winner] += 1;
        self.total_points += stats.total_points as u64;
        self.rally_length_sum += stats.rally_length_sum;
        self.rally_samples += stats.rally_samples as u64;
        self.longest_rally = self.longest_rally.max(stats.longest_rally);
        self.tiebreaks += stats.tiebreaks_played;
        self.sets_played += stats.games_per_set.len() as u32;
        self.games_played += stats
            .games_per_set
            .iter()
            .map(|&games| games as u64)
            .sum::<u64>();
        self.aces += stats.outcomes.aces as u64;
        self.double_faults += stats.outcomes.double_faults as u64;
        for side in 0..2 {
            self.serves_attempted += stats.serves_attempted[side] as u64;
            self.first_serve_faults += stats.first_serve_faults[side] as u64;
            self.service_games_played[side] += stats.service_games_played[side] as u64;
            self.service_games_won[side] += stats.service_games_won[side] as u64;
            self.first_serves_in[side] += stats.first_serves_in(side) as u64;
            self.first_serve_points_won[side] += stats.first_serve_points_won[side] as u64;
            self.second_serves_faced[side] += stats.second_serve_points_faced[side] as u64;
            self.second_serve_points_won[side] += stats.second_serve_points_won[side] as u64;
        }
    }
}

/// Fully-aggregated result of one pairing.
#[derive(Debug, Clone, Serialize)]
pub struct PairingOutcome {
    pub label: String,
    pub sides: [String; 2],
    pub aggregate: PairingAggregate,
    pub matches: Vec<MatchRecord>,
}

impl PairingOutcome {
    /// Human-readable report rows, zero denominators rendered as "N/A".
    pub fn rows(&self) -> Vec<(String, String)> {
        let agg = &self.aggregate;
        let matches = agg.matches as u64;
        let mut rows = vec![
            (
                format!("{} Win %", self.sides[0]),
                fmt_pct(pct64(agg.wins[0] as u64, matches)),
            ),
            (
                format!("{} Win %", self.sides[1]),
                fmt_pct(pct64(agg.wins[1] as u64, matches)),
            ),
            (
                "1st Serve In %".to_string(),
                fmt_pct(pct64(
                    agg.serves_attempted - agg.first_serve_faults,
                    agg.serves_attempted,
                )),
            ),
            (
                "Ace % (of all points)".to_string(),
                fmt_pct2(pct64(agg.aces, agg.total_points)),
            ),
            (
                "Double Fault % (of all points)".to_string(),
                fmt_pct2(pct64(agg.double_faults, agg.total_points)),
            ),
            (
                "Avg Match Duration (Points)".to_string(),
                match matches {
                    0 => "N/A".to_string(),
                    _ => format!("{:.1}", agg.total_points as f32 / matches as f32),
                },
            ),
            (
                "Avg Games / Set".to_string(),
                fmt_avg(avg64(agg.games_played, agg.sets_played as u64)),
            ),
            (
                "Avg Rally Length".to_string(),
                fmt_avg(avg64(agg.rally_length_sum, agg.rally_samples)),
            ),
            ("Longest Rally".to_string(), agg.longest_rally.to_string()),
            (
                "Tiebreak %".to_string(),
                fmt_pct(pct64(agg.tiebreaks as u64, agg.sets_played as u64)),
            ),
        ];
        for side in 0..2 {
            let name = &self.sides[side];
            rows.push((
                format!("{name} Hold %"),
                fmt_pct(pct64(
                    agg.service_games_won[side],
                    agg.service_games_played[side],
                )),
            ));
            rows.push((
                format!("{name} 1st Srv Win %"),
                fmt_pct(pct64(
                    agg.first_serve_points_won[side],
                    agg.first_serves_in[side],
                )),
            ));
            rows.push((
                format!("{name} 2nd Srv Win %"),
                fmt_pct(pct64(
                    agg.second_serve_points_won[side],
                    agg.second_serves_faced[side],
                )),
            ));
        }
        rows
    }
}

/// Full sweep output: aggregated pairings plus the skipped ones.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub pairings: Vec<PairingOutcome>,
    pub skipped: Vec<String>,
}

/// One row of the rating matrix.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixEntry {
    pub label: String,
    pub win_pct: [f32; 2],
    pub matches: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    pub base_overall: u8,
    pub entries: Vec<MatrixEntry>,
    pub skipped: Vec<String>,
}

/// Runs `plan.matches_per_pairing` matches between two buckets.
///
/// Opponents are drawn per match from each bucket with a seed-derived
/// pick; a competitor never faces their own profile. Matches run in
/// parallel over per-match seeds and aggregate deterministically.
pub fn run_pairing(
    sides: [&str; 2],
    pool_a: &[&Competitor],
    pool_b: &[&Competitor],
    plan: &BatchPlan,
    seed: u64,
    config: &SimulationConfig,
) -> Result<PairingOutcome> {
    if plan.best_of == 0 || plan.best_of % 2 == 0 {
        return Err(SimError::InvalidBestOf {
            best_of: plan.best_of,
        });
    }
    for (side, pool) in [(0, pool_a), (1, pool_b)] {
        if pool.is_empty() {
            return Err(SimError::EmptyPool {
                pool: sides[side].to_string(),
            });
        }
    }
    if pool_a.len() == 1 && pool_b.len() == 1 && pool_a[0].id == pool_b[0].id {
        return Err(SimError::EmptyPool {
            pool: format!("{} vs. {} (needs two distinct competitors)", sides[0], sides[1]),
        });
    }

    let played: Vec<(MatchRecord, MatchResult)> = (0..plan.matches_per_pairing)
        .into_par_iter()
        .map(|index| {
            let mut pick = ChaCha8Rng::seed_from_u64(mix_seed(seed, index as u64));
            let first = pool_a[pick.gen_range(0..pool_a.len())];
            let mut second = pool_b[pick.gen_range(0..pool_b.len())];
            if pool_b.len() > 1 {
                // Redraw on a self-pairing; bounded so duplicate-id data
                // cannot stall the sweep.
                for _ in 0..16 {
                    if second.id != first.id {
                        break;
                    }
                    second = pool_b[pick.gen_range(0..pool_b.len())];
                }
            }

            let match_plan = MatchPlan {
                competitors: [first, second],
                best_of: plan.best_of,
                seed: pick.gen(),
            };
            let result = MatchEngine::new(match_plan, config, &SilentResolver)?.simulate();
            let record = MatchRecord {
                index,
                competitors: [first.id, second.id],
                winner_id: result.winner_id,
                sets_won: result.sets_won,
                sets_played: result.sets_played(),
            };
            Ok((record, result))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut aggregate = PairingAggregate::default();
    let mut matches = Vec::with_capacity(played.len());
    for (record, result) in &played {
        aggregate.absorb(result);
        matches.push(*record);
    }
    Ok(PairingOutcome {
        label: format!("{} vs. {}", sides[0], sides[1]),
        sides: [sides[0].to_string(), sides[1].to_string()],
        aggregate,
        matches,
    })
}

/// Sweeps every tier pairing (upper triangle, strongest first).
pub fn tier_sweep(
    pool: &CompetitorPool,
    ranges: &TierRanges,
    plan: &BatchPlan,
    seed: u64,
    config: &SimulationConfig,
) -> BatchReport {
    let mut pairings = Vec::new();
    let mut skipped = Vec::new();
    let mut pairing_index = 0u64;
    for (i, tier_a) in Tier::ALL.iter().enumerate() {
        for tier_b in &Tier::ALL[i..] {
            let label = format!("{} vs. {}", tier_a.label(), tier_b.label());
            let bucket_a = pool.tier(*tier_a, ranges);
            let bucket_b = pool.tier(*tier_b, ranges);
            let outcome = run_pairing(
                [tier_a.label(), tier_b.label()],
                &bucket_a,
                &bucket_b,
                plan,
                mix_seed(seed, pairing_index),
                config,
            );
            pairing_index += 1;
            match outcome {
                Ok(outcome) => pairings.push(outcome),
                Err(err) => {
                    warn!(pairing = %label, %err, "skipping pairing");
                    skipped.push(label);
                }
            }
        }
    }
    BatchReport { pairings, skipped }
}

/// Win-percentage matrix of one overall rating against a band around it.
pub fn rating_matrix(
    pool: &CompetitorPool,
    base_overall: u8,
    spread: u8,
    plan: &BatchPlan,
    seed: u64,
    config: &SimulationConfig,
) -> MatrixReport {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let low = base_overall.saturating_sub(spread).max(1);
    let high = base_overall.saturating_add(spread).min(100);
    for (step, opponent_overall) in (low..=high).enumerate() {
        let label = format!("{} OVR vs. {} OVR", base_overall, opponent_overall);
        let base_label = format!("{base_overall} OVR");
        let opponent_label = format!("{opponent_overall} OVR");
        let bucket_a = pool.with_overall(base_overall);
        let bucket_b = pool.with_overall(opponent_overall);
        let outcome = run_pairing(
            [base_label.as_str(), opponent_label.as_str()],
            &bucket_a,
            &bucket_b,
            plan,
            mix_seed(seed, step as u64),
            config,
        );
        match outcome {
            Ok(outcome) => {
                let matches = outcome.aggregate.matches;
                let win_pct = [
                    outcome.aggregate.wins[0] as f32 / matches as f32 * 100.0,
                    outcome.aggregate.wins[1] as f32 / matches as f32 * 100.0,
                ];
                entries.push(MatrixEntry {
                    label,
                    win_pct,
                    matches,
                });
            }
            Err(err) => {
                warn!(pairing = %label, %err, "skipping pairing");
                skipped.push(label);
            }
        }
    }
    MatrixReport {
        base_overall,
        entries,
        skipped,
    }
}

/// splitmix64-style derivation of independent sub-seeds.
fn mix_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn pct64(numerator: u64, denominator: u64) -> Option<f32> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f32 / denominator as f32 * 100.0)
    }
}

fn avg64(numerator: u64, denominator: u64) -> Option<f32> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f32 / denominator as f32)
    }
}

fn fmt_pct2(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RatingConfig;
    use crate::models::competitor::SkillSet;

    fn flat_competitor(id: u32, name: &str, value: u8) -> Competitor {
        let skills =
            SkillSet::new(value, value, value, value, value, value, value).unwrap();
        Competitor::new(id, name, "USA", skills, &RatingConfig::default())
    }

    fn pro_pool() -> CompetitorPool {
        CompetitorPool::new(vec![
            flat_competitor(1, "Pro One", 75),
            flat_competitor(2, "Pro Two", 78),
            flat_competitor(3, "Pro Three", 72),
        ])
    }

    fn plan(matches: u32) -> BatchPlan {
        BatchPlan {
            matches_per_pairing: matches,
            best_of: 3,
        }
    }

    #[test]
    fn test_run_pairing_aggregates_every_match() {
        let pool = pro_pool();
        let config = SimulationConfig::default();
        let bucket = pool.tier(Tier::Pro, &config.rating.tiers);
        let outcome =
            run_pairing(["Pro", "Pro"], &bucket, &bucket, &plan(8), 11, &config).unwrap();
        assert_eq!(outcome.aggregate.matches, 8);
        assert_eq!(outcome.aggregate.wins[0] + outcome.aggregate.wins[1], 8);
        assert_eq!(outcome.matches.len(), 8);
        for record in &outcome.matches {
            assert_ne!(record.competitors[0], record.competitors[1]);
            assert!(record.sets_played <= 3);
        }
    }

    #[test]
    fn test_run_pairing_is_seed_deterministic() {
        let pool = pro_pool();
        let config = SimulationConfig::default();
        let bucket = pool.tier(Tier::Pro, &config.rating.tiers);
        let one = run_pairing(["Pro", "Pro"], &bucket, &bucket, &plan(6), 5, &config).unwrap();
        let two = run_pairing(["Pro", "Pro"], &bucket, &bucket, &plan(6), 5, &config).unwrap();
        assert_eq!(one.aggregate.wins, two.aggregate.wins);
        assert_eq!(one.aggregate.total_points, two.aggregate.total_points);
        let winners_one: Vec<u32> = one.matches.iter().map(|m| m.winner_id).collect();
        let winners_two: Vec<u32> = two.matches.iter().map(|m| m.winner_id).collect();
        assert_eq!(winners_one, winners_two);
    }

    #[test]
    fn test_empty_tier_is_skipped_not_fatal() {
        // A Pro-only roster: every pairing touching another tier skips.
        let pool = pro_pool();
        let config = SimulationConfig::default();
        let report = tier_sweep(&pool, &config.rating.tiers, &plan(2), 3, &config);
        assert_eq!(report.pairings.len(), 1);
        assert_eq!(report.pairings[0].label, "Pro vs. Pro");
        // 15 tier pairings total; all but Pro vs. Pro lack competitors.
        assert_eq!(report.skipped.len(), 14);
    }

    #[test]
    fn test_single_competitor_bucket_cannot_self_play() {
        let pool = CompetitorPool::new(vec![flat_competitor(1, "Lonely", 75)]);
        let config = SimulationConfig::default();
        let bucket = pool.tier(Tier::Pro, &config.rating.tiers);
        let err =
            run_pairing(["Pro", "Pro"], &bucket, &bucket, &plan(2), 1, &config).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_rating_matrix_skips_missing_ratings() {
        // Flat-75 profiles all rate exactly 75; only 75-vs-75 can run.
        let pool = CompetitorPool::new(vec![
            flat_competitor(1, "A", 75),
            flat_competitor(2, "B", 75),
        ]);
        let config = SimulationConfig::default();
        let report = rating_matrix(&pool, 75, 2, &plan(3), 9, &config);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].matches, 3);
        assert_eq!(report.skipped.len(), 4);
    }
}
