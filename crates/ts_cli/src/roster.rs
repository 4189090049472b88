//! Roster input: JSON competitor records from the player-data pipeline,
//! plus a seeded demo roster for quick runs without a data file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use ts_core::{Competitor, CompetitorPool, RatingConfig, SkillSet, Tier};

/// One competitor record as produced by the roster pipeline.
#[derive(Debug, Deserialize)]
pub struct RosterRecord {
    pub player_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub sp: u8,
    pub sa: u8,
    pub gs: u8,
    #[serde(rename = "ref")]
    pub reflex: u8,
    pub sta: u8,
    pub strg: u8,
    pub clt: u8,
}

impl RosterRecord {
    fn into_competitor(self, rating: &RatingConfig) -> Result<Competitor> {
        let skills = SkillSet::new(
            self.sp,
            self.sa,
            self.gs,
            self.reflex,
            self.sta,
            self.strg,
            self.clt,
        )
        .with_context(|| format!("invalid skills for player {}", self.player_id))?;
        Ok(Competitor::new(
            self.player_id,
            format!("{} {}", self.first_name, self.last_name),
            self.country,
            skills,
            rating,
        ))
    }
}

/// Loads a JSON roster (a list of [`RosterRecord`]s) into a pool.
pub fn load_roster(path: &Path, rating: &RatingConfig) -> Result<CompetitorPool> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading roster {}", path.display()))?;
    let records: Vec<RosterRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing roster {}", path.display()))?;
    let competitors = records
        .into_iter()
        .map(|record| record.into_competitor(rating))
        .collect::<Result<Vec<_>>>()?;
    Ok(CompetitorPool::new(competitors))
}

const DEMO_COUNTRIES: [&str; 6] = ["USA", "ESP", "FRA", "SRB", "AUS", "KOR"];

/// Synthesizes a tier-banded roster: `per_tier` competitors per tier,
/// every skill drawn uniformly from the tier's band.
pub fn demo_roster(seed: u64, per_tier: u32, rating: &RatingConfig) -> CompetitorPool {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut competitors = Vec::new();
    let mut next_id = 1u32;
    for tier in Tier::ALL {
        let band = rating.tiers.band(tier);
        // Clamp so even a loosened band cannot produce invalid skills.
        let min = band.min.clamp(SkillSet::MIN, SkillSet::MAX);
        let max = band.max.clamp(min, SkillSet::MAX);
        for index in 0..per_tier {
            let mut roll = || rng.gen_range(min..=max);
            let skills = SkillSet::new(roll(), roll(), roll(), roll(), roll(), roll(), roll())
                .expect("clamped tier bands stay within the valid skill range");
            let country = DEMO_COUNTRIES[(next_id as usize - 1) % DEMO_COUNTRIES.len()];
            competitors.push(Competitor::new(
                next_id,
                format!("{} {:02}", tier.label(), index + 1),
                country,
                skills,
                rating,
            ));
            next_id += 1;
        }
    }
    CompetitorPool::new(competitors)
}
