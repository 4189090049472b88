//! Tennis Simulation CLI
//!
//! Drivers over `ts_core`:
//! - `exhibition`: one match with a point-by-point trace and a stats table
//! - `batch`: tier-vs-tier sweep with aggregate reports and a match log
//! - `matrix`: win-percentage matrix around a base overall rating

mod report;
mod roster;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ts_core::{
    BatchPlan, Competitor, CompetitorPool, MatchEngine, MatchPlan, SimulationConfig, Tier,
    TraceResolver,
};

#[derive(Parser)]
#[command(name = "ts_cli")]
#[command(about = "Tennis match simulation drivers", long_about = None)]
struct Cli {
    /// Optional YAML file overriding the default simulation tuning
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show engine debug events (game/set boundaries) as well
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match with a point-by-point trace
    Exhibition {
        /// JSON roster file; a seeded demo roster is used when omitted
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Roster ids of the two competitors (defaults to two demo players)
        #[arg(long)]
        p1: Option<u32>,
        #[arg(long)]
        p2: Option<u32>,

        /// Tier of the demo players when no roster is given
        #[arg(long, default_value = "Pro")]
        tier: String,

        /// Best-of-N sets (odd)
        #[arg(long, default_value = "5")]
        best_of: u8,

        /// Match seed; random when omitted (printed for reproduction)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Tier-vs-tier batch sweep with aggregate reports
    Batch {
        /// JSON roster file; a seeded demo roster is used when omitted
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Matches per tier pairing
        #[arg(long, default_value = "5000")]
        matches: u32,

        /// Best-of-N sets (odd)
        #[arg(long, default_value = "3")]
        best_of: u8,

        /// Sweep seed
        #[arg(long, default_value = "7")]
        seed: u64,

        /// Directory for the timestamped summary report
        #[arg(long, default_value = "sim_stats")]
        out_dir: PathBuf,

        /// Optional per-match CSV log path
        #[arg(long)]
        match_log: Option<PathBuf>,
    },

    /// Rating-vs-rating win matrix around a base overall
    Matrix {
        /// JSON roster file; a seeded demo roster is used when omitted
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Overall rating under test
        #[arg(long, default_value = "80")]
        base: u8,

        /// Test against overalls within +/- this spread
        #[arg(long, default_value = "5")]
        spread: u8,

        /// Matches per rating pairing
        #[arg(long, default_value = "5000")]
        matches: u32,

        /// Best-of-N sets (odd)
        #[arg(long, default_value = "3")]
        best_of: u8,

        /// Sweep seed
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Exhibition {
            roster,
            p1,
            p2,
            tier,
            best_of,
            seed,
        } => exhibition(&config, roster, p1, p2, &tier, best_of, seed),
        Commands::Batch {
            roster,
            matches,
            best_of,
            seed,
            out_dir,
            match_log,
        } => batch(&config, roster, matches, best_of, seed, &out_dir, match_log),
        Commands::Matrix {
            roster,
            base,
            spread,
            matches,
            best_of,
            seed,
        } => matrix(&config, roster, base, spread, matches, best_of, seed),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<SimulationConfig> {
    let config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn load_pool(
    roster: Option<PathBuf>,
    seed: u64,
    config: &SimulationConfig,
) -> Result<CompetitorPool> {
    match roster {
        Some(path) => roster::load_roster(&path, &config.rating),
        None => Ok(roster::demo_roster(seed, 8, &config.rating)),
    }
}

fn parse_tier(label: &str) -> Result<Tier> {
    Tier::ALL
        .into_iter()
        .find(|tier| tier.label().eq_ignore_ascii_case(label))
        .with_context(|| format!("unknown tier '{label}'"))
}

/// Picks a competitor by roster id, or the n-th demo player of a tier.
fn pick_competitor<'p>(
    pool: &'p CompetitorPool,
    config: &SimulationConfig,
    id: Option<u32>,
    tier_label: &str,
    fallback: usize,
) -> Result<&'p Competitor> {
    match id {
        Some(id) => pool
            .all()
            .iter()
            .find(|c| c.id == id)
            .with_context(|| format!("no competitor with id {id} in the roster")),
        None => {
            let tier = parse_tier(tier_label)?;
            let bucket = pool.tier(tier, &config.rating.tiers);
            bucket.get(fallback).copied().with_context(|| {
                format!("demo roster has no {} competitor #{fallback}", tier.label())
            })
        }
    }
}

fn exhibition(
    config: &SimulationConfig,
    roster: Option<PathBuf>,
    p1: Option<u32>,
    p2: Option<u32>,
    tier: &str,
    best_of: u8,
    seed: Option<u64>,
) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let pool = load_pool(roster, seed, config)?;

    let first = pick_competitor(&pool, config, p1, tier, 0)?;
    let second = pick_competitor(&pool, config, p2, tier, 1)?;
    if first.id == second.id {
        bail!("a competitor cannot play themself (id {})", first.id);
    }

    println!("=======================================================");
    println!("|          STARTING SINGLE MATCH SIMULATION           |");
    println!("=======================================================");
    println!("{first}");
    println!("{second}");
    println!("Seed: {seed}");

    let plan = MatchPlan {
        competitors: [first, second],
        best_of,
        seed,
    };
    let result = MatchEngine::new(plan, config, &TraceResolver)?.simulate();

    let winner_name = if result.winner == 0 {
        &first.name
    } else {
        &second.name
    };
    println!();
    println!("MATCH COMPLETE! Winner: {winner_name}");
    println!("Final Score: {}", result.score_line());
    for (index, set) in result.set_scores.iter().enumerate() {
        let suffix = if set.tiebreak { " (tiebreak)" } else { "" };
        println!(
            "  Set {}: {}-{}{suffix}",
            index + 1,
            set.games[0],
            set.games[1]
        );
    }
    println!();
    println!("{}", report::render_match_summary(&result.statistics.summarize()));
    Ok(())
}

fn batch(
    config: &SimulationConfig,
    roster: Option<PathBuf>,
    matches: u32,
    best_of: u8,
    seed: u64,
    out_dir: &std::path::Path,
    match_log: Option<PathBuf>,
) -> Result<()> {
    let pool = load_pool(roster, seed, config)?;
    let plan = BatchPlan {
        matches_per_pairing: matches,
        best_of,
    };

    println!("=======================================================");
    println!("|  STARTING BATCH SIMULATION ({matches} MATCHES PER PAIRING)  |");
    println!("=======================================================");

    let start = Instant::now();
    let batch_report = ts_core::batch::tier_sweep(&pool, &config.rating.tiers, &plan, seed, config);
    let elapsed = start.elapsed().as_secs_f64();

    let total_matches: u64 = batch_report
        .pairings
        .iter()
        .map(|pairing| pairing.aggregate.matches as u64)
        .sum();
    let rendered = report::render_batch(&batch_report, total_matches, elapsed);
    println!("{rendered}");

    let summary_path = report::write_batch_summary(out_dir, &rendered)?;
    println!();
    println!("Summary report saved to '{}'", summary_path.display());
    if let Some(path) = match_log {
        report::write_match_log(&path, &batch_report)?;
        println!("Detailed match log saved to '{}'", path.display());
    }
    Ok(())
}

fn matrix(
    config: &SimulationConfig,
    roster: Option<PathBuf>,
    base: u8,
    spread: u8,
    matches: u32,
    best_of: u8,
    seed: u64,
) -> Result<()> {
    let pool = load_pool(roster, seed, config)?;
    let plan = BatchPlan {
        matches_per_pairing: matches,
        best_of,
    };

    println!("=======================================================");
    println!("|  STARTING OVR MATCHUP MATRIX ({matches} SIMS EACH)  |");
    println!("|  Testing Base OVR: {base}                           |");
    println!("=======================================================");

    let matrix_report = ts_core::batch::rating_matrix(&pool, base, spread, &plan, seed, config);
    println!("{}", report::render_matrix(&matrix_report));
    Ok(())
}
