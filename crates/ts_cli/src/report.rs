//! Report rendering: console tables, timestamped summary files and the
//! per-match CSV log.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use ts_core::{BatchReport, MatchSummary, MatrixReport};

const BANNER: &str = "=======================================================";

/// "label: value" rows aligned the way the summary files expect.
pub fn render_rows(rows: &[(String, String)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("{label:<35}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_match_summary(summary: &MatchSummary) -> String {
    let mut lines = vec![
        BANNER.to_string(),
        "|                  MATCH STATISTICS                   |".to_string(),
        BANNER.to_string(),
    ];
    lines.push(render_rows(&summary.rows()));
    lines.join("\n")
}

pub fn render_batch(report: &BatchReport, total_matches: u64, elapsed_secs: f64) -> String {
    let mut lines = vec![
        BANNER.to_string(),
        "|                BATCH SIMULATION RESULTS             |".to_string(),
        BANNER.to_string(),
        format!("Timestamp: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("Total Matches Simulated: {total_matches}"),
        format!("Execution Time: {elapsed_secs:.2} seconds"),
        "-".repeat(55),
    ];
    for pairing in &report.pairings {
        lines.push(format!("\n--- {} ---", pairing.label));
        lines.push(render_rows(&pairing.rows()));
    }
    if !report.skipped.is_empty() {
        lines.push(String::new());
        for label in &report.skipped {
            lines.push(format!("Skipped {label}: no competitors available."));
        }
    }
    lines.join("\n")
}

pub fn render_matrix(report: &MatrixReport) -> String {
    let mut lines = vec![
        BANNER.to_string(),
        "|            OVR MATCHUP MATRIX RESULTS             |".to_string(),
        BANNER.to_string(),
    ];
    for entry in &report.entries {
        lines.push(format!(
            "- {:<18}: {:.1}% / {:.1}%",
            entry.label, entry.win_pct[0], entry.win_pct[1]
        ));
    }
    for label in &report.skipped {
        lines.push(format!("- {label:<18}: skipped (no competitors)"));
    }
    lines.push(BANNER.to_string());
    lines.join("\n")
}

/// Writes the rendered batch summary to a timestamped file in `dir`.
pub fn write_batch_summary(dir: &Path, rendered: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("simulation_summary_{timestamp}.txt"));
    fs::write(&path, rendered)
        .with_context(|| format!("writing summary {}", path.display()))?;
    Ok(path)
}

/// Writes one CSV row per simulated match across all pairings.
pub fn write_match_log(path: &Path, report: &BatchReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("opening match log {}", path.display()))?;
    writer.write_record([
        "match_id",
        "pairing",
        "p1_id",
        "p2_id",
        "winner_id",
        "final_score",
        "num_sets_played",
    ])?;
    let mut match_id = 1u64;
    for pairing in &report.pairings {
        for record in &pairing.matches {
            let winner_side = if record.winner_id == record.competitors[0] {
                0
            } else {
                1
            };
            let final_score = format!(
                "{}-{}",
                record.sets_won[winner_side],
                record.sets_won[1 - winner_side]
            );
            writer.write_record([
                match_id.to_string(),
                pairing.label.clone(),
                record.competitors[0].to_string(),
                record.competitors[1].to_string(),
                record.winner_id.to_string(),
                final_score,
                record.sets_played.to_string(),
            ])?;
            match_id += 1;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_alignment() {
        let rows = vec![
            ("Total Points".to_string(), "120".to_string()),
            ("Ava Hold %".to_string(), "N/A".to_string()),
        ];
        let rendered = render_rows(&rows);
        let mut lines = rendered.lines();
        assert_eq!(lines.next().unwrap(), format!("{:<35}: 120", "Total Points"));
        assert_eq!(lines.next().unwrap(), format!("{:<35}: N/A", "Ava Hold %"));
    }
}
