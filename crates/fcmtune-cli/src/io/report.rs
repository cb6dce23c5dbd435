// crates/fcmtune-cli/src/io/report.rs

use anyhow::Context;
use fcmtune_core::{Configuration, TuningOutcome};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RankRow {
    pub rank: usize,
    pub k: u32,
    pub alpha: f64,
    pub mean_bits: Option<f64>,
    pub points: usize,
    pub failure: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TuneReport {
    pub file: String,
    pub sequence_id: String,
    pub crc32: String,
    pub scorer: String,
    pub k_values: Vec<u32>,
    pub alpha_values: Vec<f64>,
    pub best: Option<Configuration>,
    pub best_bps: Option<f64>,
    pub configurations: usize,
    pub failures: usize,
    pub elapsed_ms: u64,
    pub ranking: Vec<RankRow>,
}

pub fn ranking_rows(outcome: &TuningOutcome) -> Vec<RankRow> {
    outcome
        .result
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankRow {
            rank: i + 1,
            k: r.config.k,
            alpha: r.config.alpha,
            mean_bits: r.mean_bits,
            points: r.series.len(),
            failure: r.failure.as_ref().map(|e| e.to_string()),
        })
        .collect()
}

pub fn format_rank_row(row: &RankRow) -> String {
    match (row.mean_bits, row.failure.as_deref()) {
        (Some(m), _) => format!(
            "#{:>2} k={} alpha={} bps={:.6} points={}",
            row.rank, row.k, row.alpha, m, row.points
        ),
        (None, Some(why)) => format!(
            "#{:>2} k={} alpha={} bps=- failed: {}",
            row.rank, row.k, row.alpha, why
        ),
        (None, None) => format!(
            "#{:>2} k={} alpha={} bps=- (no data rows)",
            row.rank, row.k, row.alpha
        ),
    }
}

/// Human-readable report, top `top` ranking rows.
pub fn text_lines(report: &TuneReport, top: usize) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("--- fcmtune tune report ---".to_string());
    lines.push(format!("file           = {}", report.file));
    lines.push(format!("sequence_id    = {}", report.sequence_id));
    lines.push(format!("crc32          = {}", report.crc32));
    lines.push(format!("scorer         = {}", report.scorer));
    lines.push(format!("k_values       = {:?}", report.k_values));
    lines.push(format!("alpha_values   = {:?}", report.alpha_values));
    lines.push(format!("configurations = {}", report.configurations));
    lines.push(format!("failures       = {}", report.failures));
    match (report.best, report.best_bps) {
        (Some(c), Some(bps)) => {
            lines.push(format!("best           = k={} alpha={}", c.k, c.alpha));
            lines.push(format!("best_bps       = {:.6}", bps));
        }
        _ => lines.push("best           = none (no configuration produced data)".to_string()),
    }
    lines.push(format!("elapsed_ms     = {}", report.elapsed_ms));
    lines.push(String::new());

    let n = top.min(report.ranking.len());
    lines.push(format!("--- ranking (top {}) ---", n));
    for row in report.ranking.iter().take(n) {
        lines.push(format_rank_row(row));
    }
    lines
}

pub fn write_text(path: &str, lines: &[String]) -> anyhow::Result<()> {
    let text = lines.join("\n") + "\n";
    std::fs::write(path, text).with_context(|| format!("write report: {path}"))
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text + "\n").with_context(|| format!("write json report: {path}"))
}
