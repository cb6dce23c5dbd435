// crates/fcmtune-cli/src/io/jsonl.rs

use std::io::Write;

use anyhow::Context;
use fcmtune_core::{moving_average, ScoreSeries};
use serde::Serialize;

/// One exported profile row: {"pos":N,"bits":X,"smooth":Y}
#[derive(Debug, Serialize)]
pub struct ProfileRow {
    pub pos: u64,
    pub bits: f64,
    pub smooth: f64,
}

/// Pair each point with its trailing moving average; at most `limit` rows.
pub fn profile_rows(series: &ScoreSeries, window: usize, limit: usize) -> Vec<ProfileRow> {
    let bits: Vec<f64> = series.bits().take(limit).collect();
    let smooth = moving_average(&bits, window);
    series
        .points
        .iter()
        .zip(smooth)
        .map(|(p, s)| ProfileRow {
            pos: p.position,
            bits: p.bits,
            smooth: s,
        })
        .collect()
}

pub fn write_rows<W: Write, T: Serialize>(mut w: W, rows: &[T]) -> anyhow::Result<()> {
    for r in rows {
        serde_json::to_writer(&mut w, r)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_rows_file<T: Serialize>(path: &str, rows: &[T]) -> anyhow::Result<()> {
    let f = std::fs::File::create(path).with_context(|| format!("create jsonl: {path}"))?;
    write_rows(std::io::BufWriter::new(f), rows).with_context(|| format!("write jsonl: {path}"))
}

pub fn write_rows_stdout<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    write_rows(stdout.lock(), rows)
}
