// crates/fcmtune-cli/src/cmd/baseline.rs
//
// Compression baseline: how many bits per symbol a general-purpose byte
// compressor needs for the same file, next to the order-k entropy estimate.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use fcmtune_core::{defaults, sequence, EntropyReport};
use serde::Serialize;

use crate::io::jsonl;
use crate::io::sequence::SequenceFile;

#[derive(Args, Debug)]
pub struct BaselineArgs {
    /// Sequence files to measure
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Zstd compression level (1..=22 typical). Higher is slower.
    #[arg(long, default_value_t = defaults::ZSTD_LEVEL)]
    pub zstd_level: i32,

    /// Context order for the entropy column
    #[arg(short = 'k', long = "order", default_value_t = defaults::ENTROPY_K)]
    pub k: usize,

    /// Write `<stem>_zstandard.txt` per file into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print one JSON object per file instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct BaselineRow {
    pub file: String,
    pub symbols: usize,
    pub zstd_bits: u64,
    pub zstd_bps: f64,
    pub entropy_bps: f64,
    pub conditional_bps: Option<f64>,
}

pub fn run(args: BaselineArgs) -> anyhow::Result<()> {
    let mut rows = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = SequenceFile::load(path)?;
        let row = measure(&file, args.zstd_level, args.k)?;

        if let Some(dir) = args.out_dir.as_deref() {
            let out = write_summary(dir, path, &row)?;
            eprintln!("wrote baseline: {}", out.display());
        }
        rows.push(row);
    }

    if args.json {
        return jsonl::write_rows_stdout(&rows);
    }

    eprintln!("--- baseline (zstd level {}, k={}) ---", args.zstd_level, args.k);
    for r in &rows {
        let cond = r
            .conditional_bps
            .map(|h| format!("{:.4}", h))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} symbols={} zstd_bits={} zstd_bps={:.4} H0={:.4} Hk={}",
            r.file, r.symbols, r.zstd_bits, r.zstd_bps, r.entropy_bps, cond
        );
    }
    Ok(())
}

pub fn measure(file: &SequenceFile, level: i32, k: usize) -> anyhow::Result<BaselineRow> {
    let compressed = zstd_size(&file.bytes, level)?;
    let symbols = sequence::raw_symbol_count(&file.bytes);
    let zstd_bits = (compressed as u64) * 8;
    let ent = EntropyReport::measure(&file.symbols(), k);

    Ok(BaselineRow {
        file: file.path.display().to_string(),
        symbols,
        zstd_bits,
        zstd_bps: bits_per_symbol(zstd_bits, symbols),
        entropy_bps: ent.shannon,
        conditional_bps: ent.conditional,
    })
}

/// 0 when there are no symbols.
pub fn bits_per_symbol(bits: u64, symbols: usize) -> f64 {
    if symbols == 0 {
        return 0.0;
    }
    (bits as f64) / (symbols as f64)
}

fn zstd_size(bytes: &[u8], level: i32) -> anyhow::Result<usize> {
    let out = zstd::stream::encode_all(Cursor::new(bytes), level)?;
    Ok(out.len())
}

fn write_summary(dir: &Path, input: &Path, row: &BaselineRow) -> anyhow::Result<PathBuf> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string());
    let out = dir.join(format!("{stem}_zstandard.txt"));
    let text = format!(
        "Compressed size: {} bits\nSymbols: {}\nBits per symbol: {:.4}\n",
        row.zstd_bits, row.symbols, row.zstd_bps
    );
    std::fs::write(&out, text).with_context(|| format!("write baseline {}", out.display()))?;
    Ok(out)
}
