// crates/fcmtune-cli/src/cmd/tune_words.rs

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use fcmtune_core::{defaults, words, Grid, Scorer};

use crate::cmd::scorer_args::{parse_alpha_list, ScorerArgs};
use crate::cmd::tune::report_for;
use crate::io::report;
use crate::io::sequence::SequenceFile;

#[derive(Args, Debug)]
pub struct TuneWordsArgs {
    /// Text file handed to the scorer
    pub file: PathBuf,

    #[command(flatten)]
    pub scorer: ScorerArgs,

    /// Comma-separated alpha grid. Default 1e-1..1e-10.
    #[arg(long)]
    pub alphas: Option<String>,

    /// Optional text report path (human-readable)
    #[arg(long)]
    pub report: Option<String>,

    /// Optional JSON report path
    #[arg(long)]
    pub json: Option<String>,

    /// Run the scorer once more with the best configuration after the search
    #[arg(long, default_value_t = false)]
    pub rerun_best: bool,
}

pub fn run(args: TuneWordsArgs) -> anyhow::Result<()> {
    let file = SequenceFile::load(&args.file)?;
    let text = file.text();

    let k = words::k_from_word_length(&text);
    let mean_len = words::mean_word_length(&text);
    let alphas = match args.alphas.as_deref() {
        Some(s) => parse_alpha_list(s)?,
        None => defaults::alpha_values(),
    };
    let grid = Grid::new(&[k], &alphas)?;

    eprintln!("--- tune-words ---");
    eprintln!("file        = {}", file.path.display());
    eprintln!("sequence_id = {}", file.sequence_id());
    match mean_len {
        Some(m) => eprintln!("mean_word   = {:.3} -> k={}", m, k),
        None => eprintln!("mean_word   = - (no words) -> k={}", k),
    }
    eprintln!("alphas      = {:?}", grid.alpha_values());

    let engine = args.scorer.engine();
    let t0 = Instant::now();
    let outcome = engine.search_grid(&file.path, &grid);
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    let rep = report_for(&args.scorer.scorer, &file, &grid, &outcome, elapsed_ms);
    eprintln!("--- alpha ranking ---");
    for row in &rep.ranking {
        eprintln!("{}", report::format_rank_row(row));
    }

    if let Some(path) = args.report.as_deref() {
        report::write_text(path, &report::text_lines(&rep, rep.ranking.len()))?;
        eprintln!("wrote report: {}", path);
    }
    if let Some(path) = args.json.as_deref() {
        report::write_json(path, &rep)?;
        eprintln!("wrote json report: {}", path);
    }

    let Some(best) = outcome.best_record() else {
        anyhow::bail!(
            "no alpha produced scorer data for k={} ({} of {} failed)",
            k,
            outcome.result.failures(),
            outcome.result.len()
        );
    };

    if args.rerun_best {
        if let Err(e) = engine.scorer().run(&file.path, best.config.k, best.config.alpha) {
            eprintln!("rerun_best: {} failed: {}", best.config, e);
        }
    }

    println!(
        "best k={} alpha={} bps={:.6}",
        best.config.k,
        best.config.alpha,
        best.mean_bits.unwrap_or_default()
    );
    Ok(())
}
