// crates/fcmtune-cli/src/cmd/tune.rs

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use fcmtune_core::{defaults, Configuration, Grid, ProcessScorer, Scorer, TuningEngine, TuningOutcome};

use crate::cmd::scorer_args::{parse_alpha_list, parse_k_list, ScorerArgs};
use crate::io::jsonl;
use crate::io::report::{self, TuneReport};
use crate::io::sequence::SequenceFile;

#[derive(Args, Debug)]
pub struct TuneArgs {
    /// Sequence file handed to the scorer
    pub file: PathBuf,

    /// Evaluate only this context order (requires -a)
    #[arg(short = 'k')]
    pub k: Option<u32>,

    /// Evaluate only this smoothing factor (requires -k)
    #[arg(short = 'a')]
    pub alpha: Option<f64>,

    #[command(flatten)]
    pub scorer: ScorerArgs,

    /// Comma-separated k grid, ranges allowed ("1..=10", "3,5,7"). Default 1..=10.
    #[arg(long)]
    pub k_values: Option<String>,

    /// Comma-separated alpha grid ("0.1,0.01"). Default 1e-1..1e-10.
    #[arg(long)]
    pub alphas: Option<String>,

    /// Ranking rows printed to stderr
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Optional text report path (human-readable)
    #[arg(long)]
    pub report: Option<String>,

    /// Optional JSON report path (ranking + best)
    #[arg(long)]
    pub json: Option<String>,

    /// Write the profile (JSONL) of the evaluated or best configuration
    #[arg(long)]
    pub profile_out: Option<String>,

    /// Moving-average window for --profile-out
    #[arg(long, default_value_t = defaults::PROFILE_WINDOW)]
    pub window: usize,

    /// Max profile rows for --profile-out
    #[arg(long, default_value_t = defaults::PROFILE_LIMIT)]
    pub limit: usize,

    /// Run the scorer once more with the best configuration after the search
    #[arg(long, default_value_t = false)]
    pub rerun_best: bool,
}

pub fn run(args: TuneArgs) -> anyhow::Result<()> {
    let file = SequenceFile::load(&args.file)?;
    let engine = args.scorer.engine();

    match (args.k, args.alpha) {
        (Some(k), Some(alpha)) => run_single(&args, &file, &engine, Configuration::new(k, alpha)),
        (None, None) => {
            let grid = build_grid(args.k_values.as_deref(), args.alphas.as_deref())?;
            run_grid(&args, &file, &engine, &grid)
        }
        _ => anyhow::bail!("-k and -a must be given together (or both omitted for a grid search)"),
    }
}

pub fn build_grid(k_values: Option<&str>, alphas: Option<&str>) -> anyhow::Result<Grid> {
    if k_values.is_none() && alphas.is_none() {
        return Ok(Grid::defaults());
    }
    let ks = match k_values {
        Some(s) => parse_k_list(s)?,
        None => defaults::k_values(),
    };
    let alphas = match alphas {
        Some(s) => parse_alpha_list(s)?,
        None => defaults::alpha_values(),
    };
    Ok(Grid::new(&ks, &alphas)?)
}

fn run_single(
    args: &TuneArgs,
    file: &SequenceFile,
    engine: &TuningEngine<ProcessScorer>,
    config: Configuration,
) -> anyhow::Result<()> {
    Grid::single(config)?;

    eprintln!("--- tune (single) ---");
    eprintln!("file        = {}", file.path.display());
    eprintln!("sequence_id = {}", file.sequence_id());
    eprintln!("scorer      = {}", args.scorer.scorer);
    eprintln!("config      = {}", config);

    let t0 = Instant::now();
    let rec = engine.evaluate(&file.path, config);
    let elapsed_ms = t0.elapsed().as_millis();

    if let Some(e) = &rec.failure {
        anyhow::bail!("scorer failed for {}: {}", config, e);
    }
    let Some(mean) = rec.mean_bits else {
        anyhow::bail!("scorer produced no data rows for {}", config);
    };

    eprintln!("points      = {}", rec.series.len());
    eprintln!("total_bits  = {:.3}", rec.series.total_bits());
    eprintln!("elapsed_ms  = {}", elapsed_ms);

    if let Some(path) = args.profile_out.as_deref() {
        let rows = jsonl::profile_rows(&rec.series, args.window, args.limit);
        jsonl::write_rows_file(path, &rows)?;
        eprintln!("wrote profile: {} (rows={} window={})", path, rows.len(), args.window);
    }

    println!("k={} alpha={} bps={:.6}", config.k, config.alpha, mean);
    Ok(())
}

fn run_grid(
    args: &TuneArgs,
    file: &SequenceFile,
    engine: &TuningEngine<ProcessScorer>,
    grid: &Grid,
) -> anyhow::Result<()> {
    eprintln!("--- tune ---");
    eprintln!("file        = {}", file.path.display());
    eprintln!("sequence_id = {}", file.sequence_id());
    eprintln!("scorer      = {}", args.scorer.scorer);
    eprintln!(
        "grid        = k{:?} x alpha{:?} ({} configurations, jobs={})",
        grid.k_values(),
        grid.alpha_values(),
        grid.len(),
        args.scorer.jobs
    );

    let t0 = Instant::now();
    let outcome = engine.search_grid(&file.path, grid);
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    let rep = report_for(&args.scorer.scorer, file, grid, &outcome, elapsed_ms);

    let n = args.top.min(rep.ranking.len());
    eprintln!("--- tune ranking (top {}) ---", n);
    for row in rep.ranking.iter().take(n) {
        eprintln!("{}", report::format_rank_row(row));
    }

    if let Some(path) = args.report.as_deref() {
        report::write_text(path, &report::text_lines(&rep, args.top))?;
        eprintln!("wrote report: {}", path);
    }
    if let Some(path) = args.json.as_deref() {
        report::write_json(path, &rep)?;
        eprintln!("wrote json report: {}", path);
    }

    let Some(best) = outcome.best_record() else {
        anyhow::bail!(
            "no configuration produced scorer data ({} of {} failed)",
            outcome.result.failures(),
            outcome.result.len()
        );
    };
    let best_bps = best.mean_bits.unwrap_or_default();

    if let Some(path) = args.profile_out.as_deref() {
        let rows = jsonl::profile_rows(&best.series, args.window, args.limit);
        jsonl::write_rows_file(path, &rows)?;
        eprintln!("wrote profile: {} (rows={} window={})", path, rows.len(), args.window);
    }

    if args.rerun_best {
        match engine.scorer().run(&file.path, best.config.k, best.config.alpha) {
            Ok(_) => eprintln!("rerun_best: {} ok", best.config),
            Err(e) => eprintln!("rerun_best: {} failed: {}", best.config, e),
        }
    }

    eprintln!(
        "tune ok: best_k={} best_alpha={} bps={:.6} failures={} elapsed_ms={}",
        best.config.k,
        best.config.alpha,
        best_bps,
        outcome.result.failures(),
        elapsed_ms
    );
    println!("best k={} alpha={} bps={:.6}", best.config.k, best.config.alpha, best_bps);
    Ok(())
}

pub fn report_for(
    scorer: &str,
    file: &SequenceFile,
    grid: &Grid,
    outcome: &TuningOutcome,
    elapsed_ms: u64,
) -> TuneReport {
    TuneReport {
        file: file.path.display().to_string(),
        sequence_id: file.sequence_id(),
        crc32: format!("{:08x}", file.crc32()),
        scorer: scorer.to_string(),
        k_values: grid.k_values().to_vec(),
        alpha_values: grid.alpha_values().to_vec(),
        best: outcome.best,
        best_bps: outcome.best_record().and_then(|r| r.mean_bits),
        configurations: outcome.result.len(),
        failures: outcome.result.failures(),
        elapsed_ms,
        ranking: report::ranking_rows(outcome),
    }
}
