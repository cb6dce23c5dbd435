// crates/fcmtune-cli/src/cmd/profile.rs

use std::path::PathBuf;

use clap::Args;
use fcmtune_core::defaults;

use crate::cmd::scorer_args::ScorerArgs;
use crate::io::jsonl;
use crate::io::sequence::SequenceFile;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Sequence file handed to the scorer
    pub file: PathBuf,

    /// Context order
    #[arg(short = 'k')]
    pub k: u32,

    /// Smoothing factor
    #[arg(short = 'a')]
    pub alpha: f64,

    #[command(flatten)]
    pub scorer: ScorerArgs,

    /// Output JSONL path; stdout if omitted
    #[arg(long)]
    pub out: Option<String>,

    /// Moving-average window for the "smooth" column
    #[arg(long, default_value_t = defaults::PROFILE_WINDOW)]
    pub window: usize,

    /// Max rows written
    #[arg(long, default_value_t = defaults::PROFILE_LIMIT)]
    pub limit: usize,
}

pub fn run(args: ProfileArgs) -> anyhow::Result<()> {
    let file = SequenceFile::load(&args.file)?;
    let engine = args.scorer.engine();

    let series = engine.profile(&file.path, args.k, args.alpha)?;
    if series.is_empty() {
        anyhow::bail!(
            "scorer produced no data rows for k={} alpha={} (see the scorer warning above)",
            args.k,
            args.alpha
        );
    }

    let rows = jsonl::profile_rows(&series, args.window, args.limit);
    match args.out.as_deref() {
        Some(p) => {
            jsonl::write_rows_file(p, &rows)?;
            eprintln!(
                "wrote profile: {} (rows={} of {} window={} bps={:.6})",
                p,
                rows.len(),
                series.len(),
                args.window,
                series.mean_bits().unwrap_or_default()
            );
        }
        None => jsonl::write_rows_stdout(&rows)?,
    }
    Ok(())
}
