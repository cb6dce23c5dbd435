// crates/fcmtune-cli/src/cmd/scorer_args.rs
//
// Flags shared by every subcommand that starts the external scorer.

use std::time::Duration;

use clap::Args;
use fcmtune_core::{defaults, ProcessScorer, TuningEngine};

#[derive(Args, Debug, Clone)]
pub struct ScorerArgs {
    /// Scorer executable, invoked as `<scorer> <file> -k <k> -a <alpha>`
    #[arg(long, default_value = defaults::SCORER_PATH)]
    pub scorer: String,

    /// Kill a scorer run after this many milliseconds and count it as failed
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Scorer runs in flight at once (results are identical for any value)
    #[arg(long, default_value_t = defaults::JOBS)]
    pub jobs: usize,
}

impl ScorerArgs {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis).or(defaults::SCORER_TIMEOUT)
    }

    pub fn engine(&self) -> TuningEngine<ProcessScorer> {
        let scorer = ProcessScorer::new(&self.scorer).with_timeout(self.timeout());
        TuningEngine::new(scorer).with_jobs(self.jobs)
    }
}

pub fn parse_k_list(s: &str) -> anyhow::Result<Vec<u32>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        // "a..=b" / "a..b" ranges
        if let Some((lo, hi)) = p.split_once("..") {
            let (hi, inclusive) = match hi.strip_prefix('=') {
                Some(h) => (h, true),
                None => (hi, false),
            };
            let lo: u32 = lo.trim().parse().map_err(|_| anyhow::anyhow!("invalid k range: {}", p))?;
            let hi: u32 = hi.trim().parse().map_err(|_| anyhow::anyhow!("invalid k range: {}", p))?;
            if inclusive {
                out.extend(lo..=hi);
            } else {
                out.extend(lo..hi);
            }
            continue;
        }
        let v: u32 = p.parse().map_err(|_| anyhow::anyhow!("invalid k entry: {}", p))?;
        out.push(v);
    }
    if out.is_empty() {
        anyhow::bail!("k list provided but no valid entries found");
    }
    Ok(out)
}

pub fn parse_alpha_list(s: &str) -> anyhow::Result<Vec<f64>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        let v: f64 = p.parse().map_err(|_| anyhow::anyhow!("invalid alpha entry: {}", p))?;
        if !v.is_finite() || v <= 0.0 {
            anyhow::bail!("alpha entries must be > 0 (got {})", v);
        }
        out.push(v);
    }
    if out.is_empty() {
        anyhow::bail!("alpha list provided but no valid entries found");
    }
    Ok(out)
}
