// crates/fcmtune-core/src/tuning.rs
//
// Grid search over (k, alpha).
//
// Enumeration order is k ascending (outer) then alpha ascending (inner). The
// order is part of the contract: when two configurations reach the same mean,
// the one enumerated first wins.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::defaults;
use crate::error::{FcmError, Result};
use crate::scorer::{Configuration, Scorer, ScorerError};
use crate::series::{parse_output, ScoreSeries};

/// Validated, sorted, de-duplicated candidate lists.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    k_values: Vec<u32>,
    alpha_values: Vec<f64>,
}

impl Grid {
    pub fn new(k_values: &[u32], alpha_values: &[f64]) -> Result<Self> {
        if k_values.is_empty() {
            return Err(FcmError::Validation("k grid is empty".into()));
        }
        if alpha_values.is_empty() {
            return Err(FcmError::Validation("alpha grid is empty".into()));
        }
        if k_values.contains(&0) {
            return Err(FcmError::Validation("k must be >= 1".into()));
        }
        if let Some(a) = alpha_values.iter().find(|a| !a.is_finite() || **a <= 0.0) {
            return Err(FcmError::Validation(format!(
                "alpha must be finite and > 0 (got {a})"
            )));
        }

        let mut k_values = k_values.to_vec();
        k_values.sort_unstable();
        k_values.dedup();

        let mut alpha_values = alpha_values.to_vec();
        alpha_values.sort_by(f64::total_cmp);
        alpha_values.dedup();

        Ok(Self {
            k_values,
            alpha_values,
        })
    }

    pub fn single(config: Configuration) -> Result<Self> {
        Self::new(&[config.k], &[config.alpha])
    }

    /// k = 1..=10, alpha = 1e-1..=1e-10
    pub fn defaults() -> Self {
        let mut alpha_values = defaults::alpha_values();
        alpha_values.sort_by(f64::total_cmp);
        Self {
            k_values: defaults::k_values(),
            alpha_values,
        }
    }

    pub fn k_values(&self) -> &[u32] {
        &self.k_values
    }

    pub fn alpha_values(&self) -> &[f64] {
        &self.alpha_values
    }

    pub fn len(&self) -> usize {
        self.k_values.len() * self.alpha_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.k_values.iter().flat_map(move |&k| {
            self.alpha_values
                .iter()
                .map(move |&alpha| Configuration::new(k, alpha))
        })
    }
}

/// Outcome of one scorer invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigRecord {
    pub config: Configuration,
    pub series: ScoreSeries,
    /// `None` when the series is empty; such records never win.
    pub mean_bits: Option<f64>,
    pub failure: Option<ScorerError>,
}

impl ConfigRecord {
    fn from_output(config: Configuration, output: std::result::Result<String, ScorerError>) -> Self {
        match output {
            Ok(text) => {
                let series = parse_output(&text);
                let mean_bits = series.mean_bits();
                Self {
                    config,
                    series,
                    mean_bits,
                    failure: None,
                }
            }
            Err(e) => Self {
                config,
                series: ScoreSeries::default(),
                mean_bits: None,
                failure: Some(e),
            },
        }
    }
}

/// Every configuration tried, in enumeration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TuningResult {
    records: Vec<ConfigRecord>,
}

impl TuningResult {
    pub fn records(&self) -> &[ConfigRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, config: Configuration) -> Option<&ConfigRecord> {
        self.records.iter().find(|r| r.config == config)
    }

    /// Minimum mean bits/symbol; the first record wins ties.
    pub fn best(&self) -> Option<&ConfigRecord> {
        self.records
            .iter()
            .filter_map(|r| r.mean_bits.map(|m| (r, m)))
            .fold(None, |best: Option<(&ConfigRecord, f64)>, (r, m)| match best {
                Some((_, bm)) if bm <= m => best,
                _ => Some((r, m)),
            })
            .map(|(r, _)| r)
    }

    /// Scored records by ascending mean, then unscored ones. Stable, so ties
    /// keep enumeration order.
    pub fn ranked(&self) -> Vec<&ConfigRecord> {
        let mut rows: Vec<&ConfigRecord> = self.records.iter().collect();
        rows.sort_by(|a, b| match (a.mean_bits, b.mean_bits) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        rows
    }

    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.failure.is_some()).count()
    }
}

impl FromIterator<ConfigRecord> for TuningResult {
    fn from_iter<I: IntoIterator<Item = ConfigRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TuningOutcome {
    pub result: TuningResult,
    pub best: Option<Configuration>,
}

impl TuningOutcome {
    fn from_result(result: TuningResult) -> Self {
        let best = result.best().map(|r| r.config);
        Self { result, best }
    }

    pub fn best_record(&self) -> Option<&ConfigRecord> {
        self.best.and_then(|c| self.result.get(c))
    }
}

/// Drives a [`Scorer`] across a [`Grid`].
#[derive(Clone, Debug)]
pub struct TuningEngine<S> {
    scorer: S,
    jobs: usize,
}

impl<S: Scorer + Sync> TuningEngine<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            jobs: defaults::JOBS,
        }
    }

    /// Concurrent scorer invocations; 0 and 1 both mean sequential.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn search(&self, sequence: &Path, k_values: &[u32], alpha_values: &[f64]) -> Result<TuningOutcome> {
        let grid = Grid::new(k_values, alpha_values)?;
        Ok(self.search_grid(sequence, &grid))
    }

    pub fn search_grid(&self, sequence: &Path, grid: &Grid) -> TuningOutcome {
        let configs: Vec<Configuration> = grid.configurations().collect();
        let t0 = Instant::now();

        tracing::info!(
            sequence = %sequence.display(),
            configurations = configs.len(),
            jobs = self.jobs,
            "search start"
        );

        let result: TuningResult = if self.jobs > 1 && configs.len() > 1 {
            self.run_parallel(sequence, &configs).into_iter().collect()
        } else {
            configs
                .iter()
                .map(|&c| self.evaluate(sequence, c))
                .collect()
        };

        let outcome = TuningOutcome::from_result(result);
        match outcome.best_record() {
            Some(best) => tracing::info!(
                best_k = best.config.k,
                best_alpha = best.config.alpha,
                best_bps = best.mean_bits.unwrap_or_default(),
                failures = outcome.result.failures(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "search done"
            ),
            None => tracing::warn!(
                failures = outcome.result.failures(),
                "search done without any scored configuration"
            ),
        }
        outcome
    }

    pub fn best_for(&self, sequence: &Path, k_values: &[u32], alpha_values: &[f64]) -> Result<Option<Configuration>> {
        Ok(self.search(sequence, k_values, alpha_values)?.best)
    }

    /// Raw series of a single configuration. A failed invocation yields an
    /// empty series.
    pub fn profile(&self, sequence: &Path, k: u32, alpha: f64) -> Result<ScoreSeries> {
        let config = Configuration::new(k, alpha);
        Grid::single(config)?;
        Ok(self.evaluate(sequence, config).series)
    }

    /// Run the scorer once and parse its output. Never fails.
    pub fn evaluate(&self, sequence: &Path, config: Configuration) -> ConfigRecord {
        let start = Instant::now();
        let out = self.scorer.run(sequence, config.k, config.alpha);
        let rec = ConfigRecord::from_output(config, out);

        match &rec.failure {
            Some(e) => tracing::warn!(k = config.k, alpha = config.alpha, error = %e, "scorer failed"),
            None => tracing::debug!(
                k = config.k,
                alpha = config.alpha,
                points = rec.series.len(),
                mean_bits = rec.mean_bits.unwrap_or(f64::NAN),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "scored"
            ),
        }
        rec
    }

    // Indexed collect keeps grid order regardless of which worker finishes
    // first.
    fn run_parallel(&self, sequence: &Path, configs: &[Configuration]) -> Vec<ConfigRecord> {
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(jobs = self.jobs, error = %e, "thread pool unavailable, scoring sequentially");
                return configs.iter().map(|&c| self.evaluate(sequence, c)).collect();
            }
        };
        pool.install(|| configs.par_iter().map(|&c| self.evaluate(sequence, c)).collect())
    }
}
