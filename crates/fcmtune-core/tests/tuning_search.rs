// crates/fcmtune-core/tests/tuning_search.rs

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fcmtune_core::{Configuration, Grid, Scorer, ScorerError, TuningEngine};

/// Emits `n` rows of constant code length picked by (k, alpha).
struct TableScorer {
    rows: Vec<((u32, f64), f64)>,
    n: usize,
    calls: AtomicUsize,
}

impl TableScorer {
    fn new(rows: &[((u32, f64), f64)]) -> Self {
        Self {
            rows: rows.to_vec(),
            n: 4,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Scorer for TableScorer {
    fn run(&self, _sequence: &Path, k: u32, alpha: f64) -> Result<String, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bits = self
            .rows
            .iter()
            .find(|((rk, ra), _)| *rk == k && *ra == alpha)
            .map(|(_, b)| *b)
            .ok_or_else(|| ScorerError::Exit("exit status: 1".into()))?;

        let mut out = String::from("model loaded\n");
        for i in 0..self.n {
            out.push_str(&format!("{} {} A\n", i, bits));
        }
        out.push_str(&format!("average: {} bps\n", bits));
        Ok(out)
    }
}

/// Records the order in which configurations were requested.
struct OrderScorer {
    seen: Mutex<Vec<(u32, f64)>>,
}

impl Scorer for OrderScorer {
    fn run(&self, _sequence: &Path, k: u32, alpha: f64) -> Result<String, ScorerError> {
        self.seen.lock().unwrap().push((k, alpha));
        Ok(format!("0 {} A\n", k as f64 + alpha))
    }
}

fn seq() -> &'static Path {
    Path::new("sequences/sample.txt")
}

#[test]
fn picks_minimum_mean_from_worked_grid() {
    let scorer = TableScorer::new(&[
        ((1, 0.1), 1.9),
        ((1, 0.5), 1.8),
        ((2, 0.1), 1.5),
        ((2, 0.5), 1.6),
    ]);
    let engine = TuningEngine::new(&scorer);

    let out = engine.search(seq(), &[1, 2], &[0.1, 0.5]).unwrap();
    assert_eq!(out.best, Some(Configuration::new(2, 0.1)));
    assert_eq!(out.result.len(), 4);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 4);

    let best = out.best_record().unwrap();
    assert_eq!(best.series.len(), 4);
    assert!((best.mean_bits.unwrap() - 1.5).abs() < 1e-12);

    let rec = out.result.get(Configuration::new(1, 0.5)).unwrap();
    assert!((rec.mean_bits.unwrap() - 1.8).abs() < 1e-12);

    assert_eq!(
        engine.best_for(seq(), &[1, 2], &[0.1, 0.5]).unwrap(),
        Some(Configuration::new(2, 0.1))
    );
}

#[test]
fn enumerates_k_outer_alpha_inner_ascending() {
    let scorer = OrderScorer {
        seen: Mutex::new(Vec::new()),
    };
    let engine = TuningEngine::new(&scorer);
    // Unsorted input with a duplicate; the grid normalizes it.
    let out = engine.search(seq(), &[3, 1, 3], &[0.5, 0.01]).unwrap();

    let seen = scorer.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![(1, 0.01), (1, 0.5), (3, 0.01), (3, 0.5)]);

    let order: Vec<(u32, f64)> = out
        .result
        .records()
        .iter()
        .map(|r| (r.config.k, r.config.alpha))
        .collect();
    assert_eq!(order, seen);
}

#[test]
fn ties_go_to_first_enumerated_configuration() {
    let scorer = TableScorer::new(&[
        ((1, 0.1), 2.0),
        ((1, 0.5), 1.25),
        ((2, 0.1), 1.25),
        ((2, 0.5), 1.25),
    ]);
    let engine = TuningEngine::new(&scorer);
    let best = engine.best_for(seq(), &[1, 2], &[0.1, 0.5]).unwrap();
    assert_eq!(best, Some(Configuration::new(1, 0.5)));

    // Ranking keeps enumeration order among equal means.
    let out = engine.search(seq(), &[1, 2], &[0.1, 0.5]).unwrap();
    let ranked: Vec<Configuration> = out.result.ranked().iter().map(|r| r.config).collect();
    assert_eq!(
        ranked,
        vec![
            Configuration::new(1, 0.5),
            Configuration::new(2, 0.1),
            Configuration::new(2, 0.5),
            Configuration::new(1, 0.1),
        ]
    );
}

#[test]
fn failed_and_empty_configurations_are_kept_but_never_win() {
    // (1, 0.1) is missing from the table -> scorer error.
    let scorer = TableScorer::new(&[((1, 0.5), 3.0), ((2, 0.1), 2.5)]);
    let engine = TuningEngine::new(&scorer);
    let out = engine.search(seq(), &[1, 2], &[0.1, 0.5]).unwrap();

    assert_eq!(out.result.len(), 4);
    assert_eq!(out.result.failures(), 2);
    assert_eq!(out.best, Some(Configuration::new(2, 0.1)));

    let failed = out.result.get(Configuration::new(1, 0.1)).unwrap();
    assert!(failed.series.is_empty());
    assert_eq!(failed.mean_bits, None);
    assert!(matches!(failed.failure, Some(ScorerError::Exit(_))));

    let ranked = out.result.ranked();
    assert!(ranked[2].mean_bits.is_none());
    assert!(ranked[3].mean_bits.is_none());
}

#[test]
fn output_without_data_rows_is_excluded() {
    struct Chatty;
    impl Scorer for Chatty {
        fn run(&self, _sequence: &Path, k: u32, _alpha: f64) -> Result<String, ScorerError> {
            if k == 1 {
                Ok("usage: fcm <file> -k <k> -a <alpha>\n1 2\n0 x A\n".into())
            } else {
                Ok("0 4.0 A\n1 2.0 C\n2 oops\n".into())
            }
        }
    }
    let out = TuningEngine::new(Chatty).search(seq(), &[1, 2], &[0.1]).unwrap();
    let k1 = out.result.get(Configuration::new(1, 0.1)).unwrap();
    assert!(k1.series.is_empty());
    assert!(k1.failure.is_none());
    assert_eq!(out.best, Some(Configuration::new(2, 0.1)));
    assert_eq!(out.best_record().unwrap().mean_bits, Some(3.0));
}

#[test]
fn no_scored_configuration_means_no_best() {
    let scorer = TableScorer::new(&[]);
    let out = TuningEngine::new(&scorer).search(seq(), &[1], &[0.1, 0.2]).unwrap();
    assert_eq!(out.best, None);
    assert!(out.best_record().is_none());
    assert_eq!(out.result.len(), 2);
}

#[test]
fn search_is_deterministic_and_parallel_matches_sequential() {
    let rows: Vec<((u32, f64), f64)> = (1..=6u32)
        .flat_map(|k| {
            [0.1, 0.01, 0.001]
                .into_iter()
                .map(move |a| ((k, a), 2.0 + ((k as f64) - 3.5).abs() * 0.1 + a))
        })
        .collect();
    let scorer = TableScorer::new(&rows);
    let ks: Vec<u32> = (1..=6).collect();
    let alphas = [0.001, 0.01, 0.1];

    let seq_engine = TuningEngine::new(&scorer);
    let a = seq_engine.search(seq(), &ks, &alphas).unwrap();
    let b = seq_engine.search(seq(), &ks, &alphas).unwrap();
    assert_eq!(a, b);

    let par_engine = TuningEngine::new(&scorer).with_jobs(4);
    let c = par_engine.search(seq(), &ks, &alphas).unwrap();
    assert_eq!(a, c);
    assert_eq!(a.best, Some(Configuration::new(3, 0.001)));
}

#[test]
fn parallel_records_keep_grid_order_and_run_once_each() {
    let scorer = OrderScorer { seen: Mutex::new(Vec::new()) };
    let grid = Grid::new(&[3, 1, 2], &[0.5, 0.1]).unwrap();

    let out = TuningEngine::new(&scorer).with_jobs(16).search_grid(seq(), &grid);
    let order: Vec<Configuration> = out.result.records().iter().map(|r| r.config).collect();
    assert_eq!(order, grid.configurations().collect::<Vec<_>>());

    let mut seen = scorer.seen.lock().unwrap().clone();
    seen.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    assert_eq!(seen.len(), 6);
    seen.dedup();
    assert_eq!(seen.len(), 6);
    assert_eq!(out.best, Some(Configuration::new(1, 0.1)));
}

#[test]
fn invalid_grids_are_rejected_before_any_invocation() {
    let scorer = TableScorer::new(&[((1, 0.1), 1.0)]);
    let engine = TuningEngine::new(&scorer);
    assert!(engine.search(seq(), &[], &[0.1]).is_err());
    assert!(engine.search(seq(), &[1], &[]).is_err());
    assert!(engine.search(seq(), &[0, 1], &[0.1]).is_err());
    assert!(engine.search(seq(), &[1], &[0.0]).is_err());
    assert!(engine.search(seq(), &[1], &[f64::NAN]).is_err());
    assert!(engine.profile(seq(), 0, 0.1).is_err());
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn profile_returns_raw_series() {
    struct Ramp;
    impl Scorer for Ramp {
        fn run(&self, _sequence: &Path, _k: u32, _alpha: f64) -> Result<String, ScorerError> {
            Ok((0..10).map(|i| format!("{} {}.5 G\n", i, i)).collect())
        }
    }
    let series = TuningEngine::new(Ramp).profile(seq(), 4, 0.01).unwrap();
    assert_eq!(series.len(), 10);
    assert_eq!(series.points[0].position, 0);
    assert_eq!(series.points[9].bits, 9.5);
}

#[test]
fn default_grid_is_ascending() {
    let g = Grid::defaults();
    assert_eq!(g.k_values(), (1..=10).collect::<Vec<u32>>().as_slice());
    assert_eq!(g.alpha_values().len(), 10);
    assert!(g.alpha_values().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(g.len(), 100);
    let first = g.configurations().next().unwrap();
    assert_eq!(first.k, 1);
    assert!((first.alpha - 1e-10).abs() < 1e-20);
}
