// crates/fcmtune-core/tests/process_scorer.rs
//
// Drives ProcessScorer against small shell scripts standing in for the model.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fcmtune_core::{Configuration, ProcessScorer, Scorer, ScorerError, TuningEngine};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perm = fs::metadata(&p).expect("stat script").permissions();
    perm.set_mode(0o755);
    fs::set_permissions(&p, perm).expect("chmod script");
    p
}

#[test]
fn passes_sequence_k_and_alpha_and_captures_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Echo the argv back as a diagnostic line and emit one row per k.
    let script = write_script(
        dir.path(),
        "fcm",
        r#"echo "args: $1 $2 $3 $4 $5"
i=0
while [ "$i" -lt "$3" ]; do
  echo "$i 1.5 A"
  i=$((i + 1))
done"#,
    );

    let scorer = ProcessScorer::new(&script);
    let out = scorer.run(Path::new("seq.txt"), 3, 0.01).expect("run");
    assert!(out.starts_with("args: seq.txt -k 3 -a 0.01\n"), "got: {out}");
    assert_eq!(out.lines().count(), 4);

    let engine = TuningEngine::new(scorer);
    let series = engine.profile(Path::new("seq.txt"), 3, 0.01).expect("profile");
    assert_eq!(series.len(), 3);
    assert_eq!(series.mean_bits(), Some(1.5));
}

#[test]
fn non_zero_exit_is_a_failure_not_a_panic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(dir.path(), "fcm", "echo '0 1.0 A'\nexit 3");

    let err = ProcessScorer::new(&script)
        .run(Path::new("seq.txt"), 1, 0.1)
        .unwrap_err();
    assert!(matches!(err, ScorerError::Exit(_)), "got {err:?}");
}

#[test]
fn missing_program_is_a_spawn_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ProcessScorer::new(dir.path().join("no-such-fcm"))
        .run(Path::new("seq.txt"), 1, 0.1)
        .unwrap_err();
    assert!(matches!(err, ScorerError::Spawn { .. }), "got {err:?}");
}

#[test]
fn timeout_kills_slow_scorer_and_search_continues() {
    let dir = tempfile::tempdir().expect("tempdir");
    // k=2 hangs; every other k answers immediately.
    let script = write_script(
        dir.path(),
        "fcm",
        r#"if [ "$3" = "2" ]; then exec sleep 30; fi
echo "0 $3 A""#,
    );

    let scorer = ProcessScorer::new(&script).with_timeout(Some(Duration::from_millis(300)));
    let engine = TuningEngine::new(scorer);

    let t0 = Instant::now();
    let out = engine.search(Path::new("seq.txt"), &[1, 2, 3], &[0.1]).expect("search");
    assert!(t0.elapsed() < Duration::from_secs(20), "timeout not enforced");

    let slow = out.result.get(Configuration::new(2, 0.1)).unwrap();
    assert!(matches!(slow.failure, Some(ScorerError::Timeout(_))));
    assert!(slow.series.is_empty());

    assert_eq!(out.result.failures(), 1);
    assert_eq!(out.best, Some(Configuration::new(1, 0.1)));
}

#[test]
fn timeout_covers_output_held_open_by_a_leftover_process() {
    let dir = tempfile::tempdir().expect("tempdir");
    // The script exits at once but its background child keeps stdout open.
    let script = write_script(dir.path(), "fcm", "echo '0 1.0 A'\nsleep 5 &\nexit 0");

    let scorer = ProcessScorer::new(&script).with_timeout(Some(Duration::from_millis(300)));
    let t0 = Instant::now();
    let err = scorer.run(Path::new("seq.txt"), 1, 0.1).unwrap_err();
    let elapsed = t0.elapsed();

    assert!(matches!(err, ScorerError::Timeout(_)), "got {err:?}");
    assert!(elapsed < Duration::from_secs(3), "run took {elapsed:?}");
}

#[test]
fn leftover_process_without_output_does_not_trip_the_timeout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(dir.path(), "fcm", "echo '0 1.0 A'\nsleep 5 >/dev/null &\nexit 0");

    let out = ProcessScorer::new(&script)
        .with_timeout(Some(Duration::from_secs(2)))
        .run(Path::new("seq.txt"), 1, 0.1)
        .expect("run");
    assert_eq!(out, "0 1.0 A\n");
}
