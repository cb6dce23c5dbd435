// crates/fcmtune-core/src/defaults.rs

use std::time::Duration;

/// Context order used by the entropy estimator when none is given.
pub const ENTROPY_K: usize = 3;

/// Scorer executable looked up relative to the working directory.
pub const SCORER_PATH: &str = "./fcm";

/// Moving-average window applied to exported profiles.
pub const PROFILE_WINDOW: usize = 5;

/// Rows kept when exporting a profile.
pub const PROFILE_LIMIT: usize = 100_000;

/// k used by word-length tuning when the text contains no words.
pub const WORDS_FALLBACK_K: u32 = 5;

pub const ZSTD_LEVEL: i32 = 3;

pub const JOBS: usize = 1;

/// Per-invocation timeout. `None` waits for the scorer indefinitely.
pub const SCORER_TIMEOUT: Option<Duration> = None;

/// k = 1..=10
pub fn k_values() -> Vec<u32> {
    (1..=10).collect()
}

/// alpha = 10^-1 .. 10^-10
pub fn alpha_values() -> Vec<f64> {
    vec![1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9, 1e-10]
}
