// crates/fcmtune-core/src/lib.rs

pub mod defaults;
pub mod entropy;
pub mod error;
pub mod fingerprint;
pub mod scorer;
pub mod sequence;
pub mod series;
pub mod tuning;
pub mod words;

pub use crate::entropy::{conditional_entropy, redundancy, shannon_entropy, EntropyReport, FrequencyTable};
pub use crate::error::{FcmError, Result};
pub use crate::scorer::{Configuration, ProcessScorer, Scorer, ScorerError};
pub use crate::series::{moving_average, parse_line, parse_output, ScorePoint, ScoreSeries};
pub use crate::tuning::{ConfigRecord, Grid, TuningEngine, TuningOutcome, TuningResult};
