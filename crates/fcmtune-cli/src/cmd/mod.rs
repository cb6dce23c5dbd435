// crates/fcmtune-cli/src/cmd/mod.rs

pub mod baseline;
pub mod entropy;
pub mod profile;
pub mod scorer_args;
pub mod tune;
pub mod tune_words;
