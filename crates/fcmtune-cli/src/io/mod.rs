// crates/fcmtune-cli/src/io/mod.rs

pub mod jsonl;
pub mod report;
pub mod sequence;
