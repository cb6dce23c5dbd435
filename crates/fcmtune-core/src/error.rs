// crates/fcmtune-core/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FcmError>;

#[derive(Debug, Error)]
pub enum FcmError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("input error: {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
