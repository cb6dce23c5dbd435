// crates/fcmtune-core/src/sequence.rs

use std::path::Path;

use crate::error::{FcmError, Result};

/// Read a sequence file as raw bytes. Any failure is an input error.
pub fn load_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| FcmError::Input {
        path: path.display().to_string(),
        source,
    })
}

/// Symbols of a sequence file: the characters of the text with surrounding
/// whitespace removed. Input that is not UTF-8 maps each byte to one symbol.
pub fn symbols(bytes: &[u8]) -> Vec<char> {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim().chars().collect(),
        Err(_) => bytes.trim_ascii().iter().map(|&b| b as char).collect(),
    }
}

/// Number of symbols before trimming, the denominator used for
/// compressed-size bits per symbol.
pub fn raw_symbol_count(bytes: &[u8]) -> usize {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.chars().count(),
        Err(_) => bytes.len(),
    }
}
