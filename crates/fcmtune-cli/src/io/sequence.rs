// crates/fcmtune-cli/src/io/sequence.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use fcmtune_core::{fingerprint, sequence};

/// A sequence file read once up front, so a missing input fails before any
/// scorer is started.
pub struct SequenceFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl SequenceFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = sequence::load_bytes(path).with_context(|| format!("read sequence {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn symbols(&self) -> Vec<char> {
        sequence::symbols(&self.bytes)
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn sequence_id(&self) -> String {
        fingerprint::sequence_id_hex(&self.bytes)
    }

    pub fn crc32(&self) -> u32 {
        fingerprint::crc32(&self.bytes)
    }
}
