// crates/fcmtune-core/src/fingerprint.rs
//
// Identifiers printed in tune/baseline reports so two runs over the same
// input can be matched up without diffing the inputs themselves.

pub fn crc32(bytes: &[u8]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(bytes);
    h.finalize()
}

pub fn blake3_16(bytes: &[u8]) -> [u8; 16] {
    let hash = blake3::hash(bytes);
    let mut out = [0u8; 16];
    out.copy_from_slice(&hash.as_bytes()[0..16]);
    out
}

/// 32 lowercase hex chars of the blake3-128 prefix.
pub fn sequence_id_hex(bytes: &[u8]) -> String {
    let id = blake3_16(bytes);
    let mut s = String::with_capacity(32);
    for b in id {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
