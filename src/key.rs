//! Cache Key Module
//!
//! Derives the cache key for a (pattern, flag) pair.

use crate::flag::Flag;

const KEY_SEPARATOR: &str = ":";
const KEY_PATTERN: &str = "pattern:";
const KEY_FLAG: &str = "flag:";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// == Derive Key ==
/// Generates the cache key for a pattern and flag.
///
/// The canonical form `pattern:PATTERN:flag:FLAG` is hashed with 64-bit
/// FNV-1a and rendered as 16 lowercase hex digits. The output is stable
/// across versions.
pub fn derive_key(pattern: &str, flag: Flag) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for part in [KEY_PATTERN, pattern, KEY_SEPARATOR, KEY_FLAG, flag.name()] {
        hash = fnv1a(hash, part.as_bytes());
    }
    format!("{:016x}", hash)
}

fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
