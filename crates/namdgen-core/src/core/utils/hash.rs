//! Stable string hashing for reproducible seed derivation.
//!
//! Seeds must come out identical on every run, on every platform and across releases, so they
//! are derived from the FNV-1a 64-bit hash of the raw UTF-8 bytes of a name rather than from
//! `std::hash`, whose output is randomized per process.
//!
//! FNV-1a is not cryptographically secure. It is only used for deterministic derivations.

/// 64-bit FNV-1a offset basis.
pub const FNV1A_OFFSET_BASIS_64: u64 = 0xcbf2_9ce4_8422_2325;
/// 64-bit FNV-1a prime.
pub const FNV1A_PRIME_64: u64 = 0x0000_0100_0000_01b3;

/// Hash a byte slice with FNV-1a 64-bit.
#[inline]
pub const fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV1A_OFFSET_BASIS_64;
    let mut i = 0usize;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV1A_PRIME_64);
        i += 1;
    }
    hash
}

/// Stable hash of a UTF-8 name.
#[inline]
pub const fn stable_hash(name: &str) -> u64 {
    fnv1a64(name.as_bytes())
}
