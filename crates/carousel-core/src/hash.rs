const MURMUR_MULTIPLIER: u32 = 0x5bd1_e995;

/// Deterministic 32-bit mixing hash (MurmurHash2 family).
///
/// The state is seeded with the input length, mixes 4-byte little-endian
/// blocks with the `0x5bd1e995` multiplier and a 24-bit shift, folds in up
/// to three tail bytes, and finishes with the 13/15-bit avalanche. The
/// constants are fixed so seeds reproduce byte-identically across
/// processes and reimplementations. Input is hashed as UTF-8 bytes.
pub fn hash32(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut state = bytes.len() as u32;

    let mut blocks = bytes.chunks_exact(4);
    for block in &mut blocks {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(MURMUR_MULTIPLIER);
        k ^= k >> 24;
        k = k.wrapping_mul(MURMUR_MULTIPLIER);
        state = state.wrapping_mul(MURMUR_MULTIPLIER) ^ k;
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        if tail.len() >= 3 {
            state ^= u32::from(tail[2]) << 16;
        }
        if tail.len() >= 2 {
            state ^= u32::from(tail[1]) << 8;
        }
        state ^= u32::from(tail[0]);
        state = state.wrapping_mul(MURMUR_MULTIPLIER);
    }

    state ^= state >> 13;
    state = state.wrapping_mul(MURMUR_MULTIPLIER);
    state ^= state >> 15;
    state
}

/// Normalizes `hash32` into `[0, 1]`. The divisor is `u32::MAX`, so the
/// maximal hash maps to exactly 1.0; every other input lands in `[0, 1)`.
pub fn hash01(text: &str) -> f64 {
    f64::from(hash32(text)) / f64::from(u32::MAX)
}
