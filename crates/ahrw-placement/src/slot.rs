//! Unbiased mapping of object bytes onto slots.

use xxhash_rust::xxh3::Xxh3;

/// Uniformly map bytes identifying an object to a slot in `0..nslots`.
///
/// The hash input is a one-byte prefix followed by `bytes`. For a
/// power-of-two `nslots` the hash is masked. Otherwise hashes falling into
/// the biased tail `[2^64 - 2^64 % nslots, 2^64)` are rejected and the
/// prefix is bumped until an accepted value is found, which keeps every
/// slot exactly equally likely.
///
/// # Panics
///
/// Panics if `nslots` is zero.
pub fn slot_for_bytes(nslots: u64, bytes: &[u8]) -> u64 {
    assert!(nslots != 0, "number of slots can't be zero");

    let mut hasher = Xxh3::new();
    let mut prefix = 0u8;

    if nslots.is_power_of_two() {
        hasher.update(&[prefix]);
        hasher.update(bytes);
        return hasher.digest() & (nslots - 1);
    }

    let limit = unbiased_limit(nslots);
    loop {
        hasher.update(&[prefix]);
        hasher.update(bytes);
        let hv = hasher.digest();
        if hv < limit {
            return hv % nslots;
        }
        prefix = prefix.wrapping_add(1);
        hasher.reset();
    }
}

/// Largest multiple of `nslots` not exceeding 2^64, wrapped to `u64`.
///
/// Only meaningful for non-power-of-two `nslots`, where it never wraps.
fn unbiased_limit(nslots: u64) -> u64 {
    // (2^64 - n) % n == 2^64 % n
    0u64.wrapping_sub(0u64.wrapping_sub(nslots) % nslots)
}
