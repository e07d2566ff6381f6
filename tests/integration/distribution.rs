//! Integration test: slot and node distribution.
//!
//! Slot hashing must spread objects evenly over the slot range for both
//! power-of-two and general slot counts, without skew toward low slots.

use ahrw_integration_tests::{chi_square, chi_square_bound, histogram, init_tracing, table};
use ahrw_placement::slot_for_bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64;

const SAMPLES: usize = 400_000;

fn sample_slots(nslots: u64, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..SAMPLES)
        .map(|_| {
            let key: u64 = rng.random();
            slot_for_bytes(nslots, &key.to_le_bytes())
        })
        .collect()
}

fn assert_uniform(nslots: u64, seed: u64) {
    let slots = sample_slots(nslots, seed);
    assert!(slots.iter().all(|&s| s < nslots));

    let counts = histogram(slots, nslots);
    let stat = chi_square(&counts);
    let bound = chi_square_bound(nslots as usize - 1);
    assert!(
        stat < bound,
        "slots not uniform for {nslots}: chi2 {stat:.1} >= {bound:.1}"
    );
}

#[test]
fn test_uniform_power_of_two_slots() {
    init_tracing();
    assert_uniform(16_384, 1);
}

#[test]
fn test_uniform_general_slots() {
    init_tracing();
    assert_uniform(10_000, 2);
}

#[test]
fn test_uniform_small_odd_slots() {
    assert_uniform(7, 3);
}

#[test]
fn test_no_skew_toward_low_slots() {
    for nslots in [10_000u64, 16_384] {
        let slots = sample_slots(nslots, 4);
        let low = slots.iter().filter(|&&s| s < nslots / 2).count();
        let ratio = low as f64 / SAMPLES as f64;
        assert!(
            (0.49..=0.51).contains(&ratio),
            "low half got {ratio:.4} of objects for {nslots} slots"
        );
    }
}

/// With n = 2/3 of the hash space, naive `hash % n` maps twice as much of
/// the space onto the lower half of the slots. Rejection removes that.
#[test]
fn test_rejection_removes_modulo_bias() {
    let nslots: u64 = 0xAAAA_AAAA_AAAA_AAAA;
    let half = nslots / 2;
    let mut rng = StdRng::seed_from_u64(5);

    let mut unbiased_low = 0usize;
    let mut naive_low = 0usize;
    let total = 100_000;
    for _ in 0..total {
        let key: u64 = rng.random();
        let bytes = key.to_le_bytes();
        if slot_for_bytes(nslots, &bytes) < half {
            unbiased_low += 1;
        }

        let mut input = vec![0u8];
        input.extend_from_slice(&bytes);
        if xxh3_64(&input) % nslots < half {
            naive_low += 1;
        }
    }

    let unbiased = unbiased_low as f64 / total as f64;
    let naive = naive_low as f64 / total as f64;
    assert!(
        (0.48..=0.52).contains(&unbiased),
        "rejection sampling still skewed: {unbiased:.4}"
    );
    assert!(
        (0.64..=0.69).contains(&naive),
        "naive modulo expected to favour low slots: {naive:.4}"
    );
}

#[test]
fn test_slots_spread_evenly_over_nodes() {
    let h = table(16_384, 7);
    let mut per_node = [0u64; 7];
    for slot in 0..h.nslots() {
        let name = h.node_for_slot(slot).unwrap().name();
        let idx: usize = name["server".len()..].parse().unwrap();
        per_node[idx - 1] += 1;
    }
    assert_eq!(h.resolved_slots(), 16_384);

    let expected = 16_384.0 / 7.0;
    for (i, &count) in per_node.iter().enumerate() {
        let share = count as f64 / expected;
        assert!(
            (0.85..=1.15).contains(&share),
            "server{} owns {count} slots, expected about {expected:.0}",
            i + 1
        );
    }
}
