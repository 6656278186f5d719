//! Property-based tests for GF(16) arithmetic and codeword correction

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rs16fec::reed_solomon::{
    apply_corrections, encode_codeword, error_values, syndromes, ErrorLocator, Gf16, MAX_SYNDROMES,
};

proptest! {
    /// Property: multiplication is commutative and associative
    #[test]
    fn prop_gf16_multiplication_laws(a in 0u8..16, b in 0u8..16, c in 0u8..16) {
        let (a, b, c) = (Gf16::new(a), Gf16::new(b), Gf16::new(c));
        prop_assert_eq!(a * b, b * a);
        prop_assert_eq!((a * b) * c, a * (b * c));
    }

    /// Property: multiplication distributes over addition
    #[test]
    fn prop_gf16_distributive(a in 0u8..16, b in 0u8..16, c in 0u8..16) {
        let (a, b, c) = (Gf16::new(a), Gf16::new(b), Gf16::new(c));
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }

    /// Property: every non-zero element has a multiplicative inverse
    #[test]
    fn prop_gf16_inverse(a in 1u8..16) {
        let a = Gf16::new(a);
        prop_assert_eq!(a * a.inverse(), Gf16::ONE);
    }

    /// Property: any pattern of up to t symbol errors is located and corrected
    #[test]
    fn prop_codeword_corrects_within_capacity(
        len in 13usize..=15,
        capacity in 1usize..=3,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let hamming_distance = 2 * capacity + 1;

        let mut codeword: Vec<Gf16> = (0..len).map(|_| Gf16::new(rng.random_range(0..16))).collect();
        encode_codeword(&mut codeword, hamming_distance, None);
        prop_assert!(syndromes(&codeword, MAX_SYNDROMES)[..2 * capacity].iter().all(|s| s.is_zero()));

        let errors = rng.random_range(1..=capacity);
        let mut positions: Vec<usize> = (0..len).collect();
        positions.shuffle(&mut rng);

        let mut received = codeword.clone();
        let mut flipped = 0;
        for &p in &positions[..errors] {
            let error = Gf16::new(rng.random_range(1..16));
            received[p] += error;
            flipped += error.bit_weight();
        }

        let s = syndromes(&received, 2 * capacity);
        let locator = ErrorLocator::from_syndromes(&s, capacity);
        prop_assert_eq!(locator.degree(), errors);

        let located = locator.factorize(len - 1);
        prop_assert!(located.is_some());
        let located = located.unwrap_or_default();
        let values = error_values(&located, &s);
        prop_assert_eq!(apply_corrections(&mut received, &located, &values), flipped);
        prop_assert_eq!(received, codeword);
    }
}
