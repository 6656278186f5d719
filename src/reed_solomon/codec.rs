//! Codeword-level RS16 encoding and syndrome evaluation
//!
//! A codeword is stored lowest power first: symbols `0..hd-1` hold the
//! redundancy and the data symbols sit above them. Encoding divides the shifted
//! data polynomial by the generator polynomial for the requested Hamming
//! distance and stores the remainder in the redundancy area.
//!
//! The first six codewords of a slot additionally carry a mode-specific
//! signaling pattern. Adding the pattern moves the codeword to a coset of the
//! code, which lets the decoder recognise the mode from syndromes alone.

use super::galois::{symbols, Gf16};
use crate::domain::FecMode;

/// Longest codeword over GF(16)
pub const MAX_CODEWORD_LEN: usize = 15;

/// Number of syndromes needed for the strongest mode (Hamming distance 7)
pub const MAX_SYNDROMES: usize = 6;

/// Signaling patterns cover symbols `0..SIGNALING_SPAN`
pub const SIGNALING_SPAN: usize = 13;

/// Syndromes `S_0..S_5`; entries past the requested count are zero
pub type Syndromes = [Gf16; MAX_SYNDROMES];

// Generator polynomials, lowest coefficient first, monic term implied
const GENERATOR_HD3: [Gf16; 2] = symbols([8, 6]);
const GENERATOR_HD5: [Gf16; 4] = symbols([7, 8, 12, 13]);
const GENERATOR_HD7: [Gf16; 6] = symbols([12, 10, 12, 3, 9, 7]);

#[rustfmt::skip]
const SIGNALING_PATTERNS: [[Gf16; SIGNALING_SPAN]; 3] = [
    symbols([7, 15, 5, 6, 14, 9, 1, 3, 12, 10, 13, 3, 2]),
    symbols([7, 11, 14, 1, 2, 3, 12, 11, 6, 15, 7, 6, 12]),
    symbols([6, 15, 12, 2, 9, 15, 2, 8, 12, 3, 10, 5, 4]),
];

/// Syndromes of the signaling patterns at α¹..α⁶
#[rustfmt::skip]
const SIGNALING_SYNDROMES: [Syndromes; 3] = [
    symbols([0, 4, 5, 11, 5, 8]),
    symbols([0, 5, 9, 0, 1, 7]),
    symbols([0, 12, 5, 12, 9, 8]),
];

/// Generator polynomial for a Hamming distance; `None` when no redundancy is added
pub fn generator_polynomial(hamming_distance: usize) -> Option<&'static [Gf16]> {
    match hamming_distance {
        3 => Some(&GENERATOR_HD3),
        5 => Some(&GENERATOR_HD5),
        7 => Some(&GENERATOR_HD7),
        _ => None,
    }
}

/// Signaling pattern of a mode; modes 0 and 1 do not signal
pub fn signaling_pattern(mode: FecMode) -> Option<&'static [Gf16; SIGNALING_SPAN]> {
    signaled_index(mode).map(|i| &SIGNALING_PATTERNS[i])
}

/// Syndrome offset the signaling pattern of `mode` adds to a codeword
pub fn signaling_syndromes(mode: FecMode) -> Syndromes {
    signaled_index(mode).map_or([Gf16::ZERO; MAX_SYNDROMES], |i| SIGNALING_SYNDROMES[i])
}

fn signaled_index(mode: FecMode) -> Option<usize> {
    match mode {
        FecMode::Mode2 => Some(0),
        FecMode::Mode3 => Some(1),
        FecMode::Mode4 => Some(2),
        FecMode::Off | FecMode::Mode1 => None,
    }
}

/// Toggle the signaling pattern of `mode` on a codeword (applying it twice is a no-op)
pub fn toggle_signaling(codeword: &mut [Gf16], mode: FecMode) {
    if let Some(pattern) = signaling_pattern(mode) {
        debug_assert!(codeword.len() >= SIGNALING_SPAN);
        for (symbol, &sig) in codeword.iter_mut().zip(pattern.iter()) {
            *symbol += sig;
        }
    }
}

/// Encode one codeword in place.
///
/// Data symbols must already occupy `hamming_distance - 1..len`; the
/// redundancy area is overwritten. Hamming distance 1 leaves the codeword
/// untouched, signaling included.
pub fn encode_codeword(codeword: &mut [Gf16], hamming_distance: usize, signaling: Option<FecMode>) {
    let Some(generator) = generator_polynomial(hamming_distance) else {
        return;
    };

    let degree = generator.len();
    let len = codeword.len();
    debug_assert!(len > degree, "codeword shorter than generator polynomial");

    codeword[..degree].fill(Gf16::ZERO);

    // Synthetic division, shift register holds the running remainder
    let mut shift = [Gf16::ZERO; MAX_SYNDROMES + 1];
    shift[1..=degree].copy_from_slice(&codeword[len - degree..]);

    for i in (0..len - degree).rev() {
        shift[0] = codeword[i];
        let lead = shift[degree];
        for j in (0..degree).rev() {
            shift[j + 1] = shift[j] + generator[j] * lead;
        }
    }

    codeword[..degree].copy_from_slice(&shift[1..=degree]);

    if let Some(mode) = signaling {
        toggle_signaling(codeword, mode);
    }
}

/// Evaluate `count` syndromes `S_k = Σ c_i·α^{(k+1)i}` for k in `0..count`
pub fn syndromes(codeword: &[Gf16], count: usize) -> Syndromes {
    debug_assert!(count <= MAX_SYNDROMES);
    let mut out = [Gf16::ZERO; MAX_SYNDROMES];
    for (k, syndrome) in out.iter_mut().take(count).enumerate() {
        let point = Gf16::exp(k + 1);
        // Horner from the highest power down
        *syndrome = codeword
            .iter()
            .rev()
            .fold(Gf16::ZERO, |acc, &c| acc * point + c);
    }
    out
}

/// True when the first `count` syndromes vanish
#[inline]
pub fn is_clean(syndromes: &Syndromes, count: usize) -> bool {
    syndromes[..count].iter().all(|s| s.is_zero())
}
