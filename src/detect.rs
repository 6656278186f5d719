//! Blind mode detection and error correction
//!
//! The decoder does not know which mode protected a slot. Detection runs in
//! three stages over the first six codewords, then corrects the rest:
//!
//! 1. **Mode 1**: codeword 0 has zero syndromes and the primary hash checks.
//! 2. **Clean signaled mode**: the signaling pattern of one mode cancels the
//!    syndromes of all six signaled codewords exactly.
//! 3. **Risk ranked correction**: every mode whose locators stay within its
//!    capacity is scored by the risk of a false decode. Candidates are tried
//!    from lowest risk up until one corrects all six codewords.
//!
//! The remaining codewords are corrected with the detected mode. Failures in
//! the trailing partial concealment codewords mark the frame partial instead
//! of discarding it.

use log::{debug, trace};
use smallvec::SmallVec;

use crate::domain::{EpmrConfidence, FecMode, ReportedEpmr};
use crate::packing::{epmr_bitswap, epmr_from_codeword0};
use crate::reed_solomon::{
    apply_corrections, error_values, is_clean, signaling_syndromes, syndromes, toggle_signaling, ErrorLocator,
    ErrorPositions, Gf16, Syndromes, MAX_SYNDROMES,
};
use crate::checksum::check_primary;
use crate::risk::{decoding_risk, risk_threshold, SimpleFloat};
use crate::slot_plan::{codeword_length, codeword_ranges, partial_concealment_count, SIGNALED_CODEWORDS};

/// Risk exponent at or below which a codeword counts as confidently decoded
const CONFIDENT_EXPONENT: i16 = -16;

/// Risk exponent at or below which a codeword counts as plausibly decoded
const PLAUSIBLE_EXPONENT: i16 = -8;

/// Per-mode state while ranking detection candidates
#[derive(Debug, Clone, Default)]
struct Hypothesis {
    syndromes: [Syndromes; SIGNALED_CODEWORDS],
    locators: [ErrorLocator; SIGNALED_CODEWORDS],
    positions: [ErrorPositions; SIGNALED_CODEWORDS],
    risk: SimpleFloat,
    blacklisted: bool,
}

/// Reusable detection state, one per decoding thread
#[derive(Debug, Clone, Default)]
pub struct DetectionWorkspace {
    /// First two raw syndromes of codeword 0
    raw_leading: Syndromes,
    /// Indexed like [`FecMode::SIGNALED`]
    hypotheses: [Hypothesis; 3],
}

/// Result of mode detection and correction over a deinterleaved slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// All codewords corrected
    Decoded {
        mode: FecMode,
        bit_errors: u32,
        epmr: ReportedEpmr,
        n_pccw: usize,
    },
    /// Some partial concealment codewords could not be trusted
    Partial {
        mode: FecMode,
        bit_errors: u32,
        epmr: ReportedEpmr,
        n_pccw: usize,
    },
    /// No mode decodes the slot; the EPMR is a best-effort estimate
    Undecodable {
        bit_errors: Option<u32>,
        epmr: ReportedEpmr,
    },
}

/// Detect the mode of a deinterleaved slot and correct it in place.
///
/// On success the signaling patterns are removed and, for mode 1, the EPMR
/// swap is already undone. `trust` receives one flag per trailing codeword,
/// counted from the last codeword backwards, and must hold at least
/// `n_codewords - SIGNALED_CODEWORDS` entries.
pub fn detect_and_correct(
    symbols: &mut [Gf16],
    n_codewords: usize,
    combined_channel_coding: bool,
    trust: &mut [bool],
    work: &mut DetectionWorkspace,
) -> Detection {
    let nibbles = symbols.len();
    let slot_bytes = nibbles / 2;
    let len0 = codeword_length(n_codewords, nibbles, 0);

    // Stage 1: mode 1
    work.raw_leading = syndromes(&symbols[..len0], 2);
    if is_clean(&work.raw_leading, 2) {
        let epmr = epmr_from_codeword0(&symbols[..len0]);
        let hash_symbols = 2 * FecMode::Mode1.primary_hash_bytes(slot_bytes);

        epmr_bitswap(&mut symbols[2..], FecMode::Mode1, slot_bytes);
        let (hash, data) = symbols[2..].split_at(hash_symbols);
        if check_primary(data, epmr, hash) {
            debug!("Detected mode 1, EPMR {epmr}");
            return Detection::Decoded {
                mode: FecMode::Mode1,
                bit_errors: 0,
                epmr: epmr.into(),
                n_pccw: 0,
            };
        }
        epmr_bitswap(&mut symbols[2..], FecMode::Mode1, slot_bytes);
    }

    let ranges: SmallVec<[std::ops::Range<usize>; SIGNALED_CODEWORDS]> =
        codeword_ranges(n_codewords, nibbles).take(SIGNALED_CODEWORDS).collect();

    for (c, range) in ranges.iter().enumerate() {
        let raw = syndromes(&symbols[range.clone()], MAX_SYNDROMES);
        for (hypothesis, mode) in work.hypotheses.iter_mut().zip(FecMode::SIGNALED) {
            let offset = signaling_syndromes(mode);
            for (k, syndrome) in hypothesis.syndromes[c].iter_mut().enumerate() {
                *syndrome = raw[k] + offset[k];
            }
        }
    }

    // Stage 2: a signaled mode without errors in the first six codewords
    let clean = FecMode::SIGNALED.iter().zip(&work.hypotheses).find_map(|(&mode, hypothesis)| {
        let checks = mode.hamming_distance() - 1;
        hypothesis
            .syndromes
            .iter()
            .all(|s| is_clean(s, checks))
            .then_some(mode)
    });

    let (mode, mut bit_errors, epmr) = match clean {
        Some(mode) => {
            let epmr = epmr_from_codeword0(&symbols[..len0]);
            for range in &ranges {
                toggle_signaling(&mut symbols[range.clone()], mode);
            }
            debug!("Detected clean mode {mode}");
            (mode, 0, ReportedEpmr::from(epmr))
        }
        None => match rank_and_correct(symbols, &ranges, work) {
            Some(found) => found,
            None => {
                let epmr = estimate_epmr(&mut symbols[..len0], work);
                debug!("No mode decodes slot, estimated EPMR {epmr}");
                return Detection::Undecodable {
                    bit_errors: None,
                    epmr,
                };
            }
        },
    };

    // Remaining codewords
    let capacity = mode.correction_capacity();
    let n_pccw = partial_concealment_count(slot_bytes, mode, combined_channel_coding);
    let mut partial = false;

    for (c, range) in codeword_ranges(n_codewords, nibbles)
        .enumerate()
        .skip(SIGNALED_CODEWORDS)
    {
        let slot_trust = n_codewords - 1 - c;
        trust[slot_trust] = true;
        let concealable = c >= n_codewords - n_pccw;

        let max_position = range.len() - 1;
        let codeword = &mut symbols[range];
        let s = syndromes(codeword, 2 * capacity);
        let locator = ErrorLocator::from_syndromes(&s, capacity);

        if locator.degree() > capacity {
            if !concealable {
                debug!("Codeword {c} exceeds correction capacity of mode {mode}");
                return Detection::Undecodable {
                    bit_errors: None,
                    epmr,
                };
            }
            trace!("Concealment codeword {c} uncorrectable");
            partial = true;
            trust[slot_trust] = false;
            continue;
        }

        if locator.degree() > 0 {
            match locator.factorize(max_position) {
                Some(positions) => {
                    let values = error_values(&positions, &s);
                    bit_errors += apply_corrections(codeword, &positions, &values);
                }
                None if !concealable => {
                    debug!("Codeword {c} locator does not factor");
                    return Detection::Undecodable {
                        bit_errors: Some(bit_errors),
                        epmr,
                    };
                }
                None => {
                    trace!("Concealment codeword {c} locator does not factor");
                    partial = true;
                    trust[slot_trust] = false;
                    continue;
                }
            }
        }

        if decoding_risk(mode, locator.degree()).exponent() > CONFIDENT_EXPONENT {
            trust[slot_trust] = false;
        }
    }

    if partial {
        Detection::Partial {
            mode,
            bit_errors,
            epmr,
            n_pccw,
        }
    } else {
        Detection::Decoded {
            mode,
            bit_errors,
            epmr,
            n_pccw,
        }
    }
}

/// Stage 3: rank candidate modes by risk and correct with the first one that
/// decodes all signaled codewords.
fn rank_and_correct(
    symbols: &mut [Gf16],
    ranges: &[std::ops::Range<usize>],
    work: &mut DetectionWorkspace,
) -> Option<(FecMode, u32, ReportedEpmr)> {
    let threshold = risk_threshold(symbols.len());
    let mut candidates: SmallVec<[usize; 3]> = SmallVec::new();

    for (index, (hypothesis, mode)) in work.hypotheses.iter_mut().zip(FecMode::SIGNALED).enumerate() {
        let capacity = mode.correction_capacity();
        hypothesis.locators = Default::default();
        hypothesis.blacklisted = false;

        for (locator, s) in hypothesis.locators.iter_mut().zip(&hypothesis.syndromes) {
            *locator = ErrorLocator::from_syndromes(s, capacity);
            if locator.degree() > capacity {
                hypothesis.blacklisted = true;
                break;
            }
        }
        if hypothesis.blacklisted {
            continue;
        }

        hypothesis.risk = hypothesis
            .locators
            .iter()
            .fold(SimpleFloat::ONE, |acc, locator| acc * decoding_risk(mode, locator.degree()));
        trace!("Mode {mode} risk {} ({:e})", hypothesis.risk, hypothesis.risk.to_f64());

        if hypothesis.risk <= threshold {
            candidates.push(index);
        }
    }

    // Selection sort, ascending risk
    for i in 0..candidates.len() {
        let mut lowest = i;
        for j in i + 1..candidates.len() {
            if work.hypotheses[candidates[j]].risk < work.hypotheses[candidates[lowest]].risk {
                lowest = j;
            }
        }
        candidates.swap(i, lowest);
    }

    let chosen = candidates.into_iter().find(|&index| {
        let hypothesis = &mut work.hypotheses[index];
        ranges.iter().enumerate().all(|(c, range)| {
            let locator = hypothesis.locators[c];
            if locator.degree() == 0 {
                hypothesis.positions[c].clear();
                return true;
            }
            match locator.factorize(range.len() - 1) {
                Some(positions) => {
                    hypothesis.positions[c] = positions;
                    true
                }
                None => false,
            }
        })
    });

    let index = chosen?;
    let mode = FecMode::SIGNALED[index];
    let hypothesis = &work.hypotheses[index];

    let mut bit_errors = 0;
    for (c, range) in ranges.iter().enumerate() {
        let codeword = &mut symbols[range.clone()];
        if hypothesis.locators[c].degree() > 0 {
            let positions = &hypothesis.positions[c];
            let values = error_values(positions, &hypothesis.syndromes[c]);
            bit_errors += apply_corrections(codeword, positions, &values);
        }
        toggle_signaling(codeword, mode);
    }

    let exponent = decoding_risk(mode, hypothesis.locators[0].degree()).exponent();
    let confidence = confidence_for(exponent);

    let epmr = epmr_from_codeword0(&symbols[ranges[0].clone()]);
    debug!("Detected mode {mode} with {bit_errors} bit errors in signaled codewords");
    Some((mode, bit_errors, ReportedEpmr::new(epmr, confidence)))
}

/// Best-effort EPMR for an undecodable slot, from codeword 0 alone
fn estimate_epmr(codeword0: &mut [Gf16], work: &DetectionWorkspace) -> ReportedEpmr {
    let max_position = codeword0.len() - 1;
    let mut lowest: i16 = 0;

    if is_clean(&work.raw_leading, 2) || is_clean(&work.hypotheses[0].syndromes[0], 2) {
        lowest = decoding_risk(FecMode::Mode2, 0).exponent();
    }

    let mut candidates: SmallVec<[usize; 2]> = SmallVec::new();
    for index in [1usize, 2] {
        let mode = FecMode::SIGNALED[index];
        let degree = work.hypotheses[index].locators[0].degree();
        if degree <= mode.correction_capacity() && decoding_risk(mode, degree).exponent() <= PLAUSIBLE_EXPONENT {
            candidates.push(index);
        }
    }
    if candidates.len() == 2 {
        let risk = |index: usize| {
            let mode = FecMode::SIGNALED[index];
            decoding_risk(mode, work.hypotheses[index].locators[0].degree())
        };
        if risk(2) <= risk(1) {
            candidates.swap(0, 1);
        }
    }

    for index in candidates {
        let mode = FecMode::SIGNALED[index];
        let hypothesis = &work.hypotheses[index];
        let locator = hypothesis.locators[0];
        let exponent = decoding_risk(mode, locator.degree()).exponent();
        if exponent >= lowest {
            continue;
        }
        if let Some(positions) = locator.factorize(max_position) {
            let values = error_values(&positions, &hypothesis.syndromes[0]);
            apply_corrections(codeword0, &positions, &values);
            lowest = exponent;
            break;
        }
    }

    ReportedEpmr::new(epmr_from_codeword0(codeword0), confidence_for(lowest))
}

fn confidence_for(risk_exponent: i16) -> EpmrConfidence {
    if risk_exponent <= CONFIDENT_EXPONENT {
        EpmrConfidence::High
    } else if risk_exponent <= PLAUSIBLE_EXPONENT {
        EpmrConfidence::Medium
    } else {
        EpmrConfidence::Low
    }
}
