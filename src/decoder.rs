//! Slot decoder
//!
//! Detects the mode of a received slot, corrects it and validates the hashes.
//! The recovered payload is written to the front of the slot buffer. Channel
//! damage never produces an error: the [`DecodeReport`] carries the validity
//! and everything a concealment stage needs.

use log::{debug, log_enabled, trace, Level};

use crate::detect::{detect_and_correct, Detection};
use crate::domain::{FecMode, ReportedEpmr, SlotBytes, UnreliableRange, Validity};
use crate::packing::{compact_data_word, deinterleave, postprocess, Postprocessed};
use crate::scratch::Scratch;
use crate::slot_plan::{codeword_count, data_size, partial_concealment_split, total_hash_bytes};

/// Caller-side facts about a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// The transport combines channel coding over several slots; partial
    /// concealment and the secondary hash are not used.
    pub combined_channel_coding: bool,
    /// The transport already flagged the slot as lost
    pub bad_frame: bool,
}

/// Per-slot decoding outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeReport {
    pub validity: Validity,
    /// Corrected bit errors; `None` when the count is unknown
    pub bit_errors: Option<u32>,
    /// Payload bytes written to the front of the buffer (0 when unrecoverable)
    pub payload_len: usize,
    /// `None` only when the slot was never examined
    pub epmr: Option<ReportedEpmr>,
    /// Detected mode of a usable slot
    pub mode: Option<FecMode>,
    /// Partial concealment codewords in effect
    pub n_pccw: usize,
    /// Payload symbols in the partial concealment region
    pub pc_split: usize,
}

impl DecodeReport {
    fn unrecoverable(bit_errors: Option<u32>, epmr: Option<ReportedEpmr>) -> Self {
        DecodeReport {
            validity: Validity::Unrecoverable,
            bit_errors,
            payload_len: 0,
            epmr,
            mode: None,
            n_pccw: 0,
            pc_split: 0,
        }
    }

    /// Payload (prefix of the decoded buffer) as far as it can be used
    pub fn payload<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[..self.payload_len.min(buffer.len())]
    }
}

/// Decode one slot in place.
///
/// Slots outside the supported size range and slots flagged as bad are
/// reported unrecoverable without being examined.
pub fn decode(buffer: &mut [u8], options: DecodeOptions, scratch: &mut Scratch) -> DecodeReport {
    if options.bad_frame {
        trace!("Slot flagged bad by transport");
        return DecodeReport::unrecoverable(None, None);
    }

    let slot = match SlotBytes::new(buffer.len()) {
        Ok(slot) => slot,
        Err(e) => {
            debug!("{e}");
            return DecodeReport::unrecoverable(None, None);
        }
    };
    let slot_bytes = slot.as_usize();
    let n_codewords = codeword_count(slot_bytes);

    if log_enabled!(Level::Trace) {
        trace!("Decoding slot {}", hex::encode(&*buffer));
    }

    let symbols = &mut scratch.symbols[..slot.nibbles()];
    deinterleave(buffer, n_codewords, symbols);

    let detection = detect_and_correct(
        symbols,
        n_codewords,
        options.combined_channel_coding,
        &mut scratch.trust,
        &mut scratch.detection,
    );

    let (mode, bit_errors, mut epmr, n_pccw, mut partial) = match detection {
        Detection::Decoded {
            mode,
            bit_errors,
            epmr,
            n_pccw,
        } => (mode, bit_errors, epmr, n_pccw, false),
        Detection::Partial {
            mode,
            bit_errors,
            epmr,
            n_pccw,
        } => (mode, bit_errors, epmr, n_pccw, true),
        Detection::Undecodable { bit_errors, epmr } => {
            return DecodeReport::unrecoverable(bit_errors, Some(epmr));
        }
    };

    // Small slots have little redundancy left to catch false corrections
    if slot_bytes == SlotBytes::MIN && bit_errors > mode.small_slot_bit_error_limit() {
        debug!("Rejecting {bit_errors} corrected bit errors in mode {mode} minimum-size slot");
        return DecodeReport::unrecoverable(Some(bit_errors), Some(epmr));
    }

    let payload_len = data_size(mode, options.combined_channel_coding, slot_bytes);
    let pc_split = partial_concealment_split(mode, n_pccw, slot_bytes);

    let word_len = compact_data_word(symbols, mode, n_codewords);
    debug_assert_eq!(word_len, 2 * (payload_len + total_hash_bytes(slot_bytes, mode, pc_split)));

    match postprocess(
        mode,
        &mut symbols[..word_len],
        &mut buffer[..payload_len],
        slot_bytes,
        pc_split,
        !partial,
    ) {
        Postprocessed::PrimaryMismatch => {
            debug!("Primary hash mismatch after mode {mode} correction");
            return DecodeReport::unrecoverable(Some(bit_errors), Some(epmr));
        }
        Postprocessed::Accepted {
            epmr: carried,
            secondary_intact,
        } => {
            if let Some(carried) = carried {
                epmr = carried.into();
            }
            partial |= !secondary_intact;
        }
    }

    let validity = if partial {
        Validity::Partial(unreliable_range(&mut scratch.trust, n_pccw, mode, slot_bytes))
    } else {
        Validity::Valid
    };

    debug!(
        "Decoded {slot_bytes} byte slot: mode {mode}, {bit_errors} bit errors, validity {}",
        validity.code()
    );

    DecodeReport {
        validity,
        bit_errors: Some(bit_errors),
        payload_len,
        epmr: Some(epmr),
        mode: Some(mode),
        n_pccw,
        pc_split,
    }
}

/// Payload bits covered by untrusted concealment codewords.
///
/// `trust[i]` describes the i-th codeword from the end of the slot. A payload
/// byte's position grows with the index, so the last codewords carry the
/// start of the payload.
fn unreliable_range(trust: &mut [bool], n_pccw: usize, mode: FecMode, slot_bytes: usize) -> UnreliableRange {
    // Sentinel: a secondary hash failure with every codeword trusted covers the whole region
    trust[n_pccw] = false;

    let first_untrusted = trust[..=n_pccw].iter().position(|t| !t).unwrap_or(n_pccw);
    let first_bit = if first_untrusted == n_pccw {
        0
    } else {
        4 * partial_concealment_split(mode, first_untrusted, slot_bytes)
    };

    let covered = trust[..n_pccw]
        .iter()
        .rposition(|t| !t)
        .map_or(n_pccw, |i| i + 1);
    let last_bit = (4 * partial_concealment_split(mode, covered, slot_bytes)).saturating_sub(1);

    UnreliableRange { first_bit, last_bit }
}
