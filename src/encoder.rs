//! Slot encoder
//!
//! Protects a payload with the hashes of its mode, Reed-Solomon encodes it and
//! interleaves the codewords over the slot. The payload is read from the front
//! of the slot buffer and the encoded slot replaces it.

use log::{trace, warn};

use crate::domain::{Epmr, FecMode, SlotBytes};
use crate::error::{FecError, Result};
use crate::packing::{distribute_and_encode, interleave, preprocess};
use crate::reed_solomon::encode_codeword;
use crate::scratch::Scratch;
use crate::slot_plan::{codeword_count, partial_concealment_split, total_hash_bytes, SIGNALED_CODEWORDS};

/// Payload bytes `mode` fits in `slot_bytes` with `n_pccw` concealment codewords
pub fn payload_capacity(mode: FecMode, slot_bytes: usize, n_pccw: usize) -> usize {
    if mode == FecMode::Off {
        return slot_bytes;
    }

    let n_codewords = codeword_count(slot_bytes);
    let redundancy = match mode {
        FecMode::Mode1 => 1,
        _ => (usize::from(mode.number()) - 1) * n_codewords,
    };
    let pc_split = partial_concealment_split(mode, n_pccw, slot_bytes);
    slot_bytes.saturating_sub(redundancy + total_hash_bytes(slot_bytes, mode, pc_split))
}

/// Encode one slot in place.
///
/// `buffer.len()` is the slot size. Its first `payload_bytes` bytes hold the
/// payload, which must match [`payload_capacity`] exactly. `n_pccw` trailing
/// codewords carry the partial concealment region (0 disables it).
///
/// Mode [`FecMode::Off`] leaves the buffer untouched.
pub fn encode(
    mode: FecMode,
    epmr: Epmr,
    buffer: &mut [u8],
    payload_bytes: usize,
    n_pccw: usize,
    scratch: &mut Scratch,
) -> Result<()> {
    let slot = SlotBytes::new(buffer.len())?;
    let slot_bytes = slot.as_usize();

    let expected = payload_capacity(mode, slot_bytes, n_pccw);
    if payload_bytes != expected {
        warn!("Rejecting {payload_bytes} byte payload for mode {mode} in {slot_bytes} byte slot");
        return Err(FecError::PayloadSizeMismatch {
            mode: mode.number(),
            expected,
            actual: payload_bytes,
        });
    }

    if mode == FecMode::Off {
        return Ok(());
    }

    let n_codewords = codeword_count(slot_bytes);
    if n_pccw + SIGNALED_CODEWORDS > n_codewords {
        return Err(FecError::TooManyConcealmentCodewords { n_pccw, n_codewords });
    }

    let pc_split = partial_concealment_split(mode, n_pccw, slot_bytes);
    let symbols = &mut scratch.symbols[..slot.nibbles()];

    let data_offset = preprocess(mode, epmr, &buffer[..payload_bytes], symbols, pc_split);
    distribute_and_encode(symbols, mode, data_offset, |index, codeword, hamming_distance| {
        let signaling = (index < SIGNALED_CODEWORDS).then_some(mode);
        encode_codeword(codeword, hamming_distance, signaling);
    });

    interleave(symbols, n_codewords, buffer);
    trace!("Encoded {slot_bytes} byte slot, mode {mode}, EPMR {epmr}, {n_pccw} concealment codewords");
    Ok(())
}
