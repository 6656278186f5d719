//! Slot sizing: how a slot of a given size is divided between payload,
//! hashes and redundancy for each mode.
//!
//! A slot of `s` bytes holds `2s` symbols spread round-robin over
//! `ceil(2s / 15)` codewords. Lower-indexed codewords get the extra symbols,
//! so lengths never increase with the index.

use std::ops::Range;

use crate::domain::{FecMode, SlotBytes};
use crate::fixed::{l_mult, l_sub, round_fx};
use crate::reed_solomon::MAX_CODEWORD_LEN;

/// Codewords carrying a signaling pattern; all of them must stay fully protected
pub const SIGNALED_CODEWORDS: usize = 6;

/// Smallest slot that supports partial concealment
const PARTIAL_CONCEALMENT_MIN_SLOT: usize = 80;

/// Number of interleaved codewords in a slot
pub fn codeword_count(slot_bytes: usize) -> usize {
    (2 * slot_bytes).div_ceil(MAX_CODEWORD_LEN)
}

/// Length of codeword `index` when `slot_nibbles` symbols are spread over `n_codewords`
pub fn codeword_length(n_codewords: usize, slot_nibbles: usize, index: usize) -> usize {
    (slot_nibbles - index - 1) / n_codewords + 1
}

/// Symbol ranges of consecutive codewords in a deinterleaved buffer
pub fn codeword_ranges(n_codewords: usize, slot_nibbles: usize) -> impl Iterator<Item = Range<usize>> {
    (0..n_codewords).scan(0, move |start, index| {
        let len = codeword_length(n_codewords, slot_nibbles, index);
        let range = *start..*start + len;
        *start += len;
        Some(range)
    })
}

/// Payload bytes a slot carries in `mode`
pub fn data_size(mode: FecMode, combined_channel_coding: bool, slot_bytes: usize) -> usize {
    if mode == FecMode::Off {
        return slot_bytes;
    }

    let n_codewords = codeword_count(slot_bytes);
    let redundancy = match mode {
        FecMode::Mode1 => 1,
        _ => (usize::from(mode.number()) - 1) * n_codewords,
    };

    let mut hashes = mode.primary_hash_bytes(slot_bytes);
    if !combined_channel_coding && mode > FecMode::Mode2 && slot_bytes >= PARTIAL_CONCEALMENT_MIN_SLOT {
        hashes += mode.secondary_hash_bytes();
    }

    slot_bytes.saturating_sub(redundancy + hashes)
}

/// Number of trailing codewords given best-effort (partial concealment) treatment
pub fn partial_concealment_count(slot_bytes: usize, mode: FecMode, combined_channel_coding: bool) -> usize {
    if combined_channel_coding || slot_bytes < PARTIAL_CONCEALMENT_MIN_SLOT {
        return 0;
    }

    let (slope, offset) = match mode {
        FecMode::Mode3 => (2636, 117_377),
        FecMode::Mode4 => (2178, 129_115),
        _ => return 0,
    };

    let slot = i16::try_from(slot_bytes).unwrap_or(i16::MAX);
    let scaled = l_sub(l_mult(slope, slot).value, offset).value;
    usize::try_from(round_fx(scaled).value).unwrap_or(0)
}

/// Number of payload symbols covered by the last `n_pccw` codewords
pub fn partial_concealment_split(mode: FecMode, n_pccw: usize, slot_bytes: usize) -> usize {
    if mode <= FecMode::Mode1 || slot_bytes < PARTIAL_CONCEALMENT_MIN_SLOT {
        return 0;
    }

    let n_codewords = codeword_count(slot_bytes);
    let n_pccw = n_pccw.min(n_codewords);
    let symbols: usize = (0..n_pccw)
        .map(|i| codeword_length(n_codewords, 2 * slot_bytes, n_codewords - 1 - i))
        .sum();

    symbols.saturating_sub(2 * n_pccw * (usize::from(mode.number()) - 1))
}

/// Total hash bytes in a frame given the active split
pub fn total_hash_bytes(slot_bytes: usize, mode: FecMode, pc_split: usize) -> usize {
    let secondary = if pc_split > 0 {
        mode.secondary_hash_bytes()
    } else {
        0
    };
    mode.primary_hash_bytes(slot_bytes) + secondary
}

/// Redundancy symbols per slot
pub fn redundancy_nibbles(mode: FecMode, slot_bytes: usize) -> usize {
    let n_codewords = codeword_count(slot_bytes);
    (mode.first_hamming_distance() - 1) + (n_codewords - 1) * (mode.hamming_distance() - 1)
}

/// Complete layout of one slot for a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlan {
    pub mode: FecMode,
    pub slot_bytes: SlotBytes,
    pub combined_channel_coding: bool,
    pub n_codewords: usize,
    pub payload_bytes: usize,
    pub n_pccw: usize,
    pub pc_split: usize,
    pub hash_bytes: usize,
}

impl SlotPlan {
    pub fn new(mode: FecMode, slot_bytes: SlotBytes, combined_channel_coding: bool) -> Self {
        let bytes = slot_bytes.as_usize();
        let n_pccw = partial_concealment_count(bytes, mode, combined_channel_coding);
        let pc_split = partial_concealment_split(mode, n_pccw, bytes);
        SlotPlan {
            mode,
            slot_bytes,
            combined_channel_coding,
            n_codewords: codeword_count(bytes),
            payload_bytes: data_size(mode, combined_channel_coding, bytes),
            n_pccw,
            pc_split,
            hash_bytes: if mode == FecMode::Off {
                0
            } else {
                total_hash_bytes(bytes, mode, pc_split)
            },
        }
    }

    /// Codeword lengths, longest first
    pub fn codeword_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        let nibbles = self.slot_bytes.nibbles();
        (0..self.n_codewords).map(move |i| codeword_length(self.n_codewords, nibbles, i))
    }

    /// Redundancy symbols added by the Reed-Solomon layer
    pub fn redundancy_nibbles(&self) -> usize {
        redundancy_nibbles(self.mode, self.slot_bytes.as_usize())
    }
}
