//! Bitstream (re)packing between payload bytes, symbol buffers and slots
//!
//! ## Layout of the symbol buffer
//!
//! The encoder builds a data word of `2 × slot_bytes` symbols:
//!
//! ```text
//! [ redundancy gap | primary hash | secondary hash | payload (byte order reversed) ]
//! ```
//!
//! The data word is then split over the codewords (each takes its share above
//! its redundancy area), the codewords are encoded, and finally the symbols
//! are interleaved round-robin into the slot so that a burst of bit errors is
//! spread over many codewords.
//!
//! The two EPMR bits live in the top of the primary hash. Before encoding they
//! are swapped into the last symbol of codeword 0, which is where a decoder
//! looks for them when the frame cannot be decoded.

use crate::checksum::{check_primary, check_secondary, write_primary, write_secondary};
use crate::domain::{Epmr, FecMode};
use crate::reed_solomon::Gf16;
use crate::slot_plan::{codeword_count, codeword_length, codeword_ranges};

// ============================================================================
// Interleaving
// ============================================================================

/// Pack codeword symbols into a slot.
///
/// Symbol `j` of codeword `k` lands at nibble `(2s - 1) - (j·n + k)`; even
/// nibble offsets are the low half of a byte.
pub fn interleave(symbols: &[Gf16], n_codewords: usize, out: &mut [u8]) {
    let nibbles = symbols.len();
    out[..nibbles / 2].fill(0);

    let mut next = symbols.iter();
    for k in 0..n_codewords {
        for j in 0..codeword_length(n_codewords, nibbles, k) {
            let offset = nibbles - 1 - (j * n_codewords + k);
            if let Some(symbol) = next.next() {
                out[offset >> 1] |= symbol.value() << ((offset & 1) * 4);
            }
        }
    }
}

/// Unpack a slot into consecutive codewords (inverse of [`interleave`])
pub fn deinterleave(input: &[u8], n_codewords: usize, symbols: &mut [Gf16]) {
    let nibbles = symbols.len();

    let mut next = symbols.iter_mut();
    for k in 0..n_codewords {
        for j in 0..codeword_length(n_codewords, nibbles, k) {
            let offset = nibbles - 1 - (j * n_codewords + k);
            if let Some(symbol) = next.next() {
                *symbol = Gf16::new(input[offset >> 1] >> ((offset & 1) * 4));
            }
        }
    }
}

// ============================================================================
// EPMR relocation
// ============================================================================

/// Swap the EPMR bits (bits 2..3 of the top primary hash symbol) with bits
/// 0..1 of the data symbol that ends up last in codeword 0. Self-inverse.
pub fn epmr_bitswap(data_word: &mut [Gf16], mode: FecMode, slot_bytes: usize) {
    let n_codewords = codeword_count(slot_bytes);
    let last_of_first = codeword_length(n_codewords, 2 * slot_bytes, 0) - 1;

    let hash_top = 2 * mode.primary_hash_bytes(slot_bytes) - 1;
    let carrier = last_of_first - (mode.first_hamming_distance() - 1);

    let hash_symbol = data_word[hash_top].value();
    let carrier_symbol = data_word[carrier].value();

    data_word[hash_top] = Gf16::new((hash_symbol & 0x3) | ((carrier_symbol & 0x3) << 2));
    data_word[carrier] = Gf16::new((carrier_symbol & 0xC) | ((hash_symbol >> 2) & 0x3));
}

/// EPMR read from the top primary hash symbol of a data word (after unswapping)
pub fn epmr_from_data_word(data_word: &[Gf16], mode: FecMode, slot_bytes: usize) -> Epmr {
    let hash_top = 2 * mode.primary_hash_bytes(slot_bytes) - 1;
    Epmr::from_bits(data_word[hash_top].value() >> 2)
}

/// EPMR read from the last symbol of codeword 0 (before unswapping)
pub fn epmr_from_codeword0(codeword0: &[Gf16]) -> Epmr {
    codeword0
        .last()
        .map_or(Epmr::default(), |symbol| Epmr::from_bits(symbol.value()))
}

// ============================================================================
// Encoder side
// ============================================================================

/// Place the payload and its hashes into the symbol buffer.
///
/// Returns the offset where the data word starts; everything below it is the
/// room left for redundancy symbols.
pub fn preprocess(mode: FecMode, epmr: Epmr, payload: &[u8], symbols: &mut [Gf16], pc_split: usize) -> usize {
    let nibbles = symbols.len();
    let slot_bytes = nibbles / 2;
    let data_bytes = payload.len();
    let data_offset = nibbles - 2 * data_bytes;

    // Reverse byte order, high nibble below low nibble
    for (i, &byte) in payload.iter().enumerate() {
        symbols[nibbles - 1 - 2 * i] = Gf16::new(byte);
        symbols[nibbles - 2 - 2 * i] = Gf16::new(byte >> 4);
    }

    let n_primary = mode.primary_hash_bytes(slot_bytes);
    let n_secondary = if pc_split > 0 && mode > FecMode::Mode1 {
        mode.secondary_hash_bytes()
    } else {
        0
    };

    let (head, data) = symbols.split_at_mut(data_offset);
    let protected = 2 * data_bytes - pc_split;

    if n_secondary > 0 {
        write_secondary(
            &data[protected..],
            &mut head[data_offset - 2 * n_secondary..],
        );
    }

    let hash_start = data_offset - 2 * (n_primary + n_secondary);
    write_primary(
        &data[..protected],
        epmr,
        &mut head[hash_start..hash_start + 2 * n_primary],
    );

    epmr_bitswap(&mut symbols[hash_start..], mode, slot_bytes);
    hash_start
}

/// Move the data word into the data area of each codeword, encoding every
/// codeword as soon as it is filled. Reads never fall behind writes, so the
/// data word can share the buffer with the codewords.
pub fn distribute_and_encode<F>(symbols: &mut [Gf16], mode: FecMode, mut data_offset: usize, mut encode: F)
where
    F: FnMut(usize, &mut [Gf16], usize),
{
    let nibbles = symbols.len();
    let n_codewords = codeword_count(nibbles / 2);

    for (k, range) in codeword_ranges(n_codewords, nibbles).enumerate() {
        let hamming_distance = if k == 0 {
            mode.first_hamming_distance()
        } else {
            mode.hamming_distance()
        };
        let redundancy = hamming_distance - 1;
        let count = range.len() - redundancy;

        symbols.copy_within(data_offset..data_offset + count, range.start + redundancy);
        data_offset += count;

        encode(k, &mut symbols[range], hamming_distance);
    }

    debug_assert_eq!(data_offset, nibbles);
}

// ============================================================================
// Decoder side
// ============================================================================

/// Strip redundancy from every codeword, leaving the data word at the front.
/// Returns the data word length.
pub fn compact_data_word(symbols: &mut [Gf16], mode: FecMode, n_codewords: usize) -> usize {
    let nibbles = symbols.len();
    let mut write = 0;

    for (k, range) in codeword_ranges(n_codewords, nibbles).enumerate() {
        let redundancy = if k == 0 {
            mode.first_hamming_distance() - 1
        } else {
            mode.hamming_distance() - 1
        };
        let count = range.len() - redundancy;
        symbols.copy_within(range.start + redundancy..range.end, write);
        write += count;
    }

    write
}

/// Outcome of hash validation on a compacted data word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Postprocessed {
    /// Primary hash mismatch: the frame cannot be used
    PrimaryMismatch,
    /// Payload extracted
    Accepted {
        /// EPMR carried in the primary hash, if the mode has one there
        epmr: Option<Epmr>,
        /// False when the secondary hash was checked and failed
        secondary_intact: bool,
    },
}

/// Validate hashes and rebuild payload bytes from a compacted data word.
///
/// `payload.len()` is the number of payload bytes the frame carries. The
/// secondary hash is skipped when `check_secondary_hash` is false.
pub fn postprocess(
    mode: FecMode,
    data_word: &mut [Gf16],
    payload: &mut [u8],
    slot_bytes: usize,
    pc_split: usize,
    check_secondary_hash: bool,
) -> Postprocessed {
    let data_bytes = payload.len();
    let n_primary = mode.primary_hash_bytes(slot_bytes);
    let n_secondary = if pc_split > 0 {
        mode.secondary_hash_bytes()
    } else {
        0
    };
    let hash_symbols = 2 * (n_primary + n_secondary);
    let len = hash_symbols + 2 * data_bytes;

    let mut epmr = None;
    if mode != FecMode::Mode1 {
        epmr_bitswap(data_word, mode, slot_bytes);
        let carried = epmr_from_data_word(data_word, mode, slot_bytes);

        let (hashes, data) = data_word[..len].split_at(hash_symbols);
        if !check_primary(&data[..2 * data_bytes - pc_split], carried, &hashes[..2 * n_primary]) {
            return Postprocessed::PrimaryMismatch;
        }
        epmr = Some(carried);
    }

    let mut secondary_intact = true;
    if pc_split > 0 && check_secondary_hash {
        secondary_intact = check_secondary(
            &data_word[len - pc_split..len],
            &data_word[2 * n_primary..hash_symbols],
        );
    }

    for (i, byte) in payload.iter_mut().enumerate() {
        *byte = data_word[len - 2 * i - 1].value() | (data_word[len - 2 * i - 2].value() << 4);
    }

    Postprocessed::Accepted {
        epmr,
        secondary_intact,
    }
}
