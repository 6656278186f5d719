//! Shared helpers for channel tests

use rs16fec::slot_plan::{codeword_count, codeword_length, data_size, partial_concealment_count};
use rs16fec::{decode, encode, DecodeOptions, DecodeReport, Epmr, FecMode, Scratch};

/// Deterministic payload: byte `i` is `i * 37 + pattern`
pub fn payload(len: usize, pattern: u8) -> Vec<u8> {
    (0..len).map(|i| (i * 37 + usize::from(pattern)) as u8).collect()
}

/// Encoded slot together with the payload it carries
pub struct Encoded {
    pub payload: Vec<u8>,
    pub slot: Vec<u8>,
}

/// Encode a pattern payload with the default concealment layout
pub fn encode_pattern(mode: FecMode, epmr: u8, slot_bytes: usize, pattern: u8) -> Encoded {
    let payload_len = data_size(mode, false, slot_bytes);
    let payload = payload(payload_len, pattern);
    let mut slot = vec![0u8; slot_bytes];
    slot[..payload_len].copy_from_slice(&payload);

    let mut scratch = Scratch::new();
    encode(
        mode,
        Epmr::new(epmr).unwrap(),
        &mut slot,
        payload_len,
        partial_concealment_count(slot_bytes, mode, false),
        &mut scratch,
    )
    .unwrap();

    Encoded { payload, slot }
}

/// XOR `value` into symbol `position` of codeword `codeword`
pub fn corrupt_symbol(slot: &mut [u8], codeword: usize, position: usize, value: u8) {
    let n = codeword_count(slot.len());
    let offset = 2 * slot.len() - 1 - (position * n + codeword);
    slot[offset >> 1] ^= value << ((offset & 1) * 4);
}

/// Put `errors` symbol errors into one codeword; returns the flipped bit count.
///
/// Error `i` hits position `(7k + 3i) mod len` with value `((k + 3i) mod 15) + 1`.
pub fn corrupt_codeword(slot: &mut [u8], codeword: usize, errors: usize) -> u32 {
    let n = codeword_count(slot.len());
    let len = codeword_length(n, 2 * slot.len(), codeword);
    (0..errors)
        .map(|i| {
            let value = (((codeword + 3 * i) % 15) + 1) as u8;
            corrupt_symbol(slot, codeword, (codeword * 7 + i * 3) % len, value);
            value.count_ones()
        })
        .sum()
}

pub fn decode_slot(slot: &mut [u8]) -> DecodeReport {
    let mut scratch = Scratch::new();
    decode(slot, DecodeOptions::default(), &mut scratch)
}
