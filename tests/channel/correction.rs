//! Error correction within and beyond the capacity of each mode

use super::common::*;
use rs16fec::slot_plan::{codeword_count, SIGNALED_CODEWORDS};
use rs16fec::{FecMode, Validity};

#[test]
fn test_corrects_up_to_capacity_in_any_codeword() {
    for slot_bytes in [60usize, 100, 160, 400] {
        for mode in FecMode::SIGNALED {
            let encoded = encode_pattern(mode, 0, slot_bytes, 11);
            for codeword in 0..codeword_count(slot_bytes) {
                for errors in 1..=mode.correction_capacity() {
                    let mut slot = encoded.slot.clone();
                    let bits = corrupt_codeword(&mut slot, codeword, errors);

                    let report = decode_slot(&mut slot);
                    let context = format!("slot {slot_bytes} mode {mode} codeword {codeword} errors {errors}");
                    assert_eq!(report.validity, Validity::Valid, "{context}");
                    assert_eq!(report.mode, Some(mode), "{context}");
                    assert_eq!(report.bit_errors, Some(bits), "{context}");
                    assert_eq!(report.payload(&slot), &encoded.payload[..], "{context}");
                }
            }
        }
    }
}

#[test]
fn test_beyond_capacity_in_signaled_codewords_is_unrecoverable() {
    for slot_bytes in [40usize, 60, 100, 160, 400] {
        for mode in FecMode::SIGNALED {
            let encoded = encode_pattern(mode, 0, slot_bytes, 11);
            let capacity = mode.correction_capacity();
            for codeword in 0..SIGNALED_CODEWORDS {
                for errors in capacity + 1..=capacity + 2 {
                    let mut slot = encoded.slot.clone();
                    corrupt_codeword(&mut slot, codeword, errors);

                    let report = decode_slot(&mut slot);
                    let context = format!("slot {slot_bytes} mode {mode} codeword {codeword} errors {errors}");
                    assert_eq!(report.validity, Validity::Unrecoverable, "{context}");
                    assert_eq!(report.payload_len, 0, "{context}");
                    assert!(report.epmr.is_some(), "{context}");
                }
            }
        }
    }
}

#[test]
fn test_smallest_slot_bit_error_ceiling() {
    // Three two-bit symbol errors in codewords 0..2: 6 bits > 3 allowed in mode 2
    let encoded = encode_pattern(FecMode::Mode2, 0, 40, 11);
    let mut slot = encoded.slot.clone();
    slot[39] ^= 0x33;
    slot[38] ^= 0x30;
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Unrecoverable);
    assert_eq!(report.bit_errors, Some(6));
    assert_eq!(report.epmr.map(|e| e.value()), Some(8));

    let mut slot = encoded.slot.clone();
    slot[39] ^= 0x11;
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.bit_errors, Some(2));
    assert_eq!(report.payload(&slot), &encoded.payload[..]);

    // 24 bits > 18 allowed in mode 4
    let encoded = encode_pattern(FecMode::Mode4, 0, 40, 11);
    let mut slot = encoded.slot.clone();
    for byte in [39, 38, 37] {
        slot[byte] ^= 0xFF;
    }
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Unrecoverable);
    assert_eq!(report.bit_errors, Some(24));
    assert_eq!(report.epmr.map(|e| e.value()), Some(0));
}

#[test]
fn test_larger_slot_has_no_bit_error_ceiling() {
    // Same damage as the mode 4 ceiling case, but in a 41 byte slot
    let encoded = encode_pattern(FecMode::Mode4, 0, 41, 11);
    let mut slot = encoded.slot.clone();
    for codeword in 0..SIGNALED_CODEWORDS {
        corrupt_symbol(&mut slot, codeword, 0, 0xF);
    }
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.bit_errors, Some(24));
    assert_eq!(report.payload(&slot), &encoded.payload[..]);
}
