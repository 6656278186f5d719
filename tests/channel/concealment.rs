//! Partial concealment: damage confined to the trailing codewords

use super::common::*;
use rs16fec::slot_plan::{codeword_count, partial_concealment_split};
use rs16fec::{FecMode, Validity};

const CONCEALMENT_LAYOUTS: [(usize, FecMode, usize, usize); 8] = [
    (80, FecMode::Mode3, 5, 50),
    (80, FecMode::Mode4, 3, 24),
    (100, FecMode::Mode3, 6, 60),
    (100, FecMode::Mode4, 5, 40),
    (200, FecMode::Mode3, 14, 149),
    (200, FecMode::Mode4, 11, 94),
    (400, FecMode::Mode3, 30, 320),
    (400, FecMode::Mode4, 25, 215),
];

#[test]
fn test_all_concealment_codewords_destroyed() {
    for (slot_bytes, mode, n_pccw, split) in CONCEALMENT_LAYOUTS {
        let encoded = encode_pattern(mode, 0, slot_bytes, 11);
        let n = codeword_count(slot_bytes);
        let mut slot = encoded.slot.clone();
        for codeword in n - n_pccw..n {
            corrupt_codeword(&mut slot, codeword, mode.correction_capacity() + 2);
        }

        let report = decode_slot(&mut slot);
        let context = format!("slot {slot_bytes} mode {mode}");
        let range = report
            .validity
            .unreliable_range()
            .unwrap_or_else(|| panic!("{context}: expected partial, got {:?}", report.validity));
        assert_eq!(range.first_bit, 0, "{context}");
        assert_eq!(range.last_bit, 4 * split - 1, "{context}");
        assert_eq!(report.n_pccw, n_pccw, "{context}");
        assert_eq!(report.pc_split, split, "{context}");
        assert_eq!(report.payload_len, encoded.payload.len(), "{context}");

        // Bytes wholly past the unreliable range are intact
        let first_clean = split.div_ceil(2);
        assert_eq!(&slot[first_clean..report.payload_len], &encoded.payload[first_clean..], "{context}");
    }
}

#[test]
fn test_single_concealment_codeword_destroyed() {
    for (slot_bytes, mode, n_pccw, _) in CONCEALMENT_LAYOUTS {
        let encoded = encode_pattern(mode, 0, slot_bytes, 11);
        let n = codeword_count(slot_bytes);

        // Trust index j counts codewords from the end of the slot
        for j in 0..n_pccw {
            let mut slot = encoded.slot.clone();
            corrupt_codeword(&mut slot, n - 1 - j, mode.correction_capacity() + 2);

            let report = decode_slot(&mut slot);
            let context = format!("slot {slot_bytes} mode {mode} j {j}");
            let first_bit = 4 * partial_concealment_split(mode, j, slot_bytes);
            let last_bit = 4 * partial_concealment_split(mode, j + 1, slot_bytes) - 1;
            match report.validity {
                Validity::Partial(range) => {
                    assert_eq!((range.first_bit, range.last_bit), (first_bit, last_bit), "{context}");
                }
                other => panic!("{context}: expected partial, got {other:?}"),
            }

            let payload = &encoded.payload;
            let head = first_bit / 8;
            let tail = (last_bit + 8) / 8;
            assert_eq!(&slot[..head], &payload[..head], "{context}");
            assert_eq!(&slot[tail..payload.len()], &payload[tail..], "{context}");
        }
    }
}

#[test]
fn test_correctable_tail_damage_stays_valid() {
    let encoded = encode_pattern(FecMode::Mode3, 0, 200, 11);
    let n = codeword_count(200);
    let mut slot = encoded.slot.clone();
    for codeword in n - 3..n {
        corrupt_codeword(&mut slot, codeword, 1);
    }
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.payload(&slot), &encoded.payload[..]);
}

#[test]
fn test_protected_codeword_damage_is_unrecoverable() {
    // Codeword 6 is past the signaled ones but before the concealment tail
    let encoded = encode_pattern(FecMode::Mode4, 0, 200, 11);
    let mut slot = encoded.slot.clone();
    corrupt_codeword(&mut slot, 6, 5);
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Unrecoverable);
    assert_eq!(report.payload_len, 0);
}
