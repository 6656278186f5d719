//! Error protection mode request transport and estimation

use super::common::*;
use rs16fec::slot_plan::SIGNALED_CODEWORDS;
use rs16fec::{EpmrConfidence, FecMode, Validity};

#[test]
fn test_epmr_round_trip() {
    for mode in [FecMode::Mode1, FecMode::Mode2, FecMode::Mode3, FecMode::Mode4] {
        for slot_bytes in [40usize, 160, 280, 400] {
            for epmr in 0..=3u8 {
                let mut slot = encode_pattern(mode, epmr, slot_bytes, 5).slot;
                let report = decode_slot(&mut slot);
                let context = format!("mode {mode} slot {slot_bytes} epmr {epmr}");
                assert_eq!(report.validity, Validity::Valid, "{context}");
                assert_eq!(report.mode, Some(mode), "{context}");
                assert_eq!(report.bit_errors, Some(0), "{context}");
                let reported = report.epmr.unwrap();
                assert_eq!(reported.value(), epmr, "{context}");
                assert_eq!(reported.confidence(), EpmrConfidence::High, "{context}");
            }
        }
    }
}

/// Damage the first `severity` codewords (at most six) with `severity` errors each
fn decode_with_severity(mode: FecMode, severity: usize) -> (Validity, Option<u32>, u8) {
    let mut slot = encode_pattern(mode, 0, 100, 5).slot;
    for codeword in 0..severity.min(SIGNALED_CODEWORDS) {
        corrupt_codeword(&mut slot, codeword, severity);
    }
    let report = decode_slot(&mut slot);
    (report.validity, report.bit_errors, report.epmr.map_or(u8::MAX, |e| e.value()))
}

#[test]
fn test_epmr_confidence_degrades_with_severity() {
    let expected: [(FecMode, [u8; 7]); 3] = [
        (FecMode::Mode2, [0, 0, 8, 8, 8, 8, 8]),
        (FecMode::Mode3, [0, 0, 0, 8, 8, 8, 8]),
        (FecMode::Mode4, [0, 0, 0, 0, 8, 8, 8]),
    ];

    for (mode, epmrs) in expected {
        let mut previous = 0;
        for (severity, &epmr) in epmrs.iter().enumerate() {
            let (validity, _, reported) = decode_with_severity(mode, severity);
            assert_eq!(reported, epmr, "mode {mode} severity {severity}");
            assert_eq!(validity.is_valid(), severity <= mode.correction_capacity(), "mode {mode} severity {severity}");
            assert!(reported >= previous);
            previous = reported;
        }
    }
}

#[test]
fn test_bit_errors_within_capacity() {
    assert_eq!(decode_with_severity(FecMode::Mode2, 1).1, Some(1));
    assert_eq!(decode_with_severity(FecMode::Mode3, 2).1, Some(5));
    assert_eq!(decode_with_severity(FecMode::Mode4, 2).1, Some(5));
    assert_eq!(decode_with_severity(FecMode::Mode4, 3).1, Some(15));
}

#[test]
fn test_bad_frame_reports_no_epmr() {
    let mut slot = encode_pattern(FecMode::Mode2, 3, 100, 5).slot;
    let mut scratch = rs16fec::Scratch::new();
    let options = rs16fec::DecodeOptions {
        combined_channel_coding: false,
        bad_frame: true,
    };
    let report = rs16fec::decode(&mut slot, options, &mut scratch);
    assert_eq!(report.validity, Validity::Unrecoverable);
    assert_eq!(report.epmr, None);
    assert_eq!(report.bit_errors, None);
}
