//! Byte-exact slot vectors

use super::common::*;
use rs16fec::slot_plan::data_size;
use rs16fec::{decode, encode, DecodeOptions, Epmr, FecMode, Scratch, Validity};

#[test]
fn test_zero_payload_mode_two() {
    let mut scratch = Scratch::new();
    let mut slot = vec![0u8; 40];
    encode(FecMode::Mode2, Epmr::default(), &mut slot, 32, 0, &mut scratch).unwrap();

    let expected = [
        0x00, 0x22, 0x22, 0x22, 0x33, 0x33, 0x33, 0xdd, 0xdd, 0xdd, 0xaa, 0xaa, 0xaa, 0xcc, 0xcc, 0xcc, 0x33, 0x33,
        0x33, 0x11, 0x11, 0x11, 0x99, 0x99, 0x99, 0xee, 0xee, 0xee, 0x66, 0x66, 0x66, 0x55, 0x55, 0x55, 0xff, 0xff,
        0xff, 0x77, 0x77, 0x77,
    ];
    assert_eq!(slot, expected);

    let report = decode(&mut slot, DecodeOptions::default(), &mut scratch);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.bit_errors, Some(0));
    assert_eq!(report.payload_len, 32);
    assert_eq!(report.epmr.map(|e| e.value()), Some(0));
    assert_eq!(report.mode, Some(FecMode::Mode2));
}

#[test]
fn test_mode_four_with_concealment() {
    let encoded = encode_pattern(FecMode::Mode4, 2, 80, 11);
    assert_eq!(
        hex::encode(&encoded.slot),
        "8fdc29fb73eb388507395ce0b50a40c84038ff3f5c8e63bc69951d05b1ec5d7e\
         a132f794ea62da2f7c70a0c33142d8c4a4820bd790c95c5da8719746bbf58d96\
         55f92a621b891c59c1e6465ecae27a71"
    );

    let mut slot = encoded.slot.clone();
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.payload_len, 42);
    assert_eq!(report.n_pccw, 3);
    assert_eq!(report.pc_split, 24);
    assert_eq!(report.epmr.map(|e| e.value()), Some(2));
    assert_eq!(report.payload(&slot), &encoded.payload[..]);
}

#[test]
fn test_mode_one() {
    let encoded = encode_pattern(FecMode::Mode1, 3, 40, 7);
    assert_eq!(
        hex::encode(&encoded.slot),
        "f9e7c8cca0be1e0cedfef2006321121145532856375397a5dd7b5ca5e9f7629071a83c4a57c5a6ea"
    );

    let mut slot = encoded.slot.clone();
    let report = decode_slot(&mut slot);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.mode, Some(FecMode::Mode1));
    assert_eq!(report.payload_len, 36);
    assert_eq!(report.epmr.map(|e| e.value()), Some(3));
    assert_eq!(report.payload(&slot), &encoded.payload[..]);
}

#[test]
fn test_mode_three_combined_channel_coding() {
    let payload_len = data_size(FecMode::Mode3, true, 100);
    assert_eq!(payload_len, 69);

    let payload = payload(payload_len, 11);
    let mut slot = vec![0u8; 100];
    slot[..payload_len].copy_from_slice(&payload);
    let mut scratch = Scratch::new();
    encode(FecMode::Mode3, Epmr::new(1).unwrap(), &mut slot, payload_len, 0, &mut scratch).unwrap();

    assert_eq!(
        hex::encode(&slot),
        "f59c4b6d8fa1c334adc037ae1641e67d90b2d4f67ee096e35ac138c838a1e507\
         294b92278d058cf36ab7023d3a5c7e9009907f37ae158d38559c8fa1c3e5344e\
         5459c138af049cd752b768d1987c4d0075d7e6426d2cc8938af5b7afbf253336\
         05f9d099"
    );

    let options = DecodeOptions {
        combined_channel_coding: true,
        bad_frame: false,
    };
    let report = decode(&mut slot, options, &mut scratch);
    assert_eq!(report.validity, Validity::Valid);
    assert_eq!(report.n_pccw, 0);
    assert_eq!(report.payload_len, 69);
    assert_eq!(report.epmr.map(|e| e.value()), Some(1));
    assert_eq!(&slot[..69], &payload[..]);
}
