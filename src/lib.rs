//! Reed-Solomon GF(16) forward error correction for fixed-size audio codec
//! transport slots.
//!
//! A slot of 40..=400 bytes is protected in one of four modes of increasing
//! strength. The decoder needs no side information: the mode is recovered
//! from signaling patterns embedded in the first six codewords.

pub mod checksum;
pub mod config;
pub mod decoder;
pub mod detect;
pub mod domain;
pub mod encoder;
pub mod error;
pub mod fixed;
pub mod frames;
pub mod packing;
pub mod reed_solomon;
pub mod risk;
pub mod scratch;
pub mod slot_plan;

pub use config::BatchConfig;
pub use decoder::{decode, DecodeOptions, DecodeReport};
pub use domain::*;
pub use encoder::{encode, payload_capacity};
pub use error::{FecError, Result};
pub use frames::{decode_frames, encode_frames, DecodedFrame};
pub use scratch::Scratch;
pub use slot_plan::SlotPlan;
