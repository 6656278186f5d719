//! Error types for slot encoding

use thiserror::Error;

use crate::domain::SlotBytes;

/// Contract violations reported by the encoder and the domain constructors.
///
/// Decoding never fails with an error: channel damage is reported through
/// [`crate::domain::Validity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FecError {
    /// Slot length outside the supported range
    #[error(
        "Slot size {0} bytes outside supported range {min}..={max}",
        min = SlotBytes::MIN,
        max = SlotBytes::MAX
    )]
    SlotSizeOutOfRange(usize),

    /// Mode number not in 0..=4
    #[error("Unsupported FEC mode {0}")]
    InvalidMode(u8),

    /// EPMR does not fit in two bits
    #[error("EPMR {0} out of range 0..=3")]
    InvalidEpmr(u8),

    /// Payload length does not match what the slot carries in this mode
    #[error("Payload size mismatch: got {actual} bytes, mode {mode} slot carries {expected}")]
    PayloadSizeMismatch {
        mode: u8,
        expected: usize,
        actual: usize,
    },

    /// Too many partial concealment codewords requested
    #[error(
        "{n_pccw} partial concealment codewords leave fewer than 6 of {n_codewords} codewords fully protected"
    )]
    TooManyConcealmentCodewords { n_pccw: usize, n_codewords: usize },

    /// Slot stream length is not a multiple of the slot size
    #[error("Stream of {len} bytes is not a whole number of {slot_bytes} byte slots")]
    TruncatedStream { len: usize, slot_bytes: usize },
}

/// Type alias for Result with FecError
pub type Result<T> = std::result::Result<T, FecError>;
