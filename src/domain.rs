//! Core domain types for slot channel coding
//!
//! Type-safe wrappers for the values that cross the encoder/decoder boundary.
//! Keeping them distinct prevents mixing a mode number with an EPMR value or a
//! byte count with a nibble count.
//!
//! ## Type Safety Benefits
//!
//! - **FecMode**: only the five defined protection levels can be expressed
//! - **SlotBytes**: slot sizes are validated once against the supported range
//! - **Epmr / ReportedEpmr**: the 2-bit request and the decoder's confidence-coded
//!   report are different quantities

use crate::error::{FecError, Result};

/// Error protection mode.
///
/// Each mode fixes a Hamming distance for codeword 0 and one for the remaining
/// codewords, plus the size of the hashes protecting the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FecMode {
    /// No channel coding: the slot is the payload
    Off,
    /// Distance 3 on codeword 0 only, 3-byte hash
    Mode1,
    /// Distance 3 on every codeword
    Mode2,
    /// Distance 5 on every codeword
    Mode3,
    /// Distance 7 on every codeword
    Mode4,
}

#[rustfmt::skip]
const HAMMING_DISTANCE_FIRST: [usize; 5] = [1, 3, 3, 5, 7];
#[rustfmt::skip]
const HAMMING_DISTANCE_REST: [usize; 5] = [1, 1, 3, 5, 7];
#[rustfmt::skip]
const PRIMARY_HASH_BYTES_SMALL_SLOT: [usize; 5] = [0, 3, 2, 2, 2];
#[rustfmt::skip]
const PRIMARY_HASH_BYTES: [usize; 5] = [0, 3, 3, 3, 3];
#[rustfmt::skip]
const SECONDARY_HASH_BYTES: [usize; 5] = [0, 0, 2, 2, 2];
#[rustfmt::skip]
const SMALL_SLOT_MAX_BIT_ERRORS: [u32; 5] = [0, 0, 3, 9, 18];

impl FecMode {
    /// Every mode, weakest first
    pub const ALL: [FecMode; 5] = [
        FecMode::Off,
        FecMode::Mode1,
        FecMode::Mode2,
        FecMode::Mode3,
        FecMode::Mode4,
    ];

    /// Modes identified by a signaling pattern, in detection order
    pub const SIGNALED: [FecMode; 3] = [FecMode::Mode2, FecMode::Mode3, FecMode::Mode4];

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number)).copied()
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Hamming distance of codeword 0
    pub fn first_hamming_distance(self) -> usize {
        HAMMING_DISTANCE_FIRST[self.index()]
    }

    /// Hamming distance of codewords 1..n
    pub fn hamming_distance(self) -> usize {
        HAMMING_DISTANCE_REST[self.index()]
    }

    /// Symbol errors correctable in codeword 0 (and, for modes 2-4, every codeword)
    pub fn correction_capacity(self) -> usize {
        (self.first_hamming_distance() - 1) / 2
    }

    /// Primary hash size in bytes; the smallest slot uses a shorter hash
    pub fn primary_hash_bytes(self, slot_bytes: usize) -> usize {
        if slot_bytes == SlotBytes::MIN {
            PRIMARY_HASH_BYTES_SMALL_SLOT[self.index()]
        } else {
            PRIMARY_HASH_BYTES[self.index()]
        }
    }

    /// Secondary (partial concealment) hash size in bytes when a split is active
    pub fn secondary_hash_bytes(self) -> usize {
        SECONDARY_HASH_BYTES[self.index()]
    }

    /// Corrected bit errors above which a frame in the smallest slot is discarded
    pub fn small_slot_bit_error_limit(self) -> u32 {
        SMALL_SLOT_MAX_BIT_ERRORS[self.index()]
    }
}

impl TryFrom<u8> for FecMode {
    type Error = FecError;

    fn try_from(value: u8) -> Result<Self> {
        FecMode::from_number(value).ok_or(FecError::InvalidMode(value))
    }
}

impl std::fmt::Display for FecMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Size of one transport slot in bytes, validated against the supported range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotBytes(usize);

impl SlotBytes {
    pub const MIN: usize = 40;
    pub const MAX: usize = 400;

    pub fn new(bytes: usize) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&bytes) {
            Ok(SlotBytes(bytes))
        } else {
            Err(FecError::SlotSizeOutOfRange(bytes))
        }
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }

    /// Number of 4-bit symbols in the slot
    pub fn nibbles(&self) -> usize {
        2 * self.0
    }
}

impl TryFrom<usize> for SlotBytes {
    type Error = FecError;

    fn try_from(bytes: usize) -> Result<Self> {
        SlotBytes::new(bytes)
    }
}

impl std::fmt::Display for SlotBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error protection mode request: two bits of feedback carried in every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epmr(u8);

impl Epmr {
    pub const MAX: u8 = 3;

    pub fn new(value: u8) -> Result<Self> {
        if value <= Self::MAX {
            Ok(Epmr(value))
        } else {
            Err(FecError::InvalidEpmr(value))
        }
    }

    /// Take the two low bits of a symbol
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Epmr(bits & 0x3)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Epmr {
    type Error = FecError;

    fn try_from(value: u8) -> Result<Self> {
        Epmr::new(value)
    }
}

impl std::fmt::Display for Epmr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How far the decoder trusts the EPMR it extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EpmrConfidence {
    High,
    Medium,
    Low,
}

/// EPMR as reported by the decoder: `request + 4 * confidence`, in 0..=11
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportedEpmr(u8);

impl ReportedEpmr {
    pub fn new(request: Epmr, confidence: EpmrConfidence) -> Self {
        ReportedEpmr(request.value() + 4 * confidence as u8)
    }

    /// Raw report value, 0..=11
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn request(&self) -> Epmr {
        Epmr::from_bits(self.0)
    }

    pub fn confidence(&self) -> EpmrConfidence {
        match self.0 >> 2 {
            0 => EpmrConfidence::High,
            1 => EpmrConfidence::Medium,
            _ => EpmrConfidence::Low,
        }
    }
}

impl From<Epmr> for ReportedEpmr {
    fn from(request: Epmr) -> Self {
        ReportedEpmr::new(request, EpmrConfidence::High)
    }
}

impl std::fmt::Display for ReportedEpmr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload bit range the concealment stage should treat as unreliable (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnreliableRange {
    pub first_bit: usize,
    pub last_bit: usize,
}

impl UnreliableRange {
    pub fn contains_bit(&self, bit: usize) -> bool {
        (self.first_bit..=self.last_bit).contains(&bit)
    }
}

/// Per-frame decoding outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validity {
    Valid,
    Unrecoverable,
    Partial(UnreliableRange),
}

impl Validity {
    /// Numeric validity code: 0 valid, 1 unrecoverable, 2 partial
    pub fn code(&self) -> u8 {
        match self {
            Validity::Valid => 0,
            Validity::Unrecoverable => 1,
            Validity::Partial(_) => 2,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn unreliable_range(&self) -> Option<UnreliableRange> {
        match self {
            Validity::Partial(range) => Some(*range),
            _ => None,
        }
    }
}
