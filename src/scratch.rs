//! Per-thread working memory for the encoder and decoder

use crate::detect::DetectionWorkspace;
use crate::domain::SlotBytes;
use crate::reed_solomon::{Gf16, MAX_CODEWORD_LEN};

/// Largest slot in symbols
pub const MAX_SLOT_NIBBLES: usize = 2 * SlotBytes::MAX;

/// Most codewords a slot can hold
pub const MAX_CODEWORDS: usize = MAX_SLOT_NIBBLES.div_ceil(MAX_CODEWORD_LEN);

/// Scratch buffers sized for the largest slot.
///
/// Reuse one instance per thread; neither [`crate::encoder::encode`] nor
/// [`crate::decoder::decode`] allocates.
#[derive(Debug, Clone)]
pub struct Scratch {
    pub(crate) symbols: [Gf16; MAX_SLOT_NIBBLES],
    /// One flag per partial concealment codeword plus a sentinel
    pub(crate) trust: [bool; MAX_CODEWORDS + 1],
    pub(crate) detection: DetectionWorkspace,
}

impl Scratch {
    pub fn new() -> Self {
        Scratch {
            symbols: [Gf16::ZERO; MAX_SLOT_NIBBLES],
            trust: [false; MAX_CODEWORDS + 1],
            detection: DetectionWorkspace::default(),
        }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}
