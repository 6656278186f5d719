//! Reed-Solomon Error Correction Module
//!
//! Short Reed-Solomon codes over GF(2^4) with Hamming distance 3, 5 or 7
//! (up to 1, 2 or 3 correctable symbol errors per codeword). Codewords hold at
//! most 15 symbols, so decoding uses closed-form locator solutions instead of
//! iterative algorithms.

pub mod codec;
pub mod galois;
pub mod locator;

pub use codec::*;
pub use galois::*;
pub use locator::*;
