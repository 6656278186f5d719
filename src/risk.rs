//! Decoding risk estimates for blind mode selection
//!
//! Each candidate mode is scored by the probability that a random word would
//! decode under it with the observed locator degrees. The product of six such
//! factors spans dozens of binary orders of magnitude, so it is tracked in a
//! small emulated float: a Q14 mantissa in `[16384, 32767]` and a power-of-two
//! exponent.

use std::cmp::Ordering;
use std::ops::Mul;

use crate::domain::FecMode;

/// `mantissa / 2^14 · 2^exponent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleFloat {
    mantissa: i16,
    exponent: i16,
}

impl SimpleFloat {
    /// Mantissa representing 1.0
    pub const UNIT_MANTISSA: i16 = 16384;

    pub const ONE: SimpleFloat = SimpleFloat::new(Self::UNIT_MANTISSA, 0);

    pub const fn new(mantissa: i16, exponent: i16) -> Self {
        SimpleFloat { mantissa, exponent }
    }

    pub fn mantissa(&self) -> i16 {
        self.mantissa
    }

    pub fn exponent(&self) -> i16 {
        self.exponent
    }

    /// Approximate value, for logging
    pub fn to_f64(&self) -> f64 {
        f64::from(self.mantissa) / f64::from(Self::UNIT_MANTISSA) * 2f64.powi(self.exponent.into())
    }
}

impl Default for SimpleFloat {
    fn default() -> Self {
        SimpleFloat::ONE
    }
}

impl Mul for SimpleFloat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut product = (i32::from(self.mantissa) * i32::from(rhs.mantissa)) >> 14;
        let mut exponent = self.exponent + rhs.exponent;
        if product & 0x8000 != 0 {
            product >>= 1;
            exponent += 1;
        }
        SimpleFloat {
            mantissa: product as i16,
            exponent,
        }
    }
}

/// Exponents are compared first; mantissas only break ties
impl Ord for SimpleFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.exponent
            .cmp(&other.exponent)
            .then(self.mantissa.cmp(&other.mantissa))
    }
}

impl PartialOrd for SimpleFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for SimpleFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*2^{}", self.mantissa, self.exponent)
    }
}

/// Risk per (mode 1..=4, locator degree 0..=3)
#[rustfmt::skip]
const RISK_TABLE: [[SimpleFloat; 4]; 4] = [
    [SimpleFloat::new(16384, 0),   SimpleFloat::new(16384, 0),   SimpleFloat::new(16384, 0),   SimpleFloat::new(16384, 0)],
    [SimpleFloat::new(16384, -8),  SimpleFloat::new(26880, -1),  SimpleFloat::new(16384, 0),   SimpleFloat::new(16384, 0)],
    [SimpleFloat::new(16384, -16), SimpleFloat::new(26880, -9),  SimpleFloat::new(20475, -2),  SimpleFloat::new(16384, 0)],
    [SimpleFloat::new(16384, -24), SimpleFloat::new(26880, -17), SimpleFloat::new(20475, -10), SimpleFloat::new(19195, -4)],
];

/// Acceptance threshold for slots of at most 80 symbols
const RISK_THRESHOLD_SMALL: SimpleFloat = SimpleFloat::new(21990, -23);

/// Acceptance threshold for larger slots
const RISK_THRESHOLD: SimpleFloat = SimpleFloat::new(25166, -10);

/// Risk of accepting a codeword decoded under `mode` with a locator of `degree`
pub fn decoding_risk(mode: FecMode, degree: usize) -> SimpleFloat {
    match mode {
        FecMode::Off => SimpleFloat::ONE,
        _ => RISK_TABLE[usize::from(mode.number()) - 1][degree.min(3)],
    }
}

/// Highest combined risk at which a candidate mode is still tried
pub fn risk_threshold(slot_nibbles: usize) -> SimpleFloat {
    if slot_nibbles <= 80 {
        RISK_THRESHOLD_SMALL
    } else {
        RISK_THRESHOLD
    }
}
