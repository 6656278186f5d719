//! Galois Field GF(2^4) arithmetic for RS16 channel coding
//!
//! ## Field construction
//!
//! Elements are 4-bit symbols (nibbles). The field is generated by the primitive
//! polynomial 0x13 (x⁴ + x + 1) and α = 2 generates the multiplicative group of
//! order 15.
//!
//! All lookup tables are `const`, so multiplication is available in `const fn`
//! context. The factorization tables in [`super::locator`] are built from it at
//! compile time.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign};

/// GF(2^4) primitive polynomial: 0x13 (x⁴ + x + 1)
pub const GF16_POLYNOMIAL: u8 = 0x13;

/// Order of the multiplicative group
pub const GF16_ORDER: usize = 15;

/// αⁱ for i in 0..=15 (α¹⁵ wraps back to 1)
#[rustfmt::skip]
const ANTILOG: [u8; 16] = [1, 2, 4, 8, 3, 6, 12, 11, 5, 10, 7, 14, 15, 13, 9, 1];

/// log_α(x); entry 0 is a sentinel
#[rustfmt::skip]
const LOG: [u8; 16] = [255, 0, 1, 4, 2, 8, 5, 10, 3, 14, 9, 7, 6, 13, 11, 12];

/// x⁻¹; zero maps to zero
#[rustfmt::skip]
const INVERSE: [u8; 16] = [0, 1, 9, 14, 13, 11, 7, 6, 15, 2, 12, 5, 10, 4, 3, 8];

/// GF(16) element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Gf16(u8);

impl Gf16 {
    pub const ZERO: Gf16 = Gf16(0);
    pub const ONE: Gf16 = Gf16(1);
    pub const ALPHA: Gf16 = Gf16(2);

    /// Build an element from the low nibble of `value`
    #[inline]
    pub const fn new(value: u8) -> Self {
        Gf16(value & 0x0F)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// αⁱ, with the exponent reduced modulo 15
    #[inline]
    pub const fn exp(exponent: usize) -> Self {
        Gf16(ANTILOG[exponent % GF16_ORDER])
    }

    /// Discrete logarithm to base α; `None` for zero
    #[inline]
    pub const fn log(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(LOG[self.0 as usize] as usize)
        }
    }

    /// Field multiplication usable in constant expressions
    #[inline]
    pub const fn multiply(self, rhs: Gf16) -> Gf16 {
        if self.0 == 0 || rhs.0 == 0 {
            return Gf16::ZERO;
        }
        let log_sum = LOG[self.0 as usize] as usize + LOG[rhs.0 as usize] as usize;
        Gf16(ANTILOG[log_sum % GF16_ORDER])
    }

    /// Multiplicative inverse. Zero has none and maps to zero.
    #[inline]
    pub const fn inverse(self) -> Gf16 {
        Gf16(INVERSE[self.0 as usize])
    }

    /// Power operation
    pub fn pow(self, exponent: usize) -> Self {
        match self.log() {
            None if exponent == 0 => Gf16::ONE,
            None => Gf16::ZERO,
            Some(log) => Gf16::exp(log * exponent),
        }
    }

    /// Number of set bits, i.e. the bit errors a correction of this magnitude fixes
    #[inline]
    pub const fn bit_weight(self) -> u32 {
        self.0.count_ones()
    }
}

// Addition (XOR in Galois fields)
impl Add for Gf16 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Gf16(self.0 ^ rhs.0)
    }
}

impl AddAssign for Gf16 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Subtraction (same as addition in GF(2^n))
impl Sub for Gf16 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Gf16(self.0 ^ rhs.0)
    }
}

impl SubAssign for Gf16 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for Gf16 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}

impl MulAssign for Gf16 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(rhs);
    }
}

/// Division by zero yields zero; every divisor in the decoder is checked first.
impl Div for Gf16 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self.multiply(rhs.inverse())
    }
}

impl From<u8> for Gf16 {
    fn from(value: u8) -> Self {
        Gf16::new(value)
    }
}

impl From<Gf16> for u8 {
    fn from(val: Gf16) -> Self {
        val.0
    }
}

impl std::fmt::Display for Gf16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Convert raw nibbles into field elements in constant context
pub const fn symbols<const N: usize>(raw: [u8; N]) -> [Gf16; N] {
    let mut out = [Gf16::ZERO; N];
    let mut i = 0;
    while i < N {
        out[i] = Gf16::new(raw[i]);
        i += 1;
    }
    out
}
