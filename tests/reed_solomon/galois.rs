//! Galois Field (GF(2^4)) Arithmetic Tests
//!
//! Tests for Gf16 field operations including addition, multiplication,
//! division, powers, and special properties.

use rs16fec::reed_solomon::galois::{Gf16, GF16_ORDER};

// ============================================================================
// Basic Arithmetic Operations
// ============================================================================

#[test]
fn test_gf16_addition_is_xor() {
    let a = Gf16::new(5);
    let b = Gf16::new(3);
    assert_eq!((a + b).value(), 6);
    assert_eq!((a - b).value(), 6);
    assert_eq!(a + a, Gf16::ZERO);
}

#[test]
fn test_gf16_reduction_polynomial() {
    // α^4 = α + 1 for x^4 + x + 1
    assert_eq!(Gf16::ALPHA.pow(4), Gf16::new(0b0011));
    assert_eq!(Gf16::new(8) * Gf16::ALPHA, Gf16::new(3));
}

#[test]
fn test_gf16_new_keeps_low_nibble() {
    assert_eq!(Gf16::new(0xA7).value(), 0x7);
}

// ============================================================================
// Powers and Logarithms
// ============================================================================

#[test]
fn test_gf16_alpha_generates_the_group() {
    let mut seen = [false; 16];
    for i in 0..GF16_ORDER {
        let x = Gf16::exp(i);
        assert!(!seen[usize::from(x.value())], "α^{i} repeats");
        seen[usize::from(x.value())] = true;
        assert_eq!(x.log(), Some(i));
    }
    assert!(!seen[0]);
    assert_eq!(Gf16::exp(GF16_ORDER), Gf16::ONE);
}

#[test]
fn test_gf16_zero_has_no_log() {
    assert_eq!(Gf16::ZERO.log(), None);
    assert_eq!(Gf16::ZERO.inverse(), Gf16::ZERO);
}

// ============================================================================
// Division
// ============================================================================

#[test]
fn test_gf16_division_undoes_multiplication() {
    for a in 0..16u8 {
        for b in 1..16u8 {
            let (a, b) = (Gf16::new(a), Gf16::new(b));
            assert_eq!(a * b / b, a);
        }
    }
}

#[test]
fn test_gf16_bit_weight() {
    assert_eq!(Gf16::new(0).bit_weight(), 0);
    assert_eq!(Gf16::new(0xF).bit_weight(), 4);
    assert_eq!(Gf16::new(0x9).bit_weight(), 2);
}
