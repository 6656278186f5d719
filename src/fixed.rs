//! Saturating fixed-point primitives used by the slot planner
//!
//! Overflow is returned with the value instead of being latched in a global
//! flag.

/// Result of a saturating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saturated<T> {
    pub value: T,
    pub overflow: bool,
}

impl<T> Saturated<T> {
    fn exact(value: T) -> Self {
        Saturated {
            value,
            overflow: false,
        }
    }

    fn clipped(value: T) -> Self {
        Saturated {
            value,
            overflow: true,
        }
    }
}

fn saturate_i32(wide: i64) -> Saturated<i32> {
    match i32::try_from(wide) {
        Ok(value) => Saturated::exact(value),
        Err(_) if wide > 0 => Saturated::clipped(i32::MAX),
        Err(_) => Saturated::clipped(i32::MIN),
    }
}

/// Q15 × Q15 → Q31 multiply: `2·a·b`, saturated
pub fn l_mult(a: i16, b: i16) -> Saturated<i32> {
    saturate_i32(2 * i64::from(a) * i64::from(b))
}

/// 32-bit saturating subtraction
pub fn l_sub(a: i32, b: i32) -> Saturated<i32> {
    saturate_i32(i64::from(a) - i64::from(b))
}

/// Round a Q31 value to its high 16 bits
pub fn round_fx(x: i32) -> Saturated<i16> {
    let sum = saturate_i32(i64::from(x) + 0x8000);
    // After saturation the high half always fits
    Saturated {
        value: (sum.value >> 16) as i16,
        overflow: sum.overflow,
    }
}
