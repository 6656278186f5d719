//! Nibble-wise hashes protecting the payload
//!
//! Two hashes guard a frame after error correction:
//!
//! - **Primary**: covers the protected part of the payload and is keyed with
//!   the EPMR bits, so a corrupted request cannot pass validation.
//! - **Secondary**: covers the partial concealment region, so damage there can
//!   be reported without discarding the whole frame.
//!
//! Both run a 4-bit-at-a-time LFSR over the symbols from last to first. Digest
//! symbol `i` is `(remainder >> 4i) & 15`.

use crate::domain::Epmr;
use crate::reed_solomon::Gf16;

// ============================================================================
// Reduction tables
// ============================================================================

/// 14-bit register, used for 2-byte primary hashes
#[rustfmt::skip]
const CRC14_MASK: [u32; 16] = [
    0, 17989, 35978, 51919, 71956, 89937, 103838, 119771,
    143912, 160877, 179874, 194791, 207676, 224633, 239542, 254451,
];

/// 22-bit register, used for 3-byte primary hashes
#[rustfmt::skip]
const CRC22_MASK: [u32; 16] = [
    0, 4788009, 9576018, 14356859, 19152036, 23933837, 28713718, 33500639,
    33650273, 38304072, 43214899, 47867674, 52775621, 57427436, 62346391, 67001278,
];

/// 16-bit register, used for 2-byte secondary hashes
#[rustfmt::skip]
const CRC16_MASK: [u32; 16] = [
    0, 107243, 190269, 214486, 289937, 380538, 428972, 469319,
    579874, 621513, 671263, 761076, 832947, 857944, 938638, 1044581,
];

struct Register {
    remainder: u32,
    shift: u32,
    mask: &'static [u32; 16],
}

impl Register {
    fn new(shift: u32, mask: &'static [u32; 16]) -> Self {
        Register {
            remainder: 0,
            shift,
            mask,
        }
    }

    #[inline]
    fn push(&mut self, nibble: u32) {
        self.remainder = (self.remainder << 4) ^ nibble;
        self.remainder ^= self.mask[((self.remainder >> self.shift) & 15) as usize];
    }

    fn absorb(&mut self, data: &[Gf16]) {
        for symbol in data.iter().rev() {
            self.push(u32::from(symbol.value()));
        }
    }

    fn write(&self, hash: &mut [Gf16]) {
        for (i, out) in hash.iter_mut().enumerate() {
            *out = Gf16::new(((self.remainder >> (4 * i)) & 15) as u8);
        }
    }

    fn matches(&self, hash: &[Gf16]) -> bool {
        hash.iter()
            .enumerate()
            .all(|(i, stored)| u32::from(stored.value()) == (self.remainder >> (4 * i)) & 15)
    }
}

// ============================================================================
// Primary hash
// ============================================================================

fn primary_register(data: &[Gf16], epmr: Epmr, hash_symbols: usize) -> Register {
    let (shift, mask) = match hash_symbols {
        4 => (14, &CRC14_MASK),
        _ => (22, &CRC22_MASK),
    };
    debug_assert!(hash_symbols == 4 || hash_symbols == 6);

    let mut register = Register::new(shift, mask);
    register.absorb(data);
    register.push(u32::from(epmr.value()) << 2);
    for _ in 0..hash_symbols - 1 {
        register.push(0);
    }
    register.remainder ^= u32::from(epmr.value()) << shift;
    register
}

/// Write the primary hash of `data` keyed with `epmr`; `hash.len()` is 4 or 6 symbols
pub fn write_primary(data: &[Gf16], epmr: Epmr, hash: &mut [Gf16]) {
    primary_register(data, epmr, hash.len()).write(hash);
}

/// Check a stored primary hash
pub fn check_primary(data: &[Gf16], epmr: Epmr, hash: &[Gf16]) -> bool {
    primary_register(data, epmr, hash.len()).matches(hash)
}

// ============================================================================
// Secondary hash
// ============================================================================

fn secondary_register(data: &[Gf16], hash_symbols: usize) -> Register {
    debug_assert_eq!(hash_symbols, 4);
    let mut register = Register::new(16, &CRC16_MASK);
    register.absorb(data);
    for _ in 0..hash_symbols {
        register.push(0);
    }
    register
}

/// Write the secondary hash of `data`; `hash.len()` is 4 symbols
pub fn write_secondary(data: &[Gf16], hash: &mut [Gf16]) {
    secondary_register(data, hash.len()).write(hash);
}

/// Check a stored secondary hash
pub fn check_secondary(data: &[Gf16], hash: &[Gf16]) -> bool {
    secondary_register(data, hash.len()).matches(hash)
}
