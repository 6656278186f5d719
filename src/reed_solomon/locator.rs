//! Closed-form error location for up to three symbol errors
//!
//! The error locator polynomial (ELP) is computed directly from the syndromes
//! with Peterson's method. Its roots are the error locators αᵖ, which are found
//! through lookup tables generated at compile time by exhaustive search over
//! the sixteen field elements. Error magnitudes follow from the syndromes by
//! Cramer's rule.
//!
//! The locator is written `x^d + σ1·x^{d-1} + … + σd`.

use smallvec::{smallvec, SmallVec};

use super::codec::Syndromes;
use super::galois::Gf16;

/// Positions (powers of α) of located errors within a codeword
pub type ErrorPositions = SmallVec<[u8; 3]>;

/// Error magnitudes, in the same order as the positions they belong to
pub type ErrorValues = SmallVec<[Gf16; 3]>;

/// Largest correction capacity supported by the closed-form solver
pub const MAX_CAPACITY: usize = 3;

/// Roots of `x² + a·x + b` as logarithms, indexed by `a | b << 4`.
/// Only polynomials with two distinct roots have an entry.
const QUADRATIC_ROOTS: [Option<[u8; 2]>; 256] = quadratic_root_table();

/// Roots of `y³ + β·y + γ`, indexed by `β | γ << 4`.
/// Only polynomials with three distinct roots have an entry.
const CUBIC_ROOTS: [Option<[Gf16; 3]>; 256] = cubic_root_table();

const fn log_or_zero(x: Gf16) -> u8 {
    match x.log() {
        Some(p) => p as u8,
        None => 0,
    }
}

const fn quadratic_root_table() -> [Option<[u8; 2]>; 256] {
    let mut table = [None; 256];
    let mut index = 0;
    while index < 256 {
        let a = Gf16::new(index as u8);
        let b = Gf16::new((index >> 4) as u8);
        let mut roots = [0u8; 2];
        let mut found = 0;
        let mut x = 1;
        while x < 16 {
            let xv = Gf16::new(x as u8);
            let value = xv.multiply(xv).value() ^ a.multiply(xv).value() ^ b.value();
            if value == 0 {
                if found < 2 {
                    roots[found] = log_or_zero(xv);
                }
                found += 1;
            }
            x += 1;
        }
        if found == 2 {
            table[index] = Some(roots);
        }
        index += 1;
    }
    table
}

const fn cubic_root_table() -> [Option<[Gf16; 3]>; 256] {
    let mut table = [None; 256];
    let mut index = 0;
    while index < 256 {
        let beta = Gf16::new(index as u8);
        let gamma = Gf16::new((index >> 4) as u8);
        let mut roots = [Gf16::ZERO; 3];
        let mut found = 0;
        let mut y = 0;
        while y < 16 {
            let yv = Gf16::new(y as u8);
            let value = yv.multiply(yv).multiply(yv).value()
                ^ beta.multiply(yv).value()
                ^ gamma.value();
            if value == 0 {
                if found < 3 {
                    roots[found] = yv;
                }
                found += 1;
            }
            y += 1;
        }
        if found == 3 {
            table[index] = Some(roots);
        }
        index += 1;
    }
    table
}

#[inline]
fn table_index(low: Gf16, high: Gf16) -> usize {
    (low.value() | (high.value() << 4)) as usize
}

/// Error locator polynomial with its degree.
///
/// A degree above the capacity it was computed for marks a syndrome pattern
/// with no consistent solution of at most that many errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorLocator {
    sigma: [Gf16; 3],
    degree: usize,
}

impl ErrorLocator {
    /// Peterson's closed-form solution for `capacity` ∈ 1..=3 (2·capacity syndromes)
    pub fn from_syndromes(s: &Syndromes, capacity: usize) -> Self {
        debug_assert!((1..=MAX_CAPACITY).contains(&capacity));
        let capacity = capacity.clamp(1, MAX_CAPACITY);

        if s[..2 * capacity].iter().all(|x| x.is_zero()) {
            return Self::default();
        }

        let uncorrectable = Self {
            sigma: [Gf16::ZERO; 3],
            degree: capacity + 1,
        };

        if capacity == 3 {
            let det = s[0] * s[2] * s[4] + s[3] * s[3] * s[0] + s[1] * s[1] * s[4] + s[2] * s[2] * s[2];
            if !det.is_zero() {
                let a = s[2] * s[4] + s[3] * s[3];
                let b = s[0] * s[4] + s[2] * s[2];
                let c = s[0] * s[2] + s[1] * s[1];
                let d = s[2] * s[3] + s[1] * s[4];
                let e = s[1] * s[2] + s[0] * s[3];
                let f = s[1] * s[3] + s[2] * s[2];

                let sigma3 = (a * s[3] + d * s[4] + f * s[5]) / det;
                let sigma2 = (d * s[3] + b * s[4] + e * s[5]) / det;
                let sigma1 = (f * s[3] + e * s[4] + c * s[5]) / det;

                if sigma3.is_zero() {
                    return uncorrectable;
                }
                return Self {
                    sigma: [sigma1, sigma2, sigma3],
                    degree: 3,
                };
            }
        }

        if capacity >= 2 {
            let det = s[0] * s[2] + s[1] * s[1];
            if !det.is_zero() {
                let sigma1 = (s[1] * s[2] + s[0] * s[3]) / det;
                let sigma2 = (s[2] * s[2] + s[1] * s[3]) / det;

                // Newton identities on the syndromes not used to solve the system
                let consistent = (2..2 * capacity - 2)
                    .all(|k| (sigma2 * s[k] + sigma1 * s[k + 1] + s[k + 2]).is_zero());

                if !consistent || sigma2.is_zero() {
                    return uncorrectable;
                }
                return Self {
                    sigma: [sigma1, sigma2, Gf16::ZERO],
                    degree: 2,
                };
            }
        }

        if s[0].is_zero() {
            return uncorrectable;
        }

        let sigma1 = s[1] / s[0];
        let consistent = (1..2 * capacity - 1).all(|k| (sigma1 * s[k] + s[k + 1]).is_zero());
        if !consistent || sigma1.is_zero() {
            return uncorrectable;
        }
        Self {
            sigma: [sigma1, Gf16::ZERO, Gf16::ZERO],
            degree: 1,
        }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// `[1, σ1, σ2, σ3]`
    pub fn coefficients(&self) -> [Gf16; 4] {
        [Gf16::ONE, self.sigma[0], self.sigma[1], self.sigma[2]]
    }

    /// Locate the errors, or `None` when the polynomial does not split into
    /// distinct linear factors or a root falls beyond `max_position`.
    pub fn factorize(&self, max_position: usize) -> Option<ErrorPositions> {
        let [sigma1, sigma2, sigma3] = self.sigma;

        let positions: ErrorPositions = match self.degree {
            0 => SmallVec::new(),
            1 => smallvec![log_or_zero(sigma1)],
            2 => {
                let roots = QUADRATIC_ROOTS[table_index(sigma1, sigma2)]?;
                SmallVec::from_slice(&roots)
            }
            3 => {
                // x = y + σ1 removes the quadratic term
                let beta = sigma1 * sigma1 + sigma2;
                let gamma = sigma1 * sigma2 + sigma3;
                let roots = CUBIC_ROOTS[table_index(beta, gamma)]?;
                let mut positions = ErrorPositions::new();
                for y in roots {
                    positions.push((y + sigma1).log()? as u8);
                }
                positions
            }
            _ => return None,
        };

        positions
            .iter()
            .all(|&p| usize::from(p) <= max_position)
            .then_some(positions)
    }
}

/// Error magnitudes for located positions (Forney-free closed form)
pub fn error_values(positions: &[u8], s: &Syndromes) -> ErrorValues {
    match *positions {
        [] => SmallVec::new(),
        [p0] => smallvec![Gf16::exp(15 - usize::from(p0)) * s[0]],
        [p0, p1] => {
            let x0 = Gf16::exp(p0.into());
            let x1 = Gf16::exp(p1.into());
            let (x0sq, x1sq) = (x0 * x0, x1 * x1);
            let det = x0sq * x1 + x1sq * x0;
            smallvec![
                (x1sq * s[0] + x1 * s[1]) / det,
                (x0sq * s[0] + x0 * s[1]) / det,
            ]
        }
        [p0, p1, p2] => {
            let x = [Gf16::exp(p0.into()), Gf16::exp(p1.into()), Gf16::exp(p2.into())];
            let det = (x[1] + x[0]) * (x[2] + x[0]) * (x[2] + x[1]);
            (0..3)
                .map(|i| {
                    let (j, k) = match i {
                        0 => (1, 2),
                        1 => (0, 2),
                        _ => (0, 1),
                    };
                    let c0 = x[j] * x[k] * x[k] + x[k] * x[j] * x[j];
                    let c1 = x[k] * x[k] + x[j] * x[j];
                    let c2 = x[k] + x[j];
                    (c0 * s[0] + c1 * s[1] + c2 * s[2]) / det / x[i]
                })
                .collect()
        }
        _ => SmallVec::new(),
    }
}

/// Apply corrections to a codeword and return the number of flipped bits
pub fn apply_corrections(codeword: &mut [Gf16], positions: &[u8], values: &[Gf16]) -> u32 {
    positions
        .iter()
        .zip(values)
        .map(|(&p, &v)| {
            codeword[usize::from(p)] += v;
            v.bit_weight()
        })
        .sum()
}
