//! Root extraction from reduced short vectors
//!
//! Rescales candidate rows back into integer polynomials, scans a bounded
//! integer range for roots, and re-verifies every claimed root against the
//! original congruence a*x + c ≡ 0 (mod M). A root of a reconstructed
//! polynomial that fails the independent modular check is a false positive
//! and is discarded, never returned.

use crate::core::matrix::IntMatrix;
use crate::core::polynomial::Polynomial;
use rug::ops::DivRounding;
use rug::Integer;

/// The congruence the recovered root must satisfy: a*x + c ≡ 0 (mod M).
/// For the MSB convention a = e and c = e*d0 - 1; for LSB the coefficient
/// absorbs the known-bit shift, a = e * 2^known_bits.
#[derive(Debug, Clone)]
pub struct TargetCongruence {
    pub a: Integer,
    pub c: Integer,
    pub modulus: Integer,
}

impl TargetCongruence {
    pub fn new(a: Integer, c: Integer, modulus: Integer) -> Self {
        TargetCongruence { a, c, modulus }
    }

    /// Exact check of the original modular relation
    pub fn holds_for(&self, x: &Integer) -> bool {
        let mut value = Integer::from(&self.a * x);
        value += &self.c;
        value.is_divisible(&self.modulus)
    }
}

/// Search the shortest reduced vectors for a verified root in
/// (-bound, 0) ∪ (0, bound).
///
/// `max_scan` caps the per-polynomial brute scan (a tunable performance
/// knob); `candidate_limit` bounds how many short vectors are examined,
/// since checking more than the first few is unproductive at this scale.
pub fn find_small_root(
    basis: &IntMatrix,
    bound: &Integer,
    congruence: &TargetCongruence,
    max_scan: u64,
    candidate_limit: usize,
) -> Option<Integer> {
    // Order rows by Euclidean norm, ascending, skipping zero rows
    let mut by_norm: Vec<(usize, f64)> = (0..basis.rows())
        .filter_map(|i| {
            let norm = basis.row_norm(i).ok()?;
            if norm > 0.0 {
                Some((i, norm))
            } else {
                None
            }
        })
        .collect();
    by_norm.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let scan_cap = bound.to_u64().map_or(max_scan, |b| b.min(max_scan));

    for &(row_idx, norm) in by_norm.iter().take(candidate_limit) {
        let poly = match unscale_row(basis, row_idx, bound) {
            Some(p) => p,
            None => continue,
        };
        log::trace!("Examining candidate row {} (norm {:.3e}): {}", row_idx, norm, poly);

        if let Some(x) = scan_for_root(&poly, bound, congruence, scan_cap) {
            log::debug!("Verified root x = {} from row {}", x, row_idx);
            return Some(x);
        }
    }

    None
}

/// Divide coefficient at degree d by bound^d, rebuilding the integer
/// polynomial. Floor division is acceptable here: only the root's
/// existence matters downstream, not exact coefficient recovery.
fn unscale_row(basis: &IntMatrix, row: usize, bound: &Integer) -> Option<Polynomial> {
    let entries = basis.row(row).ok()?;
    let mut coeffs = Vec::with_capacity(entries.len());
    let mut x_pow = Integer::from(1);
    for value in entries {
        coeffs.push(value.clone().div_floor(&x_pow));
        x_pow *= bound;
    }
    let poly = Polynomial::new(coeffs);
    if poly.is_zero() {
        None
    } else {
        Some(poly)
    }
}

/// Test integers in (0, cap) and (-cap, 0) for a root of the polynomial
/// that also satisfies the original congruence.
fn scan_for_root(
    poly: &Polynomial,
    bound: &Integer,
    congruence: &TargetCongruence,
    scan_cap: u64,
) -> Option<Integer> {
    for magnitude in 1..scan_cap {
        for x in [Integer::from(magnitude), -Integer::from(magnitude)] {
            if x.clone().abs() >= *bound {
                continue;
            }
            if !poly.evaluate(&x).is_zero() {
                continue;
            }
            if congruence.holds_for(&x) {
                return Some(x);
            }
            // Polynomial root that fails the modular check: false positive
            log::trace!("Discarding unverified root candidate x = {}", x);
        }
    }
    None
}
