//! Shift-polynomial lattice construction for Coppersmith's method
//!
//! Given the relinearized target f(x) = a*x + c with a small root modulo M,
//! builds the family g_{i,j}(x) = x^i * f(x)^j * M^(m-j) for all (i, j)
//! with 0 <= i, j <= m and i + j <= m + t, then assembles their scaled
//! coefficient vectors into an integer basis. A small combination of these
//! rows corresponds to a polynomial that has the same small root over the
//! integers, which is what makes the reduction step meaningful.

use crate::core::error::{AttackError, Result};
use crate::core::matrix::IntMatrix;
use crate::core::polynomial::Polynomial;
use rug::ops::Pow;
use rug::Integer;

/// Number of shift-polynomials generated for parameters (m, t)
pub fn shift_polynomial_count(m: u32, t: u32) -> usize {
    let mut count = 0usize;
    for j in 0..=m {
        for i in 0..=m {
            if i + j <= m + t {
                count += 1;
            }
        }
    }
    count
}

/// Lattice basis built from a shift-polynomial family
#[derive(Debug, Clone)]
pub struct ShiftPolynomialLattice {
    basis: IntMatrix,
    dimension: usize,
    max_degree: usize,
}

impl ShiftPolynomialLattice {
    /// Build the scaled lattice basis for f(x) = a*x + c modulo `modulus`,
    /// with `bound` the declared upper bound on the unknown root.
    pub fn build(
        a: &Integer,
        c: &Integer,
        modulus: &Integer,
        bound: &Integer,
        m: u32,
        t: u32,
    ) -> Result<Self> {
        if m < 1 {
            return Err(AttackError::invalid_parameters(format!(
                "Lattice parameter m must be >= 1, got {}",
                m
            )));
        }
        if modulus.is_zero() || *modulus < 0 {
            return Err(AttackError::invalid_parameters(
                "Congruence modulus must be positive",
            ));
        }
        if *bound < 1 {
            return Err(AttackError::invalid_parameters(
                "Root bound must be positive",
            ));
        }

        let f = Polynomial::new(vec![c.clone(), a.clone()]);

        // Precompute f^j and M^(m-j) once per j
        let mut f_powers = Vec::with_capacity(m as usize + 1);
        let mut f_pow = Polynomial::one();
        for _ in 0..=m {
            f_powers.push(f_pow.clone());
            f_pow = f_pow.mul(&f);
        }

        let mut shift_polys = Vec::new();
        for j in 0..=m {
            let mod_scale = modulus.clone().pow(m - j);
            for i in 0..=m {
                if i + j > m + t {
                    continue;
                }
                let g = Polynomial::x_power(i as usize)
                    .mul(&f_powers[j as usize])
                    .mul_scalar(&mod_scale);
                shift_polys.push(g);
            }
        }

        let dimension = shift_polys.len();
        if dimension < 2 {
            return Err(AttackError::invalid_parameters(format!(
                "Lattice dimension {} is too small for reduction; increase m or t",
                dimension
            )));
        }

        let max_degree = shift_polys.iter().map(|p| p.degree()).max().unwrap_or(0);
        let width = max_degree + 1;

        let rows: Vec<Vec<Integer>> = shift_polys
            .iter()
            .map(|p| p.scaled_row(bound, width))
            .collect();
        let basis = IntMatrix::new(rows)?;

        log::debug!(
            "Built shift-polynomial lattice: {} rows, max degree {}",
            dimension,
            max_degree
        );

        Ok(ShiftPolynomialLattice { basis, dimension, max_degree })
    }

    /// Number of rows (shift-polynomials)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Largest degree among the shift-polynomials
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Borrow the basis matrix
    pub fn basis(&self) -> &IntMatrix {
        &self.basis
    }

    /// Consume the lattice, yielding the basis for in-place reduction
    pub fn into_basis(self) -> IntMatrix {
        self.basis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_polynomial_count_enumeration() {
        // Direct enumeration of (i, j) pairs with 0 <= i, j <= m, i + j <= m + t
        for m in 1..=4u32 {
            for t in 0..=3u32 {
                let mut expected = 0;
                for j in 0..=m {
                    for i in 0..=m {
                        if i + j <= m + t {
                            expected += 1;
                        }
                    }
                }
                assert_eq!(shift_polynomial_count(m, t), expected);
            }
        }
        assert_eq!(shift_polynomial_count(2, 1), 8);
    }

    #[test]
    fn test_dimension_monotone_in_m_and_t() {
        for m in 1..=3u32 {
            for t in 0..=2u32 {
                assert!(shift_polynomial_count(m + 1, t) >= shift_polynomial_count(m, t));
                assert!(shift_polynomial_count(m, t + 1) >= shift_polynomial_count(m, t));
            }
        }
    }

    #[test]
    fn test_build_matches_count() {
        let lattice = ShiftPolynomialLattice::build(
            &Integer::from(17),
            &Integer::from(-1),
            &Integer::from(1000),
            &Integer::from(16),
            2,
            1,
        )
        .unwrap();
        assert_eq!(lattice.dimension(), shift_polynomial_count(2, 1));
        assert_eq!(lattice.basis().rows(), lattice.dimension());
        assert_eq!(lattice.basis().cols(), lattice.max_degree() + 1);
    }

    #[test]
    fn test_row_scaling() {
        // m = 1, t = 0, f(x) = 2x + 3 mod 10, bound 4.
        // j = 0: g = M = 10 (i = 0), g = 10x (i = 1); j = 1: g = f (i = 0).
        let lattice = ShiftPolynomialLattice::build(
            &Integer::from(2),
            &Integer::from(3),
            &Integer::from(10),
            &Integer::from(4),
            1,
            0,
        )
        .unwrap();
        let basis = lattice.basis();
        assert_eq!(basis.rows(), 3);
        // Row for g = 10: [10, 0]
        assert_eq!(basis.get(0, 0), Some(&Integer::from(10)));
        // Row for g = 10x: [0, 10 * 4]
        assert_eq!(basis.get(1, 1), Some(&Integer::from(40)));
        // Row for g = f = 3 + 2x: [3, 2 * 4]
        assert_eq!(basis.get(2, 0), Some(&Integer::from(3)));
        assert_eq!(basis.get(2, 1), Some(&Integer::from(8)));
    }

    #[test]
    fn test_invalid_m_rejected() {
        let err = ShiftPolynomialLattice::build(
            &Integer::from(3),
            &Integer::from(1),
            &Integer::from(100),
            &Integer::from(8),
            0,
            0,
        );
        assert!(err.is_err());
    }
}
