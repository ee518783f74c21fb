//! Exact-integer univariate polynomials
//!
//! Coefficient index equals degree; index 0 is the constant term. All
//! operations return new instances, there is no shared mutable state.

use rug::Integer;

/// Univariate polynomial with arbitrary-precision integer coefficients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<Integer>,
}

impl Polynomial {
    /// Create a polynomial from coefficients, trimming trailing zeros
    pub fn new(mut coeffs: Vec<Integer>) -> Self {
        while coeffs.len() > 1 && coeffs.last().map(|c| c.is_zero()).unwrap_or(false) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(Integer::new());
        }
        Polynomial { coeffs }
    }

    /// The constant polynomial with the given value
    pub fn constant(value: Integer) -> Self {
        Polynomial { coeffs: vec![value] }
    }

    /// The multiplicative identity polynomial [1]
    pub fn one() -> Self {
        Polynomial::constant(Integer::from(1))
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Polynomial::constant(Integer::new())
    }

    /// The monomial x^degree
    pub fn x_power(degree: usize) -> Self {
        let mut coeffs = vec![Integer::new(); degree + 1];
        coeffs[degree] = Integer::from(1);
        Polynomial { coeffs }
    }

    /// Degree of the polynomial (the zero polynomial has degree 0)
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient at the given degree, zero beyond the stored length
    pub fn coeff(&self, degree: usize) -> Integer {
        self.coeffs.get(degree).cloned().unwrap_or_default()
    }

    /// All stored coefficients, constant term first
    pub fn coeffs(&self) -> &[Integer] {
        &self.coeffs
    }

    /// True if this is the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Evaluate at x using Horner's scheme
    pub fn evaluate(&self, x: &Integer) -> Integer {
        let mut result = Integer::new();
        for coeff in self.coeffs.iter().rev() {
            result *= x;
            result += coeff;
        }
        result
    }

    /// Polynomial multiplication by full coefficient convolution
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![Integer::new(); self.degree() + other.degree() + 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += Integer::from(a * b);
            }
        }
        Polynomial::new(coeffs)
    }

    /// Multiply every coefficient by an integer scalar
    pub fn mul_scalar(&self, scalar: &Integer) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|c| Integer::from(c * scalar)).collect())
    }

    /// Raise to a nonnegative integer power by repeated multiplication
    pub fn pow(&self, exponent: u32) -> Polynomial {
        let mut result = Polynomial::one();
        for _ in 0..exponent {
            result = result.mul(self);
        }
        result
    }

    /// Coefficient vector scaled by bound^degree, padded to `width` columns.
    ///
    /// This is the bridge between the algebraic and geometric views: after
    /// scaling, a polynomial with small coefficients relative to the bound
    /// becomes a short lattice vector.
    pub fn scaled_row(&self, bound: &Integer, width: usize) -> Vec<Integer> {
        let mut row = vec![Integer::new(); width];
        let mut x_pow = Integer::from(1);
        for (deg, coeff) in self.coeffs.iter().enumerate() {
            if deg >= width {
                break;
            }
            row[deg] = Integer::from(coeff * &x_pow);
            x_pow *= bound;
        }
        row
    }
}

impl std::fmt::Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut terms = Vec::new();
        for (i, coeff) in self.coeffs.iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }
            match i {
                0 => terms.push(coeff.to_string()),
                1 => terms.push(format!("{}x", coeff)),
                _ => terms.push(format!("{}x^{}", coeff, i)),
            }
        }
        if terms.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", terms.join(" + "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[i64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| Integer::from(c)).collect())
    }

    #[test]
    fn test_evaluate_horner() {
        // 3 + 2x + x^2 at x = 5 -> 3 + 10 + 25 = 38
        let p = poly(&[3, 2, 1]);
        assert_eq!(p.evaluate(&Integer::from(5)), 38);
        assert_eq!(p.evaluate(&Integer::from(-5)), 18);
    }

    #[test]
    fn test_multiplication_convolution() {
        // (1 + x)(1 - x) = 1 - x^2
        let a = poly(&[1, 1]);
        let b = poly(&[1, -1]);
        let c = a.mul(&b);
        assert_eq!(c, poly(&[1, 0, -1]));
        assert_eq!(c.degree(), 2);
    }

    #[test]
    fn test_power_zero_is_identity() {
        let p = poly(&[7, 3, 2]);
        assert_eq!(p.pow(0), Polynomial::one());
    }

    #[test]
    fn test_multiply_by_identity_preserves_coeffs() {
        let p = poly(&[4, 0, 9]);
        assert_eq!(p.mul(&Polynomial::one()), p);
    }

    #[test]
    fn test_trailing_zeros_trimmed() {
        let p = Polynomial::new(vec![Integer::from(2), Integer::new(), Integer::new()]);
        assert_eq!(p.degree(), 0);
        assert_eq!(p.coeff(2), 0);
    }

    #[test]
    fn test_scaled_row() {
        // 5 + 3x with bound 4: [5, 12], padded to width 3
        let p = poly(&[5, 3]);
        let row = p.scaled_row(&Integer::from(4), 3);
        assert_eq!(row, vec![Integer::from(5), Integer::from(12), Integer::new()]);
    }

    #[test]
    fn test_display() {
        assert_eq!(poly(&[1, 0, 2]).to_string(), "1 + 2x^2");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }
}
