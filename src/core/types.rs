//! Shared value types: Gram-Schmidt tables, attack configuration, results

use crate::core::error::{AttackError, Result};
use crate::core::matrix::IntMatrix;
use rug::Integer;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Gram-Schmidt coefficients for an integer basis
///
/// Projection coefficients and norms are kept in floating point while the
/// basis itself stays exact. This is a deliberate precision/performance
/// trade-off inherited from the reference construction; at large bit
/// lengths it is a known source of rare reduction inaccuracy.
#[derive(Debug, Clone)]
pub struct GramSchmidt {
    /// Orthogonal vectors (b*_i)
    pub b_star: Vec<Vec<f64>>,
    /// Coefficients mu[i][j] = <b_i, b*_j> / ||b*_j||^2
    pub mu: Vec<Vec<f64>>,
    /// Squared norms of orthogonal vectors
    pub norm_squared: Vec<f64>,
}

impl GramSchmidt {
    /// Compute the decomposition of an integer basis
    pub fn from_basis(basis: &IntMatrix) -> Result<Self> {
        let b = basis.to_f64_rows();
        let n = b.len();
        let dim = b[0].len();

        let mut b_star: Vec<Vec<f64>> = Vec::with_capacity(n);
        let mut mu = vec![vec![0.0; n]; n];
        let mut norm_squared = Vec::with_capacity(n);

        for i in 0..n {
            let mut v = b[i].clone();
            for j in 0..i {
                let dot: f64 = (0..dim).map(|k| b[i][k] * b_star[j][k]).sum();
                // Zero-norm stars arise when the row count exceeds the rank;
                // project against nothing in that case.
                mu[i][j] = if norm_squared[j] != 0.0 { dot / norm_squared[j] } else { 0.0 };
                for k in 0..dim {
                    v[k] -= mu[i][j] * b_star[j][k];
                }
            }
            let norm_sq: f64 = v.iter().map(|x| x * x).sum();
            if !norm_sq.is_finite() {
                return Err(AttackError::numerical_instability(
                    "Basis entries exceed floating-point range during orthogonalization",
                ));
            }
            mu[i][i] = 1.0;
            norm_squared.push(norm_sq);
            b_star.push(v);
        }

        Ok(GramSchmidt { b_star, mu, norm_squared })
    }

    /// Get mu coefficient
    pub fn get_mu(&self, i: usize, j: usize) -> Option<f64> {
        self.mu.get(i).and_then(|row| row.get(j)).copied()
    }
}

/// Orthogonalization strategy behind the LLL reducer.
///
/// The shipped implementation is floating point; an exact-rational or
/// fixed-point backend can be substituted for higher reliability at
/// larger bit lengths without touching the reduction loop.
pub trait Orthogonalizer {
    fn decompose(&self, basis: &IntMatrix) -> Result<GramSchmidt>;
}

/// Default f64 Gram-Schmidt backend
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatOrthogonalizer;

impl Orthogonalizer for FloatOrthogonalizer {
    fn decompose(&self, basis: &IntMatrix) -> Result<GramSchmidt> {
        GramSchmidt::from_basis(basis)
    }
}

/// Configuration for one attack invocation
///
/// All knobs are per-call; no process-wide state exists, so every attempt
/// is independently reproducible and safely parallelizable.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Lattice dimension parameter (>= 1); higher improves success rate
    /// at the cost of a larger basis
    pub m: u32,
    /// Extra shift parameter (>= 0)
    pub t: u32,
    /// LLL reduction parameter, in (0.25, 1); 0.99 trades extra
    /// iterations for higher success probability
    pub lll_delta: f64,
    /// Cap on the integer root scan per candidate vector. A performance
    /// knob, not load-bearing for correctness.
    pub max_root_search: u64,
    /// How many of the shortest reduced vectors to examine
    pub candidate_limit: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        AttackConfig {
            m: 3,
            t: 2,
            lll_delta: 0.99,
            max_root_search: 10_000,
            candidate_limit: 10,
        }
    }
}

impl AttackConfig {
    /// Validate configuration before any lattice work begins
    pub fn validate(&self) -> Result<()> {
        if self.m < 1 {
            return Err(AttackError::invalid_parameters(format!(
                "Lattice parameter m must be >= 1, got {}",
                self.m
            )));
        }
        if !(0.25 < self.lll_delta && self.lll_delta < 1.0) {
            return Err(AttackError::invalid_parameters(format!(
                "LLL delta must be in (0.25, 1.0), got {}",
                self.lll_delta
            )));
        }
        if self.candidate_limit == 0 {
            return Err(AttackError::invalid_parameters(
                "candidate_limit must be >= 1",
            ));
        }
        Ok(())
    }

    /// Recommended (m, t) for a given prime factor bit length
    pub fn recommended_params(prime_bits: u32) -> (u32, u32) {
        if prime_bits <= 20 {
            (2, 1)
        } else if prime_bits <= 30 {
            (3, 2)
        } else {
            (4, 2)
        }
    }
}

fn serialize_opt_integer<S: Serializer>(
    value: &Option<Integer>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    value.as_ref().map(|v| v.to_string()).serialize(serializer)
}

fn serialize_duration_secs<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    value.as_secs_f64().serialize(serializer)
}

/// Outcome of one attack invocation, produced exactly once per run
#[derive(Debug, Clone, Serialize)]
pub struct AttackResult {
    /// Whether a verified root was recovered
    pub success: bool,
    /// Recovered unknown part of the private exponent
    #[serde(serialize_with = "serialize_opt_integer")]
    pub recovered_x: Option<Integer>,
    /// Wall time for the whole invocation
    #[serde(serialize_with = "serialize_duration_secs", rename = "elapsed_secs")]
    pub elapsed: Duration,
    /// Diagnostic text; non-empty on failure
    pub details: String,
}

impl AttackResult {
    pub fn success(x: Integer, elapsed: Duration) -> Self {
        let details = format!("Recovered x = {}", x);
        AttackResult {
            success: true,
            recovered_x: Some(x),
            elapsed,
            details,
        }
    }

    pub fn failure(details: impl Into<String>, elapsed: Duration) -> Self {
        AttackResult {
            success: false,
            recovered_x: None,
            elapsed,
            details: details.into(),
        }
    }
}

/// Generalized RSA parameters with modulus N = p^r * q^s
#[derive(Debug, Clone)]
pub struct RsaParameters {
    pub n: Integer,
    pub e: Integer,
    pub d: Integer,
    pub p: Integer,
    pub q: Integer,
    pub phi: Integer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gram_schmidt_orthogonality() {
        let basis = IntMatrix::new(vec![
            vec![Integer::from(2), Integer::from(1)],
            vec![Integer::from(1), Integer::from(2)],
        ])
        .unwrap();
        let gs = GramSchmidt::from_basis(&basis).unwrap();
        assert_eq!(gs.b_star.len(), 2);

        let dot: f64 = (0..2).map(|k| gs.b_star[0][k] * gs.b_star[1][k]).sum();
        assert!(dot.abs() < 1e-10);
        assert!((gs.norm_squared[0] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_gram_schmidt_rank_deficient() {
        // Second row is a multiple of the first; its star vector is zero
        let basis = IntMatrix::new(vec![
            vec![Integer::from(1), Integer::from(2)],
            vec![Integer::from(2), Integer::from(4)],
        ])
        .unwrap();
        let gs = GramSchmidt::from_basis(&basis).unwrap();
        assert!(gs.norm_squared[1] < 1e-10);
    }

    #[test]
    fn test_config_validation() {
        assert!(AttackConfig::default().validate().is_ok());

        let bad_m = AttackConfig { m: 0, ..AttackConfig::default() };
        assert!(bad_m.validate().is_err());

        let bad_delta = AttackConfig { lll_delta: 1.5, ..AttackConfig::default() };
        assert!(bad_delta.validate().is_err());

        let low_delta = AttackConfig { lll_delta: 0.2, ..AttackConfig::default() };
        assert!(low_delta.validate().is_err());
    }

    #[test]
    fn test_recommended_params() {
        assert_eq!(AttackConfig::recommended_params(16), (2, 1));
        assert_eq!(AttackConfig::recommended_params(25), (3, 2));
        assert_eq!(AttackConfig::recommended_params(48), (4, 2));
    }

    #[test]
    fn test_attack_result_serialization() {
        let result = AttackResult::success(Integer::from(42), Duration::from_millis(1500));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["recovered_x"], "42");
        assert!((json["elapsed_secs"].as_f64().unwrap() - 1.5).abs() < 1e-9);
    }
}
