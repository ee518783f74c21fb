//! LLL (Lenstra-Lenstra-Lovász) lattice basis reduction
//!
//! Operates in place on an exact integer basis while the Gram-Schmidt
//! projection table is floating point. The table is recomputed after every
//! row mutation; at the lattice sizes this crate targets the quadratic
//! recompute cost is acceptable, and incremental updates are explicitly
//! out of scope.

use crate::core::error::{AttackError, Result};
use crate::core::matrix::IntMatrix;
use crate::core::types::{FloatOrthogonalizer, GramSchmidt, Orthogonalizer};
use rug::Integer;

// Epsilon absorbs float round-off in the Lovász comparison
const LOVASZ_EPS: f64 = 1e-10;

/// Parameters for LLL reduction
#[derive(Debug, Clone)]
pub struct LLLParams {
    /// Reduction parameter, must lie in (0.25, 1). The classical choice is
    /// 0.75; 0.99 yields better bases at the cost of more iterations.
    pub delta: f64,
    /// Iteration cap guarding against non-termination from float round-off
    pub max_iterations: usize,
}

impl Default for LLLParams {
    fn default() -> Self {
        LLLParams {
            delta: 0.99,
            max_iterations: 100_000,
        }
    }
}

impl LLLParams {
    /// Create parameters with a custom delta
    pub fn new(delta: f64) -> Self {
        LLLParams { delta, ..Default::default() }
    }

    /// Validate parameters before reduction starts
    pub fn validate(&self) -> Result<()> {
        if !(0.25 < self.delta && self.delta < 1.0) {
            return Err(AttackError::invalid_parameters(format!(
                "Delta must be in (0.25, 1.0), got {}",
                self.delta
            )));
        }
        if self.max_iterations == 0 {
            return Err(AttackError::invalid_parameters("max_iterations must be >= 1"));
        }
        Ok(())
    }
}

/// Counters describing one reduction run
#[derive(Debug, Clone, Default)]
pub struct LLLStatus {
    /// Number of size-reduction row operations performed
    pub size_reduction_count: usize,
    /// Number of swaps performed
    pub swap_count: usize,
    /// Total main-loop iterations
    pub total_iterations: usize,
}

/// LLL reducer with a pluggable orthogonalization backend
pub struct LLLReducer {
    params: LLLParams,
    orthogonalizer: Box<dyn Orthogonalizer>,
}

impl Default for LLLReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl LLLReducer {
    /// Create a reducer with default parameters and the f64 backend
    pub fn new() -> Self {
        Self::with_params(LLLParams::default())
    }

    /// Create a reducer with custom parameters
    pub fn with_params(params: LLLParams) -> Self {
        LLLReducer {
            params,
            orthogonalizer: Box::new(FloatOrthogonalizer),
        }
    }

    /// Replace the orthogonalization backend
    pub fn with_orthogonalizer(mut self, orthogonalizer: Box<dyn Orthogonalizer>) -> Self {
        self.orthogonalizer = orthogonalizer;
        self
    }

    /// Reduce the basis in place, returning run counters.
    ///
    /// Bases with fewer than two rows are returned unchanged; the lattice
    /// constructor treats that as a configuration error before reduction
    /// is ever attempted.
    pub fn reduce(&self, basis: &mut IntMatrix) -> Result<LLLStatus> {
        self.params.validate()?;

        let n = basis.rows();
        let mut status = LLLStatus::default();
        if n < 2 {
            return Ok(status);
        }

        let mut gs = self.orthogonalizer.decompose(basis)?;
        let mut k = 1;

        while k < n {
            status.total_iterations += 1;

            self.size_reduce(basis, &mut gs, k, &mut status)?;

            if self.check_lovasz_condition(&gs, k)? {
                k += 1;
            } else {
                basis.swap_rows(k - 1, k)?;
                status.swap_count += 1;
                gs = self.orthogonalizer.decompose(basis)?;
                k = std::cmp::max(k - 1, 1);
            }

            if status.total_iterations >= self.params.max_iterations {
                log::warn!(
                    "LLL reduction reached maximum iterations ({}) at k = {}",
                    self.params.max_iterations,
                    k
                );
                break;
            }
        }

        log::debug!(
            "LLL finished: {} iterations, {} swaps, {} size reductions",
            status.total_iterations,
            status.swap_count,
            status.size_reduction_count
        );

        Ok(status)
    }

    /// Size reduction of row k against rows k-1 down to 0
    fn size_reduce(
        &self,
        basis: &mut IntMatrix,
        gs: &mut GramSchmidt,
        k: usize,
        status: &mut LLLStatus,
    ) -> Result<()> {
        for j in (0..k).rev() {
            let mu_kj = gs
                .get_mu(k, j)
                .ok_or_else(|| AttackError::numerical_instability("Invalid mu index"))?;

            if mu_kj.abs() > 0.5 {
                let q = Integer::from_f64(mu_kj.round()).ok_or_else(|| {
                    AttackError::numerical_instability(
                        "Projection coefficient is not finite",
                    )
                })?;
                if !q.is_zero() {
                    basis.row_sub_scaled(k, j, &q)?;
                    status.size_reduction_count += 1;
                    *gs = self.orthogonalizer.decompose(basis)?;
                }
            }
        }
        Ok(())
    }

    /// Lovász condition: ||b*_k||^2 >= (delta - mu[k][k-1]^2) * ||b*_{k-1}||^2
    fn check_lovasz_condition(&self, gs: &GramSchmidt, k: usize) -> Result<bool> {
        if k == 0 || k >= gs.norm_squared.len() {
            return Ok(true);
        }

        let norm_k_sq = gs.norm_squared[k];
        let norm_km1_sq = gs.norm_squared[k - 1];
        let mu_k_km1 = gs
            .get_mu(k, k - 1)
            .ok_or_else(|| AttackError::numerical_instability("Invalid mu index for Lovász condition"))?;

        let rhs = (self.params.delta - mu_k_km1.powi(2)) * norm_km1_sq;
        Ok(norm_k_sq >= rhs - LOVASZ_EPS)
    }
}
