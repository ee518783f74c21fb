//! Attack orchestrator
//!
//! Sequences lattice construction, LLL reduction, and root extraction,
//! measuring wall time around the whole pipeline. Internal configuration
//! failures are captured as diagnostics in the result rather than
//! propagated as crashes.

use crate::core::error::Result;
use crate::core::types::{AttackConfig, AttackResult};
use crate::exposure::ExposureType;
use crate::lattice::ShiftPolynomialLattice;
use crate::lll::{LLLParams, LLLReducer};
use crate::roots::{self, TargetCongruence};
use crate::verifier;
use rug::Integer;
use std::time::Instant;

/// Coppersmith-style partial key exposure attack
///
/// Given the public key (N, e), the congruence modulus M (typically φ(N)),
/// the known part d0 of the private exponent, and a bound X on the unknown
/// part, attempts to recover the unknown part through lattice reduction.
/// Recovery is probabilistic: when the true unknown part exceeds the
/// effective bound the chosen (m, t) can resolve, the attack reports a
/// normal negative result, not an error.
pub struct CoppersmithAttack {
    n: Integer,
    e: Integer,
    modulus: Integer,
    d0: Integer,
    bound: Integer,
    exposure_type: ExposureType,
    known_bits: u32,
    config: AttackConfig,
}

impl CoppersmithAttack {
    /// Create an attack for the MSB convention (d = d0 + x)
    pub fn new(
        n: Integer,
        e: Integer,
        modulus: Integer,
        d0: Integer,
        bound: Integer,
        config: AttackConfig,
    ) -> Self {
        CoppersmithAttack {
            n,
            e,
            modulus,
            d0,
            bound,
            exposure_type: ExposureType::Msb,
            known_bits: 0,
            config,
        }
    }

    /// Switch to a specific exposure convention. For LSB the target
    /// polynomial absorbs the known-bit shift, so the same univariate
    /// machinery covers both conventions.
    pub fn with_exposure(mut self, exposure_type: ExposureType, known_bits: u32) -> Self {
        self.exposure_type = exposure_type;
        self.known_bits = known_bits;
        self
    }

    /// The congruence the recovered root must satisfy
    fn congruence(&self) -> TargetCongruence {
        let a = match self.exposure_type {
            ExposureType::Msb => self.e.clone(),
            ExposureType::Lsb => self.e.clone() << self.known_bits,
        };
        let c = Integer::from(&self.e * &self.d0) - 1u32;
        TargetCongruence::new(a, c, self.modulus.clone())
    }

    /// Execute the attack, capturing any internal failure as a diagnostic
    pub fn run(&self) -> AttackResult {
        let start = Instant::now();
        match self.execute() {
            Ok(Some(x)) => AttackResult::success(x, start.elapsed()),
            Ok(None) => AttackResult::failure(
                "No valid root found within the examined short vectors; the unknown \
                 part may exceed the effective bound for the chosen (m, t)",
                start.elapsed(),
            ),
            Err(e) => AttackResult::failure(e.to_string(), start.elapsed()),
        }
    }

    fn execute(&self) -> Result<Option<Integer>> {
        self.config.validate()?;

        let congruence = self.congruence();
        log::info!(
            "Coppersmith attack: {} exposure, m = {}, t = {}, bound 2^{}",
            self.exposure_type,
            self.config.m,
            self.config.t,
            self.bound.significant_bits().saturating_sub(1)
        );

        let lattice = ShiftPolynomialLattice::build(
            &congruence.a,
            &congruence.c,
            &self.modulus,
            &self.bound,
            self.config.m,
            self.config.t,
        )?;
        log::debug!(
            "Lattice dimension {} ({} columns)",
            lattice.dimension(),
            lattice.max_degree() + 1
        );

        let mut basis = lattice.into_basis();
        let reducer = LLLReducer::with_params(LLLParams::new(self.config.lll_delta));
        let status = reducer.reduce(&mut basis)?;
        log::debug!(
            "Reduction complete after {} iterations ({} swaps)",
            status.total_iterations,
            status.swap_count
        );

        Ok(roots::find_small_root(
            &basis,
            &self.bound,
            &congruence,
            self.config.max_root_search,
            self.config.candidate_limit,
        ))
    }

    /// Confirm a reconstructed private exponent against this attack's
    /// public parameters: the exact congruence plus an encrypt/decrypt
    /// round trip on a test message.
    pub fn verify(&self, d_recovered: &Integer, test_message: &Integer) -> bool {
        verifier::verify_private_key(d_recovered, &self.e, &self.modulus)
            && verifier::verify_roundtrip(d_recovered, &self.e, &self.n, test_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_becomes_diagnostic() {
        let attack = CoppersmithAttack::new(
            Integer::from(77),
            Integer::from(7),
            Integer::from(60),
            Integer::from(0),
            Integer::from(16),
            AttackConfig { m: 0, ..AttackConfig::default() },
        );
        let result = attack.run();
        assert!(!result.success);
        assert!(result.recovered_x.is_none());
        assert!(result.details.contains("m must be >= 1"));
    }

    #[test]
    fn test_bad_delta_becomes_diagnostic() {
        let attack = CoppersmithAttack::new(
            Integer::from(77),
            Integer::from(7),
            Integer::from(60),
            Integer::from(0),
            Integer::from(16),
            AttackConfig { lll_delta: 1.2, ..AttackConfig::default() },
        );
        let result = attack.run();
        assert!(!result.success);
        assert!(result.details.contains("Delta") || result.details.contains("delta"));
    }

    #[test]
    fn test_lsb_congruence_absorbs_shift() {
        let attack = CoppersmithAttack::new(
            Integer::from(77),
            Integer::from(7),
            Integer::from(60),
            Integer::from(5),
            Integer::from(16),
            AttackConfig::default(),
        )
        .with_exposure(ExposureType::Lsb, 4);
        let congruence = attack.congruence();
        assert_eq!(congruence.a, Integer::from(7 << 4));
        assert_eq!(congruence.c, Integer::from(7 * 5 - 1));
    }
}
