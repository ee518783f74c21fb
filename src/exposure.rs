//! MSB/LSB exposure model
//!
//! Carves a known/unknown bit split out of a private exponent for
//! simulated exposure scenarios, and maps a recovered unknown part back
//! into the full exponent.

use crate::core::error::{AttackError, Result};
use rug::Integer;
use serde::Serialize;

/// Which contiguous bit range of the private exponent is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureType {
    /// Most significant bits known: d = d0 + x
    Msb,
    /// Least significant bits known: d = (x << known_bits) + d0
    Lsb,
}

impl std::fmt::Display for ExposureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExposureType::Msb => write!(f, "MSB"),
            ExposureType::Lsb => write!(f, "LSB"),
        }
    }
}

/// A simulated partial exposure of a private exponent
#[derive(Debug, Clone)]
pub struct Exposure {
    /// Known part of the private exponent
    pub d0: Integer,
    /// True unknown part (test-only knowledge, not available to an attacker)
    pub x_true: Integer,
    /// Upper bound on the unknown part: 2^unknown_bits
    pub bound: Integer,
    pub exposure_type: ExposureType,
    pub known_bits: u32,
    pub unknown_bits: u32,
}

impl Exposure {
    /// Check that d0 and x_true reconstruct the original exponent
    pub fn verify_reconstruction(&self, d: &Integer) -> bool {
        recover_private_key(&self.d0, &self.x_true, self.exposure_type, self.known_bits) == *d
    }
}

/// Simulate a partial key exposure: `ratio` is the fraction of bits known.
pub fn simulate_exposure(d: &Integer, ratio: f64, exposure_type: ExposureType) -> Result<Exposure> {
    if !(0.0 < ratio && ratio < 1.0) {
        return Err(AttackError::invalid_parameters(format!(
            "Exposure ratio must be in (0, 1), got {}",
            ratio
        )));
    }
    if *d < 1 {
        return Err(AttackError::invalid_parameters(
            "Private exponent must be positive",
        ));
    }

    let d_bits = d.significant_bits();
    let known_bits = (d_bits as f64 * ratio) as u32;
    let unknown_bits = d_bits - known_bits;

    let (d0, x_true) = match exposure_type {
        ExposureType::Msb => {
            // High bits in place, low bits cleared
            let d0 = Integer::from(d >> unknown_bits) << unknown_bits;
            let x_true = Integer::from(d - &d0);
            (d0, x_true)
        }
        ExposureType::Lsb => {
            let mask = (Integer::from(1) << known_bits) - 1u32;
            let d0 = Integer::from(d & &mask);
            let x_true = Integer::from(d - &d0) >> known_bits;
            (d0, x_true)
        }
    };

    Ok(Exposure {
        d0,
        x_true,
        bound: Integer::from(1) << unknown_bits,
        exposure_type,
        known_bits,
        unknown_bits,
    })
}

/// Reconstruct the full private exponent from the known part and the
/// recovered unknown part.
pub fn recover_private_key(
    d0: &Integer,
    x: &Integer,
    exposure_type: ExposureType,
    known_bits: u32,
) -> Integer {
    match exposure_type {
        ExposureType::Msb => Integer::from(d0 + x),
        ExposureType::Lsb => (x.clone() << known_bits) + d0,
    }
}
