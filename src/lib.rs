//! Partial key exposure attack engine for generalized RSA moduli
//!
//! Recovers RSA private exponents from partial exposure (known MSBs or
//! LSBs of d) using Coppersmith's method: shift-polynomial lattice
//! construction, LLL reduction, and verified small-root extraction. Works
//! with generalized moduli N = p^r * q^s as well as standard RSA, and
//! ships a multithreaded brute-force fallback for baselines.
//!
//! # Examples
//!
//! Shift-polynomial lattice dimensions:
//! ```rust
//! use partial_key_solver::lattice::shift_polynomial_count;
//!
//! assert_eq!(shift_polynomial_count(2, 1), 8);
//! assert_eq!(shift_polynomial_count(3, 2), 15);
//! ```
//!
//! Polynomial arithmetic underlying the lattice rows:
//! ```rust
//! use partial_key_solver::Polynomial;
//! use rug::Integer;
//!
//! // f(x) = 3x + 2, f(x)^2 = 9x^2 + 12x + 4
//! let f = Polynomial::new(vec![Integer::from(2), Integer::from(3)]);
//! let f2 = f.pow(2);
//! assert_eq!(f2.coeff(0), Integer::from(4));
//! assert_eq!(f2.coeff(1), Integer::from(12));
//! assert_eq!(f2.coeff(2), Integer::from(9));
//! ```
//!
//! End-to-end attack on a simulated exposure:
//! ```rust,no_run
//! use partial_key_solver::{
//!     keygen, exposure, AttackConfig, CoppersmithAttack, ExposureType,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = keygen::generate_standard_rsa(64, Some(42))?;
//! let exp = exposure::simulate_exposure(&key.d, 0.8, ExposureType::Msb)?;
//!
//! let attack = CoppersmithAttack::new(
//!     key.n.clone(),
//!     key.e.clone(),
//!     key.phi.clone(),
//!     exp.d0.clone(),
//!     exp.bound.clone(),
//!     AttackConfig::default(),
//! );
//! let result = attack.run();
//! println!("success: {}", result.success);
//! # Ok(())
//! # }
//! ```

pub mod attack;
pub mod brute_force;
pub mod core;
pub mod exposure;
pub mod keygen;
pub mod lattice;
pub mod lll;
pub mod roots;
pub mod verifier;

pub use attack::CoppersmithAttack;
pub use brute_force::{BruteForceParams, BruteForceSearch};
pub use self::core::error::{AttackError, Result};
pub use self::core::matrix::IntMatrix;
pub use self::core::polynomial::Polynomial;
pub use self::core::types::{AttackConfig, AttackResult, RsaParameters};
pub use exposure::{Exposure, ExposureType};
pub use lattice::ShiftPolynomialLattice;
pub use lll::{LLLParams, LLLReducer, LLLStatus};
pub use roots::TargetCongruence;
