//! Core module wiring: polynomials, matrices, errors, and shared types.

pub mod error;
pub mod matrix;
pub mod polynomial;
pub mod types;

// Re-export the most commonly used items so downstream code can simply import
// `crate::core::*` without having to juggle individual submodules.
pub use error::*;
pub use matrix::*;
pub use polynomial::*;
pub use types::*;
