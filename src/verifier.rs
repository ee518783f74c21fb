//! Independent verification of recovered private keys
//!
//! Consumes a reconstructed private exponent and confirms it without
//! reference to the attack's internal state: the exact congruence
//! e*d ≡ 1 (mod M) plus an optional encrypt/decrypt round trip.

use rug::Integer;
use serde::Serialize;

/// Exact congruence check: e*d ≡ 1 (mod M)
pub fn verify_private_key(d: &Integer, e: &Integer, modulus: &Integer) -> bool {
    if modulus.is_zero() {
        return false;
    }
    let value = Integer::from(e * d) - 1u32;
    value.is_divisible(modulus)
}

/// Encrypt with (e, n), decrypt with d, compare against the test message
pub fn verify_roundtrip(d: &Integer, e: &Integer, n: &Integer, test_message: &Integer) -> bool {
    if *n < 2 || test_message >= n {
        return false;
    }
    let ciphertext = match test_message.clone().pow_mod(e, n) {
        Ok(c) => c,
        Err(_) => return false,
    };
    match ciphertext.pow_mod(d, n) {
        Ok(decrypted) => decrypted == *test_message,
        Err(_) => false,
    }
}

/// Combined verification outcome
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// Recovered exponent equals the reference one (when known)
    pub key_match: Option<bool>,
    /// e*d ≡ 1 (mod M) holds exactly
    pub congruence_ok: bool,
    /// Encrypt/decrypt round trip succeeded
    pub roundtrip_ok: bool,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.key_match.unwrap_or(true) && self.congruence_ok && self.roundtrip_ok
    }
}

/// Full verification of a recovered exponent. `d_true` is optional test
/// knowledge; the congruence and round-trip checks stand on their own.
pub fn full_verification(
    d_true: Option<&Integer>,
    d_recovered: &Integer,
    e: &Integer,
    n: &Integer,
    modulus: &Integer,
    test_message: &Integer,
) -> VerificationReport {
    VerificationReport {
        key_match: d_true.map(|d| d == d_recovered),
        congruence_ok: verify_private_key(d_recovered, e, modulus),
        roundtrip_ok: verify_roundtrip(d_recovered, e, n, test_message),
    }
}
