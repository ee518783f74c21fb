//! Generalized RSA key generation for N = p^r * q^s
//!
//! Test-oriented key material: primes are generated with GMP's
//! probabilistic primality test, and an optional seed makes a whole key
//! reproducible. Not hardened for production use.

use crate::core::error::{AttackError, Result};
use crate::core::types::RsaParameters;
use rug::rand::RandState;
use rug::{Complete, Integer};

const MILLER_RABIN_REPS: u32 = 40;
const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

/// Generate key material for a generalized modulus N = p^r * q^s.
///
/// `bit_length` is the size of each prime factor. With `seed` supplied the
/// output is fully deterministic.
pub fn generate_generalized_rsa(
    bit_length: u32,
    r: u32,
    s: u32,
    seed: Option<u64>,
) -> Result<RsaParameters> {
    if bit_length < 8 {
        return Err(AttackError::invalid_parameters(format!(
            "Prime bit length must be at least 8, got {}",
            bit_length
        )));
    }
    if r < 1 || s < 1 {
        return Err(AttackError::invalid_parameters(
            "Multiplicities r and s must be at least 1",
        ));
    }

    let mut rng = RandState::new();
    if let Some(seed) = seed {
        rng.seed(&Integer::from(seed));
    }

    let p = random_prime(&mut rng, bit_length);
    let mut q = random_prime(&mut rng, bit_length);
    while q == p {
        q = random_prime(&mut rng, bit_length);
    }

    let n = compose_modulus(&p, &q, r, s);

    // phi(p^r * q^s) = p^(r-1) (p-1) q^(s-1) (q-1)
    let mut phi = pow_integer(&p, r - 1) * pow_integer(&q, s - 1);
    phi *= (&p - 1u32).complete();
    phi *= (&q - 1u32).complete();

    let e = choose_public_exponent(&phi);
    let d = e
        .clone()
        .invert(&phi)
        .map_err(|_| AttackError::custom("Public exponent not invertible modulo phi"))?;

    log::debug!(
        "Generated key: |p| = {} bits, |q| = {} bits, |N| = {} bits, |d| = {} bits",
        p.significant_bits(),
        q.significant_bits(),
        n.significant_bits(),
        d.significant_bits()
    );

    Ok(RsaParameters { n, e, d, p, q, phi })
}

/// Standard RSA (r = s = 1) convenience wrapper
pub fn generate_standard_rsa(bit_length: u32, seed: Option<u64>) -> Result<RsaParameters> {
    generate_generalized_rsa(bit_length, 1, 1, seed)
}

fn random_prime(rng: &mut RandState<'_>, bits: u32) -> Integer {
    loop {
        let mut candidate = Integer::from(Integer::random_bits(bits, rng));
        // Force exact bit length and oddness
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if candidate.is_probably_prime(MILLER_RABIN_REPS) != rug::integer::IsPrime::No {
            return candidate;
        }
    }
}

fn compose_modulus(p: &Integer, q: &Integer, r: u32, s: u32) -> Integer {
    pow_integer(p, r) * pow_integer(q, s)
}

fn pow_integer(base: &Integer, exp: u32) -> Integer {
    use rug::ops::Pow;
    base.clone().pow(exp)
}

fn choose_public_exponent(phi: &Integer) -> Integer {
    let mut e = Integer::from(DEFAULT_PUBLIC_EXPONENT);
    while Integer::from(e.gcd_ref(phi)) != 1 {
        e += 2u32;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_key_is_consistent() {
        let key = generate_standard_rsa(32, Some(42)).unwrap();
        assert_eq!(key.n, Integer::from(&key.p * &key.q));
        // e*d ≡ 1 (mod phi)
        let value = Integer::from(&key.e * &key.d) - 1u32;
        assert!(value.is_divisible(&key.phi));
    }

    #[test]
    fn test_generalized_modulus_shape() {
        let key = generate_generalized_rsa(16, 2, 1, Some(7)).unwrap();
        let expected = Integer::from(&key.p * &key.p) * &key.q;
        assert_eq!(key.n, expected);
        assert!(key.n.is_divisible(&Integer::from(&key.p * &key.p)));
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_standard_rsa(24, Some(1234)).unwrap();
        let b = generate_standard_rsa(24, Some(1234)).unwrap();
        assert_eq!(a.n, b.n);
        assert_eq!(a.d, b.d);
    }

    #[test]
    fn test_distinct_seeds_differ() {
        let a = generate_standard_rsa(24, Some(1)).unwrap();
        let b = generate_standard_rsa(24, Some(2)).unwrap();
        assert_ne!(a.n, b.n);
    }

    #[test]
    fn test_rejects_tiny_primes_and_zero_multiplicity() {
        assert!(generate_standard_rsa(4, None).is_err());
        assert!(generate_generalized_rsa(16, 0, 1, None).is_err());
    }

    #[test]
    fn test_roundtrip_with_generated_key() {
        let key = generate_standard_rsa(32, Some(99)).unwrap();
        let message = Integer::from(123456u32);
        let ciphertext = message.clone().pow_mod(&key.e, &key.n).unwrap();
        let decrypted = ciphertext.pow_mod(&key.d, &key.n).unwrap();
        assert_eq!(decrypted, message);
    }
}
