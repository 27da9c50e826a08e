//! Number theory primitives: bit/byte sizing, extended Euclid, modular
//! inverse, and Chinese Remainder reconstruction.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::error::{CryptoError, Result};

/// Number of bits needed to represent `|x|`, excluding any leading zero
/// bits. `bit_size(0) == 0`.
pub fn bit_size(x: &BigInt) -> u64 {
    x.bits()
}

/// `ceil(bit_size(x) / 8)`.
pub fn byte_size(x: &BigInt) -> u64 {
    (bit_size(x) + 7) / 8
}

/// Greatest common divisor of two non-negative integers, via the classical
/// Euclidean algorithm.
pub fn gcd(p: &BigUint, q: &BigUint) -> BigUint {
    let (mut p, mut q) = (p.clone(), q.clone());
    while !q.is_zero() {
        let r = &p % &q;
        p = q;
        q = r;
    }
    p
}

/// `true` iff `gcd(a, b) == 1`.
pub fn are_relatively_prime(a: &BigUint, b: &BigUint) -> bool {
    gcd(a, b) == BigUint::one()
}

/// Returns `(g, u, v)` with `g = gcd(a, b) = u*a + v*b`, using the iterative
/// coefficient-track recurrence.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut a, mut b) = (a.clone(), b.clone());
    let (mut x, mut lastx) = (BigInt::zero(), BigInt::one());
    let (mut y, mut lasty) = (BigInt::one(), BigInt::zero());

    while !b.is_zero() {
        let q = &a / &b;
        let r = &a % &b;
        a = b;
        b = r;

        let new_x = &lastx - &q * &x;
        lastx = x;
        x = new_x;

        let new_y = &lasty - &q * &y;
        lasty = y;
        y = new_y;
    }

    (a, lastx, lasty)
}

/// Returns `x^-1 mod n` in the canonical range `[0, n)`.
///
/// Fails with [`CryptoErrorKind::NotRelativePrime`] when `gcd(x, n) != 1`.
pub fn inverse(x: &BigUint, n: &BigUint) -> Result<BigUint> {
    let (xb, nb) = (BigInt::from(x.clone()), BigInt::from(n.clone()));
    let (g, a, _) = extended_gcd(&xb, &nb);

    if g != BigInt::one() && g != -BigInt::one() {
        let d = if g.is_negative() { -g } else { g };
        return Err(CryptoError::not_relative_prime(
            x.clone(),
            n.clone(),
            d.to_biguint().unwrap_or_else(BigUint::zero),
        ));
    }

    let a = a.mod_floor_euclid(&nb);
    Ok(a.to_biguint().expect("euclidean remainder is non-negative"))
}

/// Chinese Remainder reconstruction: the unique `x` in `[0, prod(moduli))`
/// with `x == residues[i] (mod moduli[i])` for every `i`. Assumes the
/// moduli are pairwise coprime; this is not verified.
pub fn crt(residues: &[BigUint], moduli: &[BigUint]) -> Result<BigUint> {
    let prod = moduli.iter().fold(BigUint::one(), |acc, m| acc * m);

    let mut total = BigUint::zero();
    for (a_i, m_i) in residues.iter().zip(moduli.iter()) {
        let p = &prod / m_i;
        let p_inv = inverse(&p, m_i)?;
        total += a_i * p_inv * &p;
    }

    Ok(total % prod)
}

/// Small helper trait so `inverse` can fold a possibly-negative `BigInt`
/// into the canonical non-negative residue without pulling in `num::Integer`
/// for a single call site.
trait ModFloorEuclid {
    fn mod_floor_euclid(&self, n: &BigInt) -> BigInt;
}

impl ModFloorEuclid for BigInt {
    fn mod_floor_euclid(&self, n: &BigInt) -> BigInt {
        let r = self % n;
        if r.is_negative() {
            r + n
        } else {
            r
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bu(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn bi(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn bit_size_scenarios() {
        assert_eq!(bit_size(&bi(1023)), 10);
        assert_eq!(bit_size(&bi(1024)), 11);
        assert_eq!(bit_size(&bi(1025)), 11);
        assert_eq!(bit_size(&BigInt::zero()), 0);
    }

    #[test]
    fn byte_size_scenarios() {
        assert_eq!(byte_size(&(BigInt::one() << 1023)), 128);
        assert_eq!(byte_size(&(BigInt::one() << 1024)), 129);
    }

    #[test]
    fn gcd_scenario() {
        assert_eq!(gcd(&bu(48), &bu(180)), bu(12));
    }

    #[test]
    fn relatively_prime_scenarios() {
        assert!(are_relatively_prime(&bu(2), &bu(3)));
        assert!(!are_relatively_prime(&bu(2), &bu(4)));
    }

    #[test]
    fn inverse_scenarios() {
        assert_eq!(inverse(&bu(7), &bu(4)).unwrap(), bu(3));
        let inv = inverse(&bu(143), &bu(4)).unwrap();
        assert_eq!((&inv * bu(143)) % bu(4), BigUint::one());
    }

    #[test]
    fn inverse_not_coprime_fails() {
        let err = inverse(&bu(2), &bu(4)).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::CryptoErrorKind::NotRelativePrime { .. }
        ));
    }

    #[test]
    fn crt_scenarios() {
        assert_eq!(crt(&[bu(2), bu(3)], &[bu(3), bu(5)]).unwrap(), bu(8));
        assert_eq!(
            crt(&[bu(2), bu(3), bu(2)], &[bu(3), bu(5), bu(7)]).unwrap(),
            bu(23)
        );
        assert_eq!(
            crt(&[bu(2), bu(3), bu(0)], &[bu(7), bu(11), bu(15)]).unwrap(),
            bu(135)
        );
    }
}
