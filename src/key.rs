//! RSA key model: `PublicKey`, `PrivateKey`, key generation, and blinded
//! private-key operations.
//!
//! Private-key operations go through the CRT fast path
//! (`PrivateKey::crt_exponentiate`) and are blinded against timing side
//! channels by a cached, squared-on-each-use `(r, r_inv)` pair rather than
//! redrawing a fresh blinding factor on every call.

use std::sync::Mutex;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::error::{CryptoError, CryptoErrorKind, Result};
use crate::numtheory::{bit_size, byte_size, gcd, inverse};
use crate::primes::getprime;
use crate::randnum::randint;

/// The default public exponent used by key generation.
pub const DEFAULT_EXPONENT: u32 = 65537;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) n: BigUint,
    pub(crate) e: BigUint,
}

impl PublicKey {
    pub fn from_components(n: BigUint, e: BigUint) -> Result<Self> {
        if n.is_zero() || e <= BigUint::one() || e >= n {
            return Err(CryptoError::new(
                CryptoErrorKind::InvalidParameter,
                "public key modulus/exponent out of range",
            ));
        }
        Ok(PublicKey { n, e })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Byte length `k = ceil(bitlen(n) / 8)`.
    pub fn modulus_len(&self) -> usize {
        byte_size(&BigInt::from(self.n.clone())) as usize
    }

    /// RSAEP: the public encrypt primitive, `m^e mod n`.
    pub fn encrypt_int(&self, m: &BigUint) -> BigUint {
        m.modpow(&self.e, &self.n)
    }
}

/// Lazily-initialized, squared-on-each-use blinding factor pair, shared
/// mutably per key so two concurrent private operations on the same key
/// each observe a valid `(r, r_inv)` pair.
struct BlindingCache {
    pair: Option<(BigUint, BigUint)>,
}

impl BlindingCache {
    fn new() -> Self {
        BlindingCache { pair: None }
    }

    /// Returns the blinding pair to use for this call, and advances the
    /// cache to the squared pair for the next call. The mutex is held only
    /// for this bookkeeping step; the caller's modular exponentiation runs
    /// outside the lock.
    fn take_and_advance<R: RngCore + CryptoRng>(&mut self, n: &BigUint, rng: &mut R) -> (BigUint, BigUint) {
        if self.pair.is_none() {
            let one = BigUint::one();
            let n_minus_1 = n - &one;
            loop {
                let r = randint(rng, &n_minus_1).max(BigUint::from(2u32));
                if r >= *n {
                    continue;
                }
                if let Ok(r_inv) = inverse(&r, n) {
                    self.pair = Some((r, r_inv));
                    break;
                }
            }
        }

        let (r, r_inv) = self.pair.clone().expect("initialized above");
        let r_sq = (&r * &r) % n;
        let r_inv_sq = (&r_inv * &r_inv) % n;
        self.pair = Some((r_sq, r_inv_sq));

        (r, r_inv)
    }
}

/// Either half of a key pair, exposing the capability set the glossary
/// calls `AbstractKey` (modulus access, common sizing) without committing
/// to which concrete key is held.
pub enum KeyPair {
    Public(PublicKey),
    Private(PrivateKey),
}

impl KeyPair {
    pub fn n(&self) -> &BigUint {
        match self {
            KeyPair::Public(k) => k.n(),
            KeyPair::Private(k) => k.public_key().n(),
        }
    }

    pub fn modulus_len(&self) -> usize {
        match self {
            KeyPair::Public(k) => k.modulus_len(),
            KeyPair::Private(k) => k.modulus_len(),
        }
    }
}

pub struct PrivateKey {
    public: PublicKey,
    d: BigUint,
    p: BigUint,
    q: BigUint,
    exp1: BigUint,
    exp2: BigUint,
    coef: BigUint,
    blinding: Mutex<BlindingCache>,
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        PrivateKey {
            public: self.public.clone(),
            d: self.d.clone(),
            p: self.p.clone(),
            q: self.q.clone(),
            exp1: self.exp1.clone(),
            exp2: self.exp2.clone(),
            coef: self.coef.clone(),
            blinding: Mutex::new(BlindingCache::new()),
        }
    }
}

impl PrivateKey {
    /// Builds a private key from its raw PKCS#1 components, recomputing
    /// the CRT helpers if any of `exp1`/`exp2`/`coef` are not supplied.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> Result<Self> {
        let public = PublicKey::from_components(n, e)?;
        let one = BigUint::one();
        let exp1 = &d % (&p - &one);
        let exp2 = &d % (&q - &one);
        let coef = inverse(&(&q % &p), &p)?;

        Ok(PrivateKey {
            public,
            d,
            p,
            q,
            exp1,
            exp2,
            coef,
            blinding: Mutex::new(BlindingCache::new()),
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn modulus_len(&self) -> usize {
        self.public.modulus_len()
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }
    pub fn p(&self) -> &BigUint {
        &self.p
    }
    pub fn q(&self) -> &BigUint {
        &self.q
    }
    pub fn exp1(&self) -> &BigUint {
        &self.exp1
    }
    pub fn exp2(&self) -> &BigUint {
        &self.exp2
    }
    pub fn coef(&self) -> &BigUint {
        &self.coef
    }

    /// Validates the arithmetic invariants a freshly generated or freshly
    /// loaded key must satisfy: `p*q == n` and `d*e == 1 (mod (p-1)(q-1))`.
    pub fn is_valid(&self) -> Result<()> {
        if &self.p * &self.q != self.public.n {
            return Err(CryptoError::new(CryptoErrorKind::InvalidParameter, "p*q != n"));
        }

        let one = BigUint::one();
        let phi = (&self.p - &one) * (&self.q - &one);
        if (&self.d * &self.public.e) % &phi != one {
            return Err(CryptoError::new(
                CryptoErrorKind::InvalidParameter,
                "d*e is not congruent to 1 mod (p-1)(q-1)",
            ));
        }

        Ok(())
    }

    /// `x^d mod n` via the CRT fast path:
    /// `m1 = x^exp1 mod p`, `m2 = x^exp2 mod q`,
    /// `h = coef*(m1-m2) mod p`, result `= m2 + h*q`.
    fn crt_exponentiate(&self, x: &BigUint) -> BigUint {
        let m1 = x.modpow(&self.exp1, &self.p);
        let m2 = x.modpow(&self.exp2, &self.q);

        let p = BigInt::from(self.p.clone());
        let mut diff = (BigInt::from(m1) - BigInt::from(m2.clone())) % &p;
        if diff.is_negative() {
            diff += &p;
        }

        let mut h = (BigInt::from(self.coef.clone()) * diff) % &p;
        if h.is_negative() {
            h += &p;
        }
        let h = h.to_biguint().expect("non-negative by construction");

        m2 + h * &self.q
    }

    /// `x^d mod n`, blinded against timing side channels by a cached,
    /// squared-on-each-use `(r, r_inv)` pair.
    fn blinded_exponentiate<R: RngCore + CryptoRng>(&self, x: &BigUint, rng: &mut R) -> BigUint {
        let (r, r_inv) = self
            .blinding
            .lock()
            .expect("blinding cache mutex poisoned")
            .take_and_advance(&self.public.n, rng);

        let r_e = r.modpow(&self.public.e, &self.public.n);
        let blinded_x = (x * r_e) % &self.public.n;

        let m = self.crt_exponentiate(&blinded_x);
        (m * r_inv) % &self.public.n
    }

    /// RSADP, used by decryption. When `rng` is `Some`, the operation is
    /// blinded (recommended for any operation on attacker-influenced
    /// ciphertext).
    pub fn decrypt_int<R: RngCore + CryptoRng>(&self, c: &BigUint, rng: Option<&mut R>) -> Result<BigUint> {
        if c >= &self.public.n {
            return Err(CryptoError::new(
                CryptoErrorKind::InvalidParameter,
                "ciphertext integer is too large for the modulus",
            ));
        }

        Ok(match rng {
            Some(rng) => self.blinded_exponentiate(c, rng),
            None => self.crt_exponentiate(c),
        })
    }

    /// RSASP1, used by signing: the private-key encrypt primitive. Uses
    /// identical math to [`decrypt_int`] — both raise to `d` via CRT — but
    /// is named separately to match its call site (signing a DigestInfo,
    /// rather than decrypting ciphertext).
    pub fn blinded_encrypt_int<R: RngCore + CryptoRng>(&self, m: &BigUint, rng: &mut R) -> BigUint {
        self.blinded_exponentiate(m, rng)
    }

    /// Generates a 2-prime RSA key pair of the given bit size.
    ///
    /// `prime_test_rounds` is folded into [`crate::primes::rounds_for`]'s
    /// bitsize-calibrated schedule (extra rounds beyond the minimum are
    /// simply wasted work, never a correctness problem, so `rounds_for` is
    /// still consulted for the floor).
    pub fn generate<R: RngCore + CryptoRng>(nbits: u64, rng: &mut R) -> Result<PrivateKey> {
        if nbits < 16 {
            return Err(CryptoError::new(
                CryptoErrorKind::InvalidParameter,
                "key size is too small to hold the public exponent and padding",
            ));
        }

        let pbits = (nbits + 1) / 2;
        let qbits = nbits - pbits;
        let e = BigUint::from(DEFAULT_EXPONENT);
        let one = BigUint::one();

        loop {
            let p = getprime(rng, pbits);
            let mut q = getprime(rng, qbits);
            while q == p {
                q = getprime(rng, qbits);
            }

            let (p, q) = if p > q { (p, q) } else { (q, p) };

            let n = &p * &q;
            if bit_size(&BigInt::from(n.clone())) != nbits {
                // Product came up short a bit; redraw.
                continue;
            }

            let phi = (&p - &one) * (&q - &one);
            if gcd(&e, &phi) != one {
                continue;
            }

            let d = inverse(&e, &phi)?;
            return PrivateKey::from_components(n, e, d, p, q);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn small_key() -> PrivateKey {
        PrivateKey::generate(256, &mut OsRng).unwrap()
    }

    #[test]
    fn generated_key_satisfies_invariants() {
        let pk = small_key();
        pk.is_valid().unwrap();
        assert_eq!(bit_size(&BigInt::from(pk.public_key().n().clone())), 256);
        assert!(pk.p() > pk.q());
        assert_ne!(pk.p(), pk.q());
    }

    #[test]
    fn encrypt_decrypt_roundtrip_unblinded() {
        let pk = small_key();
        let m = BigUint::from(42u32);
        let c = pk.public_key().encrypt_int(&m);
        let m2 = pk.decrypt_int::<OsRng>(&c, None).unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn encrypt_decrypt_roundtrip_blinded() {
        let pk = small_key();
        let m = BigUint::from(42u32);
        let c = pk.public_key().encrypt_int(&m);
        let mut rng = OsRng;
        let m2 = pk.decrypt_int(&c, Some(&mut rng)).unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn blinded_encrypt_matches_decrypt_math() {
        let pk = small_key();
        let m = BigUint::from(7u32);
        let mut rng = OsRng;
        let s = pk.blinded_encrypt_int(&m, &mut rng);
        // verifying with the public key should recover m.
        let check = pk.public_key().encrypt_int(&s);
        assert_eq!(check, m);
    }

    #[test]
    fn repeated_blinding_uses_stay_correct() {
        let pk = small_key();
        let mut rng = OsRng;
        for i in 1..10u32 {
            let m = BigUint::from(i);
            let c = pk.public_key().encrypt_int(&m);
            let m2 = pk.decrypt_int(&c, Some(&mut rng)).unwrap();
            assert_eq!(m, m2);
        }
    }
}
