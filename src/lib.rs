//! A pure-arithmetic RSA PKCS#1 v1.5 cryptography library: big-integer
//! modular arithmetic, Miller-Rabin key generation, PKCS#1 v1.5
//! encrypt/decrypt/sign/verify with blinded private-key operations, MGF1,
//! and ASN.1 DER / PEM key serialization.
//!
//! Modules are split one file per concern (key model, number theory, padding,
//! DER/PEM encoding, digests) and sit flat at the crate root, since this
//! crate implements a single algorithm family rather than a multi-cipher
//! toolbox.

pub mod der;
pub mod digest_algo;
pub mod error;
pub mod key;
pub mod keyio;
pub mod mgf1;
pub mod numtheory;
pub mod pem;
pub mod pkcs1;
pub mod primes;
pub mod randnum;
pub mod transform;

pub use digest_algo::HashAlgorithm;
pub use error::{CryptoError, CryptoErrorKind, Result};
pub use key::{KeyPair, PrivateKey, PublicKey, DEFAULT_EXPONENT};
