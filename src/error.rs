//! Error kinds shared by every module in this crate.

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use num_bigint::BigUint;

/// The kind of failure a [`CryptoError`] represents.
#[derive(Clone, PartialEq, Eq)]
pub enum CryptoErrorKind {
    /// Malformed PEM / DER / PKCS#1 structure.
    FormatError,
    /// Message, hash, or MGF1 length too large for the key/parameters in use.
    OverflowError,
    /// `inverse()` or key generation requested on non-coprime inputs.
    NotRelativePrime {
        a: BigUint,
        b: BigUint,
        d: BigUint,
    },
    /// PKCS#1 v1.5 decryption failed. Always carries the single fixed
    /// message "Decryption failed" — see [`CryptoError::decryption_failed`].
    DecryptionError,
    /// Signature mismatch, or no known DigestInfo prefix matched.
    VerificationError,
    /// Unknown hash algorithm name.
    ValueError,
    /// A key, parameter, or argument is invalid on its face (wrong size,
    /// wrong sign, inconsistent components).
    InvalidParameter,
}

impl Debug for CryptoErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoErrorKind::FormatError => write!(f, "FormatError"),
            CryptoErrorKind::OverflowError => write!(f, "OverflowError"),
            CryptoErrorKind::NotRelativePrime { a, b, d } => {
                write!(f, "NotRelativePrime{{a={}, b={}, d={}}}", a, b, d)
            }
            CryptoErrorKind::DecryptionError => write!(f, "DecryptionError"),
            CryptoErrorKind::VerificationError => write!(f, "VerificationError"),
            CryptoErrorKind::ValueError => write!(f, "ValueError"),
            CryptoErrorKind::InvalidParameter => write!(f, "InvalidParameter"),
        }
    }
}

/// The single error type returned by every fallible operation in this crate.
///
/// Carries a `kind` the CLI shells can branch on, plus a boxed `source` so
/// the underlying cause is still reachable via `std::error::Error::source`.
#[derive(Debug)]
pub struct CryptoError {
    kind: CryptoErrorKind,
    err: Box<dyn Error + Sync + Send>,
}

impl CryptoError {
    pub fn new<E>(kind: CryptoErrorKind, err: E) -> CryptoError
    where
        E: Into<Box<dyn Error + Sync + Send>>,
    {
        CryptoError { kind, err: err.into() }
    }

    pub fn kind(&self) -> &CryptoErrorKind {
        &self.kind
    }

    /// The fixed-message decryption failure: callers must never be able to
    /// distinguish *why* PKCS#1 v1.5 unpadding failed.
    pub fn decryption_failed() -> CryptoError {
        CryptoError::new(CryptoErrorKind::DecryptionError, "Decryption failed")
    }

    pub fn verification_failed() -> CryptoError {
        CryptoError::new(CryptoErrorKind::VerificationError, "Verification failed")
    }

    pub fn not_relative_prime(a: BigUint, b: BigUint, d: BigUint) -> CryptoError {
        CryptoError::new(
            CryptoErrorKind::NotRelativePrime { a: a.clone(), b: b.clone(), d: d.clone() },
            format!("{} and {} are not relatively prime, divider={}", a, b, d),
        )
    }
}

impl Display for CryptoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.err)
    }
}

impl Error for CryptoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.err.source()
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        CryptoError::new(CryptoErrorKind::FormatError, e)
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
