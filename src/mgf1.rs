//! MGF1 mask generation function (PKCS#1 v2 / RFC 8017 Appendix B.2.1).
//!
//! Generic over any `digest::Digest` implementation rather than being tied
//! to a single hash.

use digest::Digest;

use crate::error::{CryptoError, CryptoErrorKind, Result};

/// Generates a mask of exactly `len` bytes from `seed` using hash `D`.
///
/// Fails with [`CryptoErrorKind::OverflowError`] if `len > 2^32 * hLen`.
pub fn mgf1<D: Digest>(seed: &[u8], len: usize) -> Result<Vec<u8>> {
    let h_len = <D as Digest>::output_size();

    if h_len > 0 && (len as u128) > (1u128 << 32) * (h_len as u128) {
        return Err(CryptoError::new(
            CryptoErrorKind::OverflowError,
            "desired length too long for the given hash",
        ));
    }

    let mut t = Vec::with_capacity(len);
    let mut counter: u32 = 0;
    while t.len() < len {
        let mut hasher = D::new();
        hasher.update(seed);
        hasher.update(counter.to_be_bytes());
        t.extend_from_slice(&hasher.finalize());
        counter += 1;
    }

    t.truncate(len);
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha1::Sha1;

    #[test]
    fn mgf1_empty() {
        assert_eq!(mgf1::<Sha1>(b"", 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn mgf1_known_vector() {
        let mask = mgf1::<Sha1>(b"seed", 10).unwrap();
        assert_eq!(mask, vec![0x0c, 0x83, 0xd3, 0x4e, 0xef, 0x44, 0xf0, 0x7c, 0x6c, 0xb7]);
    }

    #[test]
    fn mgf1_overflow() {
        let h_len = <sha1::Sha1 as Digest>::output_size();
        let too_long = (1u128 << 32) * (h_len as u128) + 1;
        let err = mgf1::<Sha1>(b"seed", too_long as usize);
        assert!(err.is_err());
    }
}
