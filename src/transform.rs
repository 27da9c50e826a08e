//! Big-endian byte <-> integer conversions.

use num_bigint::BigUint;

use crate::error::{CryptoError, CryptoErrorKind, Result};
use crate::numtheory::byte_size;

/// Big-endian unsigned decode. An empty slice decodes to zero.
pub fn bytes2int(b: &[u8]) -> BigUint {
    BigUint::from_bytes_be(b)
}

/// Big-endian unsigned encode of `x`, left-padded with `0x00` to exactly
/// `fill_size` bytes.
///
/// Fails with [`CryptoErrorKind::OverflowError`] when `x` does not fit in
/// `fill_size` bytes.
pub fn int2bytes(x: &BigUint, fill_size: usize) -> Result<Vec<u8>> {
    let raw = x.to_bytes_be();
    let raw = if x.eq(&BigUint::from(0u32)) { Vec::new() } else { raw };

    if raw.len() > fill_size {
        let n = num_bigint::BigInt::from(x.clone());
        return Err(CryptoError::new(
            CryptoErrorKind::OverflowError,
            format!(
                "{} bytes needed to encode the value, but fill_size is only {}",
                byte_size(&n),
                fill_size
            ),
        ));
    }

    let mut out = vec![0u8; fill_size - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes2int_empty_is_zero() {
        assert_eq!(bytes2int(&[]), BigUint::from(0u32));
    }

    #[test]
    fn roundtrip() {
        let x = BigUint::from(0x1234u32);
        let bytes = int2bytes(&x, 4).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x12, 0x34]);
        assert_eq!(bytes2int(&bytes), x);
    }

    #[test]
    fn overflow_when_too_small() {
        let x = BigUint::from(0x1234u32);
        assert!(int2bytes(&x, 1).is_err());
    }
}
