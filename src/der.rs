//! Minimal ASN.1 DER codec for PKCS#1 `RSAPublicKey`/`RSAPrivateKey`.
//!
//! Only the two DER constructs PKCS#1 actually needs are implemented:
//! `INTEGER` (tag `0x02`) and `SEQUENCE` (tag `0x30`), with the standard
//! short/long-form length encoding.

use num_bigint::{BigInt, Sign};

use crate::error::{CryptoError, CryptoErrorKind, Result};
use crate::key::{PrivateKey, PublicKey};

fn fmt_err(msg: impl Into<String>) -> CryptoError {
    CryptoError::new(CryptoErrorKind::FormatError, msg.into())
}

/// Encodes `len` using DER's short/long-form length rules.
fn encode_len(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let significant: Vec<u8> = bytes.iter().skip_while(|b| **b == 0).cloned().collect();
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(&significant);
}

fn encode_integer(out: &mut Vec<u8>, n: &BigInt) {
    // two's-complement minimal encoding; DER requires INTEGER to carry a
    // leading 0x00 whenever the high bit of the first magnitude byte is set,
    // so the value is never misread as negative.
    let (sign, mut bytes) = n.to_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    }
    if sign != Sign::Minus && bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }

    out.push(0x02);
    encode_len(out, bytes.len());
    out.extend_from_slice(&bytes);
}

fn encode_sequence(fields: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = fields.concat();
    let mut out = Vec::with_capacity(body.len() + 4);
    out.push(0x30);
    encode_len(&mut out, body.len());
    out.extend_from_slice(&body);
    out
}

/// A byte cursor over a DER buffer, used only internally by this module.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let b = *self.buf.get(self.pos).ok_or_else(|| fmt_err("unexpected end of DER input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_len(&mut self) -> Result<usize> {
        let first = self.read_u8()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let nbytes = (first & 0x7f) as usize;
        if nbytes == 0 || nbytes > 8 {
            return Err(fmt_err("unsupported DER length encoding"));
        }
        let mut len: usize = 0;
        for _ in 0..nbytes {
            len = (len << 8) | self.read_u8()? as usize;
        }
        Ok(len)
    }

    fn read_tagged(&mut self, expected_tag: u8) -> Result<&'a [u8]> {
        let tag = self.read_u8()?;
        if tag != expected_tag {
            return Err(fmt_err(format!("expected DER tag {:#x}, got {:#x}", expected_tag, tag)));
        }
        let len = self.read_len()?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|e| *e <= self.buf.len())
            .ok_or_else(|| fmt_err("DER length overruns buffer"))?;
        self.pos = end;
        Ok(&self.buf[start..end])
    }

    fn read_integer(&mut self) -> Result<BigInt> {
        let body = self.read_tagged(0x02)?;
        Ok(BigInt::from_signed_bytes_be(body))
    }

    fn enter_sequence(&mut self) -> Result<Reader<'a>> {
        let body = self.read_tagged(0x30)?;
        Ok(Reader::new(body))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }
}

fn to_biguint(n: BigInt, field: &str) -> Result<num_bigint::BigUint> {
    n.to_biguint().ok_or_else(|| fmt_err(format!("{} must not be negative", field)))
}

/// Encodes `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`.
pub fn encode_public_key(key: &PublicKey) -> Vec<u8> {
    let mut n_field = Vec::new();
    encode_integer(&mut n_field, &BigInt::from(key.n().clone()));
    let mut e_field = Vec::new();
    encode_integer(&mut e_field, &BigInt::from(key.e().clone()));
    encode_sequence(&[n_field, e_field])
}

pub fn decode_public_key(der: &[u8]) -> Result<PublicKey> {
    let mut seq = Reader::new(der).enter_sequence()?;
    let n = to_biguint(seq.read_integer()?, "modulus")?;
    let e = to_biguint(seq.read_integer()?, "publicExponent")?;
    if !seq.at_end() {
        return Err(fmt_err("trailing data after RSAPublicKey"));
    }
    PublicKey::from_components(n, e)
}

/// Encodes the PKCS#1 `RSAPrivateKey` `SEQUENCE` (version 0, two-prime form):
/// `{ version, modulus, publicExponent, privateExponent, prime1, prime2,
/// exponent1, exponent2, coefficient }`.
pub fn encode_private_key(key: &PrivateKey) -> Vec<u8> {
    let fields: Vec<Vec<u8>> = [
        BigInt::from(0),
        BigInt::from(key.public_key().n().clone()),
        BigInt::from(key.public_key().e().clone()),
        BigInt::from(key.d().clone()),
        BigInt::from(key.p().clone()),
        BigInt::from(key.q().clone()),
        BigInt::from(key.exp1().clone()),
        BigInt::from(key.exp2().clone()),
        BigInt::from(key.coef().clone()),
    ]
    .iter()
    .map(|v| {
        let mut f = Vec::new();
        encode_integer(&mut f, v);
        f
    })
    .collect();

    encode_sequence(&fields)
}

pub fn decode_private_key(der: &[u8]) -> Result<PrivateKey> {
    let mut seq = Reader::new(der).enter_sequence()?;

    let version = seq.read_integer()?;
    if version != BigInt::from(0) {
        return Err(fmt_err("only RSAPrivateKey version 0 (two-prime) is supported"));
    }

    let n = to_biguint(seq.read_integer()?, "modulus")?;
    let e = to_biguint(seq.read_integer()?, "publicExponent")?;
    let d = to_biguint(seq.read_integer()?, "privateExponent")?;
    let p = to_biguint(seq.read_integer()?, "prime1")?;
    let q = to_biguint(seq.read_integer()?, "prime2")?;
    // exponent1/exponent2/coefficient are recomputed by from_components
    // rather than trusted from the wire, so a hand-edited DER blob can't
    // desynchronize the CRT fast path from d/p/q.
    let _exp1 = seq.read_integer()?;
    let _exp2 = seq.read_integer()?;
    let _coef = seq.read_integer()?;

    PrivateKey::from_components(n, e, d, p, q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn public_key_roundtrip() {
        let key = PrivateKey::generate(256, &mut OsRng).unwrap();
        let der = encode_public_key(key.public_key());
        let decoded = decode_public_key(&der).unwrap();
        assert_eq!(decoded, *key.public_key());
    }

    #[test]
    fn private_key_roundtrip() {
        let key = PrivateKey::generate(256, &mut OsRng).unwrap();
        let der = encode_private_key(&key);
        let decoded = decode_private_key(&der).unwrap();
        assert_eq!(decoded.public_key(), key.public_key());
        assert_eq!(decoded.d(), key.d());
        assert_eq!(decoded.p(), key.p());
        assert_eq!(decoded.q(), key.q());
    }

    #[test]
    fn truncated_input_is_format_error() {
        let err = decode_public_key(&[0x30, 0x10, 0x02]).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::FormatError));
    }

    #[test]
    fn wrong_tag_is_format_error() {
        let err = decode_public_key(&[0x31, 0x00]).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::FormatError));
    }
}
