//! PEM/DER load-and-save convenience wrappers tying [`crate::der`] and
//! [`crate::pem`] to [`crate::key::PublicKey`]/[`crate::key::PrivateKey`].
//!
//! Tag strings (`"RSA PUBLIC KEY"` / `"RSA PRIVATE KEY"`) match the
//! conventional PKCS#1 PEM framing.

use crate::der;
use crate::error::Result;
use crate::key::{PrivateKey, PublicKey};
use crate::pem;

const PUBLIC_TAG: &str = "RSA PUBLIC KEY";
const PRIVATE_TAG: &str = "RSA PRIVATE KEY";

pub fn public_key_to_pem(key: &PublicKey) -> String {
    pem::save(PUBLIC_TAG, &der::encode_public_key(key))
}

pub fn public_key_from_pem(text: &str) -> Result<PublicKey> {
    der::decode_public_key(&pem::load(text, PUBLIC_TAG)?)
}

pub fn public_key_to_der(key: &PublicKey) -> Vec<u8> {
    der::encode_public_key(key)
}

pub fn public_key_from_der(bytes: &[u8]) -> Result<PublicKey> {
    der::decode_public_key(bytes)
}

pub fn private_key_to_pem(key: &PrivateKey) -> String {
    pem::save(PRIVATE_TAG, &der::encode_private_key(key))
}

pub fn private_key_from_pem(text: &str) -> Result<PrivateKey> {
    der::decode_private_key(&pem::load(text, PRIVATE_TAG)?)
}

pub fn private_key_to_der(key: &PrivateKey) -> Vec<u8> {
    der::encode_private_key(key)
}

pub fn private_key_from_der(bytes: &[u8]) -> Result<PrivateKey> {
    der::decode_private_key(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn public_pem_roundtrip() {
        let key = PrivateKey::generate(256, &mut OsRng).unwrap();
        let pem_text = public_key_to_pem(key.public_key());
        let decoded = public_key_from_pem(&pem_text).unwrap();
        assert_eq!(decoded, *key.public_key());
    }

    #[test]
    fn private_pem_roundtrip() {
        let key = PrivateKey::generate(256, &mut OsRng).unwrap();
        let pem_text = private_key_to_pem(&key);
        let decoded = private_key_from_pem(&pem_text).unwrap();
        assert_eq!(decoded.public_key(), key.public_key());
        assert_eq!(decoded.d(), key.d());
    }
}
