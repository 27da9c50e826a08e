//! PKCS#1 v1.5 padding, encryption, decryption, signing, and verification.

use std::io;

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::digest_algo::HashAlgorithm;
use crate::error::{CryptoError, CryptoErrorKind, Result};
use crate::key::{PrivateKey, PublicKey};
use crate::transform::{bytes2int, int2bytes};

/// Minimum number of random nonzero padding bytes a valid encryption block
/// must carry, so `0x00 0x02 <padding> 0x00 <message>` is never shorter
/// than 11 bytes total.
const MIN_PADDING_LEN: usize = 8;

/// Builds the `0x00 0x02 <nonzero padding> 0x00 <message>` block for
/// encryption. `target_length` is the key's byte length `k`; the message
/// must fit in `k - 11` bytes.
fn pad_for_encryption<R: RngCore + CryptoRng>(rng: &mut R, message: &[u8], target_length: usize) -> Result<Vec<u8>> {
    let max_msglength = target_length.saturating_sub(11);
    if message.len() > max_msglength {
        return Err(CryptoError::new(
            CryptoErrorKind::OverflowError,
            format!(
                "{}-byte message too long; at most {} bytes can be encrypted for a {}-byte key",
                message.len(),
                max_msglength,
                target_length
            ),
        ));
    }

    let padding_length = target_length - message.len() - 3;
    let mut padding = Vec::with_capacity(padding_length);
    let mut scratch = [0u8; 256];
    while padding.len() < padding_length {
        rng.fill_bytes(&mut scratch);
        padding.extend(scratch.iter().copied().filter(|b| *b != 0));
    }
    padding.truncate(padding_length);

    let mut out = Vec::with_capacity(target_length);
    out.push(0x00);
    out.push(0x02);
    out.extend_from_slice(&padding);
    out.push(0x00);
    out.extend_from_slice(message);
    Ok(out)
}

/// Builds the `0x00 0x01 0xff...0xff 0x00 <message>` block used for signing.
fn pad_for_signing(message: &[u8], target_length: usize) -> Result<Vec<u8>> {
    let max_msglength = target_length.saturating_sub(11);
    if message.len() > max_msglength {
        return Err(CryptoError::new(
            CryptoErrorKind::OverflowError,
            format!(
                "{}-byte DigestInfo too long for a {}-byte key",
                message.len(),
                target_length
            ),
        ));
    }

    let padding_length = target_length - message.len() - 3;
    let mut out = Vec::with_capacity(target_length);
    out.push(0x00);
    out.push(0x01);
    out.extend(std::iter::repeat(0xffu8).take(padding_length));
    out.push(0x00);
    out.extend_from_slice(message);
    Ok(out)
}

/// RSAES-PKCS1-v1_5 encryption.
pub fn encrypt<R: RngCore + CryptoRng>(rng: &mut R, message: &[u8], pub_key: &PublicKey) -> Result<Vec<u8>> {
    let keylength = pub_key.modulus_len();
    let padded = pad_for_encryption(rng, message, keylength)?;
    let payload = bytes2int(&padded);
    let encrypted = pub_key.encrypt_int(&payload);
    int2bytes(&encrypted, keylength)
}

/// RSAES-PKCS1-v1_5 decryption. When `rng` is `Some`, the private operation
/// is blinded. Every failure mode — malformed header, too-short padding,
/// missing separator, oversized ciphertext — collapses to the single fixed
/// [`CryptoError::decryption_failed`] message.
pub fn decrypt<R: RngCore + CryptoRng>(rng: Option<&mut R>, ciphertext: &[u8], priv_key: &PrivateKey) -> Result<Vec<u8>> {
    let blocksize = priv_key.modulus_len();
    if ciphertext.len() != blocksize {
        return Err(CryptoError::decryption_failed());
    }

    let encrypted = bytes2int(ciphertext);
    let decrypted = priv_key
        .decrypt_int(&encrypted, rng)
        .map_err(|_| CryptoError::decryption_failed())?;
    let cleartext = int2bytes(&decrypted, blocksize).map_err(|_| CryptoError::decryption_failed())?;

    if cleartext.len() < 2 || cleartext[0] != 0x00 || cleartext[1] != 0x02 {
        return Err(CryptoError::decryption_failed());
    }

    let sep = cleartext[2..]
        .iter()
        .position(|b| *b == 0x00)
        .map(|p| p + 2)
        .ok_or_else(CryptoError::decryption_failed)?;

    // The padding run between the header and the separator must carry at
    // least MIN_PADDING_LEN random nonzero bytes.
    if sep < 2 + MIN_PADDING_LEN {
        return Err(CryptoError::decryption_failed());
    }

    Ok(cleartext[sep + 1..].to_vec())
}

/// Signs a precomputed `hash_value` under `hash_method`, i.e. RSASSA-PKCS1-v1_5
/// with the hashing step already done by the caller.
pub fn sign_hash<R: RngCore + CryptoRng>(
    rng: &mut R,
    hash_value: &[u8],
    priv_key: &PrivateKey,
    hash_method: HashAlgorithm,
) -> Result<Vec<u8>> {
    let mut digest_info = Vec::with_capacity(hash_method.digest_info_prefix().len() + hash_value.len());
    digest_info.extend_from_slice(hash_method.digest_info_prefix());
    digest_info.extend_from_slice(hash_value);

    let keylength = priv_key.modulus_len();
    let padded = pad_for_signing(&digest_info, keylength)?;
    let payload = bytes2int(&padded);
    let signed = priv_key.blinded_encrypt_int(&payload, rng);
    int2bytes(&signed, keylength)
}

/// Hashes `message` with `hash_method` and signs the result.
pub fn sign<R: RngCore + CryptoRng>(
    rng: &mut R,
    message: &[u8],
    priv_key: &PrivateKey,
    hash_method: HashAlgorithm,
) -> Result<Vec<u8>> {
    let hash_value = hash_method.hash_bytes(message);
    sign_hash(rng, &hash_value, priv_key, hash_method)
}

/// Hashes a stream (read in fixed-size blocks rather than buffered whole)
/// with `hash_method` and signs the result.
pub fn sign_reader<R: RngCore + CryptoRng, T: io::Read>(
    rng: &mut R,
    reader: T,
    priv_key: &PrivateKey,
    hash_method: HashAlgorithm,
) -> Result<Vec<u8>> {
    let hash_value = hash_method
        .hash_reader(reader)
        .map_err(|e| CryptoError::new(CryptoErrorKind::ValueError, e))?;
    sign_hash(rng, &hash_value, priv_key, hash_method)
}

/// RSASSA-PKCS1-v1_5 verification. Returns the hash algorithm the signature
/// was produced with on success.
///
/// Every candidate hash algorithm's expected encoded message is fully
/// reconstructed and compared in constant time, rather than scanning the
/// decrypted block for a matching DigestInfo prefix and stopping at the
/// first hit; this avoids leaking which candidate (if any) matched via
/// timing.
pub fn verify(message: &[u8], signature: &[u8], pub_key: &PublicKey) -> Result<HashAlgorithm> {
    let keylength = pub_key.modulus_len();
    if signature.len() != keylength {
        return Err(CryptoError::verification_failed());
    }

    let encrypted = bytes2int(signature);
    if encrypted >= *pub_key.n() {
        return Err(CryptoError::verification_failed());
    }
    let decrypted = pub_key.encrypt_int(&encrypted); // RSAVP1 is the same modpow as RSAEP
    let clearsig = match int2bytes(&decrypted, keylength) {
        Ok(c) => c,
        Err(_) => return Err(CryptoError::verification_failed()),
    };

    let mut matched: Option<HashAlgorithm> = None;
    for algo in HashAlgorithm::ALL {
        let message_hash = algo.hash_bytes(message);
        let mut digest_info = Vec::with_capacity(algo.digest_info_prefix().len() + message_hash.len());
        digest_info.extend_from_slice(algo.digest_info_prefix());
        digest_info.extend_from_slice(&message_hash);

        let expected = match pad_for_signing(&digest_info, keylength) {
            Ok(e) => e,
            Err(_) => continue,
        };

        let is_match: bool = expected.ct_eq(&clearsig).into();
        if is_match {
            matched = Some(algo);
        }
    }

    matched.ok_or_else(CryptoError::verification_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PrivateKey;
    use rand::rngs::OsRng;

    fn test_key() -> PrivateKey {
        PrivateKey::generate(1024, &mut OsRng).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = test_key();
        let mut rng = OsRng;
        let message = b"the quick brown fox";
        let ciphertext = encrypt(&mut rng, message, key.public_key()).unwrap();
        let recovered = decrypt(Some(&mut rng), &ciphertext, &key).unwrap();
        assert_eq!(recovered, message);
    }

    #[test]
    fn max_length_message_succeeds() {
        let key = test_key();
        let mut rng = OsRng;
        let k = key.modulus_len();
        let message = vec![0x41u8; k - 11];
        let ciphertext = encrypt(&mut rng, &message, key.public_key()).unwrap();
        let recovered = decrypt(Some(&mut rng), &ciphertext, &key).unwrap();
        assert_eq!(recovered, message);
    }

    #[test]
    fn one_byte_too_long_is_overflow_error() {
        let key = test_key();
        let mut rng = OsRng;
        let k = key.modulus_len();
        let message = vec![0x41u8; k - 10];
        let err = encrypt(&mut rng, &message, key.public_key()).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::OverflowError));
    }

    #[test]
    fn corrupted_ciphertext_is_decryption_error() {
        let key = test_key();
        let mut rng = OsRng;
        let mut ciphertext = encrypt(&mut rng, b"hello", key.public_key()).unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xff;
        let err = decrypt(Some(&mut rng), &ciphertext, &key).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::DecryptionError));
    }

    /// A decrypted block of `00 02 00 <rest>` — a separator immediately
    /// after the header, with no random padding at all — must be rejected
    /// even though the header and separator both look well-formed.
    #[test]
    fn separator_immediately_after_header_is_rejected() {
        let key = test_key();
        let mut rng = OsRng;
        let blocksize = key.modulus_len();

        let mut payload = vec![0x00u8, 0x02, 0x00];
        payload.extend_from_slice(b"short message");
        let mut block = vec![0u8; blocksize - payload.len()];
        block.extend_from_slice(&payload);

        let encrypted = key.public_key().encrypt_int(&bytes2int(&block));
        let ciphertext = int2bytes(&encrypted, blocksize).unwrap();

        let err = decrypt(Some(&mut rng), &ciphertext, &key).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::DecryptionError));
    }

    /// Fewer than 8 padding bytes between the header and the separator
    /// must also be rejected, not just zero.
    #[test]
    fn short_padding_run_is_rejected() {
        let key = test_key();
        let mut rng = OsRng;
        let blocksize = key.modulus_len();

        let mut block = vec![0x00u8, 0x02];
        block.extend(std::iter::repeat(0xaau8).take(7)); // one short of the minimum 8
        block.push(0x00);
        block.extend_from_slice(b"msg");
        let mut padded = vec![0u8; blocksize - block.len()];
        padded.extend_from_slice(&block);

        let payload = bytes2int(&padded);
        let encrypted = key.public_key().encrypt_int(&payload);
        let ciphertext = int2bytes(&encrypted, blocksize).unwrap();

        let err = decrypt(Some(&mut rng), &ciphertext, &key).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::DecryptionError));
    }

    #[test]
    fn sign_verify_roundtrip_every_hash() {
        let key = test_key();
        let mut rng = OsRng;
        for algo in HashAlgorithm::ALL {
            let sig = sign(&mut rng, b"message to authenticate", &key, algo).unwrap();
            let verified = verify(b"message to authenticate", &sig, key.public_key()).unwrap();
            assert_eq!(verified, algo);
        }
    }

    #[test]
    fn sign_reader_matches_sign_over_buffered_bytes() {
        let key = test_key();
        let mut rng = OsRng;
        let message = b"streamed through a reader instead of buffered".to_vec();

        let sig_buffered = sign(&mut rng, &message, &key, HashAlgorithm::Sha256).unwrap();
        let sig_streamed = sign_reader(&mut rng, message.as_slice(), &key, HashAlgorithm::Sha256).unwrap();

        assert_eq!(
            verify(&message, &sig_buffered, key.public_key()).unwrap(),
            verify(&message, &sig_streamed, key.public_key()).unwrap()
        );
    }

    #[test]
    fn tampered_message_fails_verification() {
        let key = test_key();
        let mut rng = OsRng;
        let sig = sign(&mut rng, b"original", &key, HashAlgorithm::Sha256).unwrap();
        let err = verify(b"tampered", &sig, key.public_key()).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::VerificationError));
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let key = test_key();
        let mut rng = OsRng;
        let mut sig = sign(&mut rng, b"original", &key, HashAlgorithm::Sha256).unwrap();
        let last = sig.len() - 1;
        sig[last] ^= 0x01;
        let err = verify(b"original", &sig, key.public_key()).unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::VerificationError));
    }
}
