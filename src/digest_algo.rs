//! Supported digest algorithms and their PKCS#1 DigestInfo ASN.1 prefixes.

use std::io::Read;

use digest::Digest;

use crate::error::{CryptoError, CryptoErrorKind, Result};

/// A hash algorithm usable for PKCS#1 v1.5 signing/verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashAlgorithm {
    /// All supported algorithms, in canonical table order.
    pub const ALL: [HashAlgorithm; 9] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
    ];

    /// Parses a hash name such as `"SHA-256"` as used by the CLI.
    pub fn from_name(name: &str) -> Result<HashAlgorithm> {
        Ok(match name {
            "MD5" => HashAlgorithm::Md5,
            "SHA-1" => HashAlgorithm::Sha1,
            "SHA-224" => HashAlgorithm::Sha224,
            "SHA-256" => HashAlgorithm::Sha256,
            "SHA-384" => HashAlgorithm::Sha384,
            "SHA-512" => HashAlgorithm::Sha512,
            "SHA3-256" => HashAlgorithm::Sha3_256,
            "SHA3-384" => HashAlgorithm::Sha3_384,
            "SHA3-512" => HashAlgorithm::Sha3_512,
            other => {
                return Err(CryptoError::new(
                    CryptoErrorKind::ValueError,
                    format!("Invalid hash method: {}", other),
                ))
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha224 => "SHA-224",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Sha3_256 => "SHA3-256",
            HashAlgorithm::Sha3_384 => "SHA3-384",
            HashAlgorithm::Sha3_512 => "SHA3-512",
        }
    }

    /// The precomputed ASN.1 DigestInfo prefix for this algorithm.
    pub fn digest_info_prefix(&self) -> &'static [u8] {
        match self {
            HashAlgorithm::Md5 => &[
                0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x02,
                0x05, 0x05, 0x00, 0x04, 0x10,
            ],
            HashAlgorithm::Sha1 => &[
                0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00,
                0x04, 0x14,
            ],
            HashAlgorithm::Sha224 => &[
                0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x04, 0x05, 0x00, 0x04, 0x1c,
            ],
            HashAlgorithm::Sha256 => &[
                0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x01, 0x05, 0x00, 0x04, 0x20,
            ],
            HashAlgorithm::Sha384 => &[
                0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x02, 0x05, 0x00, 0x04, 0x30,
            ],
            HashAlgorithm::Sha512 => &[
                0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x03, 0x05, 0x00, 0x04, 0x40,
            ],
            HashAlgorithm::Sha3_256 => &[
                0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x08, 0x05, 0x00, 0x04, 0x20,
            ],
            HashAlgorithm::Sha3_384 => &[
                0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x09, 0x05, 0x00, 0x04, 0x30,
            ],
            HashAlgorithm::Sha3_512 => &[
                0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x0a, 0x05, 0x00, 0x04, 0x40,
            ],
        }
    }

    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
            HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha3_384 => 48,
            HashAlgorithm::Sha3_512 => 64,
        }
    }

    /// Digests `message` in one shot.
    pub fn hash_bytes(&self, message: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => md5::Md5::digest(message).to_vec(),
            HashAlgorithm::Sha1 => sha1::Sha1::digest(message).to_vec(),
            HashAlgorithm::Sha224 => sha2::Sha224::digest(message).to_vec(),
            HashAlgorithm::Sha256 => sha2::Sha256::digest(message).to_vec(),
            HashAlgorithm::Sha384 => sha2::Sha384::digest(message).to_vec(),
            HashAlgorithm::Sha512 => sha2::Sha512::digest(message).to_vec(),
            HashAlgorithm::Sha3_256 => sha3::Sha3_256::digest(message).to_vec(),
            HashAlgorithm::Sha3_384 => sha3::Sha3_384::digest(message).to_vec(),
            HashAlgorithm::Sha3_512 => sha3::Sha3_512::digest(message).to_vec(),
        }
    }

    /// Digests a stream, reading it in 1024-byte blocks rather than
    /// buffering the whole input up front.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Vec<u8>> {
        macro_rules! digest_reader {
            ($ty:ty) => {{
                let mut hasher = <$ty>::new();
                let mut block = [0u8; 1024];
                loop {
                    let n = reader.read(&mut block)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&block[..n]);
                }
                Ok(hasher.finalize().to_vec())
            }};
        }

        match self {
            HashAlgorithm::Md5 => digest_reader!(md5::Md5),
            HashAlgorithm::Sha1 => digest_reader!(sha1::Sha1),
            HashAlgorithm::Sha224 => digest_reader!(sha2::Sha224),
            HashAlgorithm::Sha256 => digest_reader!(sha2::Sha256),
            HashAlgorithm::Sha384 => digest_reader!(sha2::Sha384),
            HashAlgorithm::Sha512 => digest_reader!(sha2::Sha512),
            HashAlgorithm::Sha3_256 => digest_reader!(sha3::Sha3_256),
            HashAlgorithm::Sha3_384 => digest_reader!(sha3::Sha3_384),
            HashAlgorithm::Sha3_512 => digest_reader!(sha3::Sha3_512),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_name() {
        for algo in HashAlgorithm::ALL {
            let parsed = HashAlgorithm::from_name(algo.name()).unwrap();
            assert_eq!(parsed, algo);
        }
    }

    #[test]
    fn unknown_name_is_value_error() {
        let err = HashAlgorithm::from_name("NOT-A-HASH").unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::ValueError));
    }

    #[test]
    fn digest_len_matches_prefix_and_output() {
        for algo in HashAlgorithm::ALL {
            assert_eq!(algo.hash_bytes(b"abc").len(), algo.digest_len());
        }
    }
}
