//! PEM armoring: `-----BEGIN <tag>-----` / `-----END <tag>-----` framing
//! around base64, wrapped at 64 characters. Parsing tolerates arbitrary
//! text before the BEGIN marker and after the END marker.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, CryptoErrorKind, Result};

const WRAP_WIDTH: usize = 64;

pub fn save(tag: &str, der: &[u8]) -> String {
    let body = STANDARD.encode(der);

    let mut out = String::new();
    out.push_str(&format!("-----BEGIN {}-----\n", tag));
    for chunk in body.as_bytes().chunks(WRAP_WIDTH) {
        out.push_str(std::str::from_utf8(chunk).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(&format!("-----END {}-----\n", tag));
    out
}

/// Extracts and decodes the base64 body between the first matching
/// `BEGIN`/`END` marker pair for `tag`. Any text outside the markers
/// (comments, other PEM blocks) is ignored.
pub fn load(text: &str, tag: &str) -> Result<Vec<u8>> {
    let begin_marker = format!("-----BEGIN {}-----", tag);
    let end_marker = format!("-----END {}-----", tag);

    let begin_pos = text
        .find(&begin_marker)
        .ok_or_else(|| CryptoError::new(CryptoErrorKind::FormatError, format!("no PEM start marker for {}", tag)))?;
    let body_start = begin_pos + begin_marker.len();

    let end_pos = text[body_start..]
        .find(&end_marker)
        .ok_or_else(|| CryptoError::new(CryptoErrorKind::FormatError, format!("no PEM end marker for {}", tag)))?;

    let body: String = text[body_start..body_start + end_pos].chars().filter(|c| !c.is_whitespace()).collect();

    Ok(STANDARD.decode(body.as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_wraps_at_64_columns() {
        let der = vec![0xABu8; 100];
        let pem = save("RSA PUBLIC KEY", &der);
        assert!(pem.starts_with("-----BEGIN RSA PUBLIC KEY-----\n"));
        assert!(pem.trim_end().ends_with("-----END RSA PUBLIC KEY-----"));
        for line in pem.lines().filter(|l| !l.starts_with("-----")) {
            assert!(line.len() <= WRAP_WIDTH);
        }
    }

    #[test]
    fn roundtrip() {
        let der = vec![1u8, 2, 3, 4, 5, 250, 251];
        let pem = save("RSA PRIVATE KEY", &der);
        let decoded = load(&pem, "RSA PRIVATE KEY").unwrap();
        assert_eq!(decoded, der);
    }

    #[test]
    fn tolerates_surrounding_noise() {
        let der = vec![9u8, 9, 9];
        let inner = save("RSA PUBLIC KEY", &der);
        let noisy = format!("; a comment\n{}\nmore noise after\n", inner);
        let decoded = load(&noisy, "RSA PUBLIC KEY").unwrap();
        assert_eq!(decoded, der);
    }

    #[test]
    fn missing_markers_is_format_error() {
        let err = load("not pem at all", "RSA PUBLIC KEY").unwrap_err();
        assert!(matches!(err.kind(), CryptoErrorKind::FormatError));
    }
}
