// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact integrity — SHA-256 fingerprints for published files.

use std::path::Path;

use rechenwerk_core::error::{RechenError, Result};
use rechenwerk_core::fs;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Fingerprint a file on disk.
pub fn hash_file(path: &Path) -> Result<String> {
    Ok(hash_bytes(&fs::read(path)?))
}

/// Verify that `data` matches the expected SHA-256 hex digest.
///
/// Hex case is ignored.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<()> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(RechenError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
        assert!(verify_hash(b"hello", &expected.to_uppercase()).is_ok());
    }

    #[test]
    fn hash_file_matches_hash_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, b"3 + 4").expect("write");
        assert_eq!(hash_file(&path).unwrap(), hash_bytes(b"3 + 4"));
        assert!(matches!(
            hash_file(&dir.path().join("absent")),
            Err(RechenError::Io { .. })
        ));
    }

    #[test]
    fn verify_mismatched_hash() {
        match verify_hash(b"a", "0000").unwrap_err() {
            RechenError::IntegrityMismatch { expected, actual } => {
                assert_eq!(expected, "0000");
                assert_eq!(actual, hash_bytes(b"a"));
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
