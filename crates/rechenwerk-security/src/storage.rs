// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encrypted storage — AES-256-GCM (ring) over byte buffers.
//
// Sealed layout: 12-byte random nonce || ciphertext || 16-byte tag.
// Keys are 32 random bytes, persisted raw by the caller.

use std::fmt;

use rechenwerk_core::error::{RechenError, Result};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, instrument};

/// Length of a raw AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Raw symmetric key material, one per encryption event.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Fresh key from the system CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| RechenError::Encryption("system random source unavailable".into()))?;
        Ok(Self(bytes))
    }

    /// Rebuild a key from the contents of a key file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            RechenError::Decryption(format!(
                "key must be {KEY_LEN} bytes, found {}",
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Authenticated encryption with a single key.
///
/// Each encrypt call draws a fresh random nonce, so one handle can seal
/// any number of buffers.
pub struct EncryptedStorage {
    key: SymmetricKey,
    rng: SystemRandom,
}

impl EncryptedStorage {
    pub fn new(key: SymmetricKey) -> Self {
        Self {
            key,
            rng: SystemRandom::new(),
        }
    }

    fn sealing_key(&self, err: fn(String) -> RechenError) -> Result<LessSafeKey> {
        let unbound = UnboundKey::new(&AES_256_GCM, self.key.as_bytes())
            .map_err(|_| err("key rejected by AES-256-GCM".into()))?;
        Ok(LessSafeKey::new(unbound))
    }

    /// Encrypt `plaintext`, returning nonce, ciphertext and tag in one buffer.
    #[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let key = self.sealing_key(RechenError::Encryption)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| RechenError::Encryption("system random source unavailable".into()))?;

        let mut in_out = plaintext.to_vec();
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| RechenError::Encryption("AES-256-GCM seal failed".into()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);

        debug!(ciphertext_len = sealed.len(), "encryption complete");
        Ok(sealed)
    }

    /// Decrypt a buffer produced by [`EncryptedStorage::encrypt`].
    ///
    /// A wrong key or any tampering fails authentication.
    #[instrument(skip_all, fields(ciphertext_len = ciphertext.len()))]
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(RechenError::Decryption(format!(
                "ciphertext too short ({} bytes)",
                ciphertext.len()
            )));
        }
        let key = self.sealing_key(RechenError::Decryption)?;

        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| RechenError::Decryption("malformed nonce".into()))?;

        let mut in_out = sealed.to_vec();
        let plaintext_len = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| {
                RechenError::Decryption("authentication failed (wrong key or tampered data)".into())
            })?
            .len();
        in_out.truncate(plaintext_len);

        debug!(plaintext_len, "decryption complete");
        Ok(in_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> EncryptedStorage {
        EncryptedStorage::new(SymmetricKey::generate().expect("generate key"))
    }

    #[test]
    fn round_trip() {
        let storage = storage();
        let plaintext = b"Result: 3 + 4 and 10 / 2 end";

        let ciphertext = storage.encrypt(plaintext).expect("encrypt failed");
        assert_eq!(ciphertext.len(), NONCE_LEN + plaintext.len() + 16);
        assert_ne!(&ciphertext[NONCE_LEN..NONCE_LEN + plaintext.len()], plaintext);

        let decrypted = storage.decrypt(&ciphertext).expect("decrypt failed");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn nonces_differ_between_calls() {
        let storage = storage();
        let a = storage.encrypt(b"same").expect("encrypt");
        let b = storage.encrypt(b"same").expect("encrypt");
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let ciphertext = storage().encrypt(b"secret").expect("encrypt failed");
        let result = storage().decrypt(&ciphertext);
        assert!(
            matches!(result, Err(RechenError::Decryption(_))),
            "decryption with the wrong key must fail"
        );
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let storage = storage();
        let mut ciphertext = storage.encrypt(b"secret").expect("encrypt failed");
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;
        assert!(storage.decrypt(&ciphertext).is_err());
    }

    #[test]
    fn truncated_ciphertext_fails() {
        assert!(matches!(
            storage().decrypt(&[0u8; 10]),
            Err(RechenError::Decryption(_))
        ));
    }

    #[test]
    fn empty_plaintext() {
        let storage = storage();
        let ciphertext = storage.encrypt(b"").expect("encrypt failed");
        let decrypted = storage.decrypt(&ciphertext).expect("decrypt failed");
        assert!(decrypted.is_empty());
    }

    #[test]
    fn key_bytes_round_trip_and_length_is_checked() {
        let key = SymmetricKey::generate().expect("generate key");
        assert_eq!(SymmetricKey::from_bytes(key.as_bytes()).unwrap(), key);
        assert!(SymmetricKey::from_bytes(&[0u8; 16]).is_err());
        assert_eq!(format!("{key:?}"), "SymmetricKey(..)");
    }
}
