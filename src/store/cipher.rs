//! AES-256-GCM encryption for phone numbers kept at rest.
//!
//! Encrypted values look like `enc:<base64(nonce || ciphertext)>`. Anything without
//! the prefix is plain text written before encryption was turned on, and is read
//! back unchanged.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::StoreError;

const PREFIX: &str = "enc:";
const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// The AES key is the SHA-256 of `secret`, so any passphrase works as
    /// `DATA_ENCRYPTION_KEY`.
    pub fn new(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, StoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| StoreError::Cipher("encryption failed".to_string()))?;

        let mut payload = nonce_bytes.to_vec();
        payload.extend_from_slice(&ciphertext);
        Ok(format!(
            "{PREFIX}{}",
            base64::engine::general_purpose::STANDARD.encode(payload)
        ))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, StoreError> {
        let Some(encoded) = stored.strip_prefix(PREFIX) else {
            return Ok(stored.to_string());
        };

        let payload = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| StoreError::Cipher(format!("bad encoding: {e}")))?;
        if payload.len() <= NONCE_LEN {
            return Err(StoreError::Cipher("ciphertext too short".to_string()));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StoreError::Cipher("decryption failed, wrong key?".to_string()))?;
        String::from_utf8(plaintext).map_err(|e| StoreError::Cipher(e.to_string()))
    }
}

pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_then_decrypt() {
        let cipher = FieldCipher::new("family-secret");
        let stored = cipher.encrypt("+12065551234").unwrap();
        assert!(is_encrypted(&stored));
        assert!(!stored.contains("2065551234"));
        assert_eq!(cipher.decrypt(&stored).unwrap(), "+12065551234");
    }

    #[test]
    fn test_fresh_nonce_per_value() {
        let cipher = FieldCipher::new("family-secret");
        let a = cipher.encrypt("+12065551234").unwrap();
        let b = cipher.encrypt("+12065551234").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_plain_value_passes_through() {
        let cipher = FieldCipher::new("family-secret");
        assert_eq!(cipher.decrypt("+12065551234").unwrap(), "+12065551234");
    }

    #[test]
    fn test_wrong_key_and_garbage_rejected() {
        let stored = FieldCipher::new("family-secret").encrypt("+12065551234").unwrap();
        let other = FieldCipher::new("another-secret");
        assert!(matches!(other.decrypt(&stored), Err(StoreError::Cipher(_))));
        assert!(matches!(other.decrypt("enc:!!!"), Err(StoreError::Cipher(_))));
        assert!(matches!(other.decrypt("enc:AAAA"), Err(StoreError::Cipher(_))));
    }
}
