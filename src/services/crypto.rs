// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! RSA credential cipher.
//!
//! The Clockify API key is encrypted with RSA-OAEP (SHA-256) before it is
//! stored or sent over the wire, and decrypted per request just before the
//! upstream call. Ciphertext travels as standard base64.
//!
//! Public and private halves are configured independently: the encrypt side
//! only needs `RSA_PUBLIC_KEY`, the decrypt side only `RSA_PRIVATE_KEY`.

use crate::config::Config;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// RSA modulus size. A 2048-bit key produces 256-byte ciphertext,
/// ~344 characters in base64.
pub const RSA_KEY_BITS: usize = 2048;

/// Minimum length for a value to be classified as encrypted. Calibrated well
/// below the ~344 characters a 2048-bit ciphertext encodes to, and well
/// above any real Clockify API key.
pub const MIN_ENCRYPTED_LEN: usize = 300;

/// Errors from cipher operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("RSA public key not configured (set RSA_PUBLIC_KEY or run generate_keys)")]
    MissingPublicKey,

    #[error("RSA private key not configured (set RSA_PRIVATE_KEY or run generate_keys)")]
    MissingPrivateKey,

    #[error("Failed to parse RSA key PEM: {0}")]
    InvalidKey(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid or corrupted ciphertext")]
    InvalidCiphertext,

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
}

/// Credential encryption/decryption service.
#[derive(Clone)]
pub struct CredentialCipher {
    public_key: Option<RsaPublicKey>,
    private_key: Option<RsaPrivateKey>,
}

impl CredentialCipher {
    /// Build a cipher from optional PEM key material.
    pub fn from_pem(
        public_pem: Option<&str>,
        private_pem: Option<&str>,
    ) -> Result<Self, CryptoError> {
        let public_key = public_pem
            .map(RsaPublicKey::from_public_key_pem)
            .transpose()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let private_key = private_pem
            .map(RsaPrivateKey::from_pkcs8_pem)
            .transpose()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self {
            public_key,
            private_key,
        })
    }

    /// Build a cipher from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self, CryptoError> {
        Self::from_pem(
            config.rsa_public_key_pem.as_deref(),
            config.rsa_private_key_pem.as_deref(),
        )
    }

    pub fn can_encrypt(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn can_decrypt(&self) -> bool {
        self.private_key.is_some()
    }

    /// Encrypt a plaintext secret. Returns base64-encoded ciphertext.
    ///
    /// OAEP bounds the payload (190 bytes for a 2048-bit key with SHA-256);
    /// callers pass short API keys, never arbitrary data.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let key = self
            .public_key
            .as_ref()
            .ok_or(CryptoError::MissingPublicKey)?;

        let mut rng = rand::thread_rng();
        let ciphertext = key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext.as_bytes())
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypt base64-encoded ciphertext back to the plaintext secret.
    ///
    /// Base64 decode failures, padding mismatches and non-UTF-8 plaintext
    /// all collapse into [`CryptoError::InvalidCiphertext`]; callers surface
    /// it as an authentication failure and never retry.
    pub fn decrypt(&self, ciphertext_b64: &str) -> Result<String, CryptoError> {
        let key = self
            .private_key
            .as_ref()
            .ok_or(CryptoError::MissingPrivateKey)?;

        let ciphertext = BASE64
            .decode(ciphertext_b64)
            .map_err(|_| CryptoError::InvalidCiphertext)?;
        let plaintext = key
            .decrypt(Oaep::new::<Sha256>(), &ciphertext)
            .map_err(|_| CryptoError::InvalidCiphertext)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidCiphertext)
    }
}

/// Best-effort check whether a value is already encrypted.
///
/// Shape-based only: long enough for a ciphertext of the configured key size
/// and made of base64 characters. A sufficiently long base64-shaped
/// plaintext is misclassified; stored records rely on this exact behavior,
/// so the heuristic stays as-is rather than growing a format tag.
pub fn is_encrypted(value: &str) -> bool {
    if value.len() < MIN_ENCRYPTED_LEN {
        return false;
    }

    let body = value.trim_end_matches('=');
    !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Generate a fresh RSA keypair as `(public_pem, private_pem)`.
///
/// Public key in SPKI form, private key in PKCS#8, matching what
/// [`CredentialCipher::from_pem`] expects.
pub fn generate_keypair() -> Result<(String, String), CryptoError> {
    let mut rng = rand::thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?
        .to_string();
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

    Ok((public_pem, private_pem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_encrypted_rejects_short_values() {
        assert!(!is_encrypted(""));
        assert!(!is_encrypted("MGU3YjA1ZmMtNDZmYi00ZDU2LTkyMjktZjBhYzI1NmVjYjcx"));
        assert!(!is_encrypted(&"A".repeat(MIN_ENCRYPTED_LEN - 1)));
    }

    #[test]
    fn test_is_encrypted_accepts_base64_shape() {
        assert!(is_encrypted(&"A".repeat(MIN_ENCRYPTED_LEN)));
        assert!(is_encrypted(&format!("{}==", "b64/Value+".repeat(35))));
    }

    #[test]
    fn test_is_encrypted_rejects_non_base64_chars() {
        let long_enough = "A".repeat(MIN_ENCRYPTED_LEN);
        assert!(!is_encrypted(&format!("{}!#", long_enough)));
        assert!(!is_encrypted(&format!("{} {}", long_enough, long_enough)));
        // '=' is only valid as trailing padding
        assert!(!is_encrypted(&format!("{}={}", long_enough, long_enough)));
        assert!(!is_encrypted(&"=".repeat(MIN_ENCRYPTED_LEN)));
    }
}
