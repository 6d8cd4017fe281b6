//! Sealed Features - encrypted transport of window summaries
//!
//! AES-256-GCM over the JSON form of `ProcessedFeatures`. The key is the
//! SHA-256 digest of a shared passphrase and the sealed form is
//! hex(nonce || ciphertext), with a fresh random nonce per seal.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::processed::ProcessedFeatures;

/// AES-GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SealError {
    #[error("Feature serialization failed: {0}")]
    Serialization(String),

    #[error("Sealed payload is not valid hex: {0}")]
    Encoding(String),

    #[error("Sealed payload too short: {len} bytes")]
    TooShort { len: usize },

    /// Wrong key or tampered payload
    #[error("Sealed payload failed authentication")]
    Authentication,
}

/// Seals and opens `ProcessedFeatures` under one passphrase
#[derive(Clone)]
pub struct FeatureSealer {
    cipher: Aes256Gcm,
}

impl FeatureSealer {
    pub fn new(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(digest.as_slice())),
        }
    }

    pub fn seal(&self, features: &ProcessedFeatures) -> Result<String, SealError> {
        let plaintext = serde_json::to_vec(features).map_err(|e| SealError::Serialization(e.to_string()))?;

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill(&mut nonce[..]);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|_| SealError::Authentication)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        log::debug!("Sealed features: {} bytes", sealed.len());
        Ok(hex::encode(sealed))
    }

    pub fn open(&self, sealed: &str) -> Result<ProcessedFeatures, SealError> {
        let bytes = hex::decode(sealed.trim()).map_err(|e| SealError::Encoding(e.to_string()))?;
        if bytes.len() <= NONCE_LEN {
            return Err(SealError::TooShort { len: bytes.len() });
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SealError::Authentication)?;

        serde_json::from_slice(&plaintext).map_err(|e| SealError::Serialization(e.to_string()))
    }
}
