//! Message encryption using AES-256-GCM
//!
//! [`seal`] and [`open`] are the raw AEAD operations on caller-supplied key and
//! nonce slices. [`SealedMessage`] adds fresh nonce generation and the
//! `nonce || ciphertext` transport packaging.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroizing;

use crate::{derivation::SessionKey, error::CryptoError, random::RandomSource};

/// AES-256 key size (32 bytes)
pub const KEY_SIZE: usize = 32;

/// GCM nonce size (12 bytes)
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Encrypt `plaintext` with AES-256-GCM.
///
/// Returns the ciphertext with the 16-byte tag appended.
///
/// # Security
///
/// A `(key, nonce)` pair MUST NOT be used for two different plaintexts. Reuse
/// is not detected here; [`SealedMessage::seal`] draws a fresh random nonce
/// per message.
///
/// # Errors
///
/// - `InvalidKeyOrNonceSize`: key is not 32 bytes or nonce is not 12 bytes
/// - `PlaintextTooLong`: plaintext exceeds the GCM per-message limit
pub fn seal(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = init_cipher(key, nonce)?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::PlaintextTooLong { len: plaintext.len() })
}

/// Decrypt and verify `ciphertext_with_tag` with AES-256-GCM.
///
/// The tag comparison is constant-time. On failure nothing is returned.
///
/// # Errors
///
/// - `InvalidKeyOrNonceSize`: key is not 32 bytes or nonce is not 12 bytes
/// - `AuthenticationFailed`: the tag does not verify (wrong key, wrong nonce
///   or tampered ciphertext)
pub fn open(
    key: &[u8],
    nonce: &[u8],
    ciphertext_with_tag: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let cipher = init_cipher(key, nonce)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext_with_tag)
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

fn init_cipher(key: &[u8], nonce: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    let size_error =
        || CryptoError::InvalidKeyOrNonceSize { key_len: key.len(), nonce_len: nonce.len() };

    if nonce.len() != NONCE_SIZE {
        return Err(size_error());
    }

    Aes256Gcm::new_from_slice(key).map_err(|_| size_error())
}

/// An encrypted message ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// The 12-byte GCM nonce
    pub nonce: [u8; NONCE_SIZE],
    /// The ciphertext including 16-byte GCM tag
    pub ciphertext: Vec<u8>,
}

impl SealedMessage {
    /// Smallest valid packaged message: a nonce and a tag over an empty
    /// plaintext.
    pub const MIN_PACKAGED_LEN: usize = NONCE_SIZE + TAG_SIZE;

    /// Encrypt `plaintext` under `key` with a nonce drawn from `rng`.
    ///
    /// # Errors
    ///
    /// - `RandomnessUnavailable`: no nonce could be drawn
    /// - `PlaintextTooLong`: plaintext exceeds the GCM per-message limit
    pub fn seal<R: RandomSource>(
        key: &SessionKey,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<Self, CryptoError> {
        let nonce: [u8; NONCE_SIZE] = rng.random_array()?;
        let ciphertext = seal(key.as_bytes(), &nonce, plaintext)?;

        Ok(Self { nonce, ciphertext })
    }

    /// Decrypt with `key`.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailed`: wrong key or tampered message
    pub fn open(&self, key: &SessionKey) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        open(key.as_bytes(), &self.nonce, &self.ciphertext)
    }

    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }

    /// Transport packaging: `nonce(12) || ciphertext_with_tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut packaged = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        packaged.extend_from_slice(&self.nonce);
        packaged.extend_from_slice(&self.ciphertext);
        packaged
    }

    /// Split a packaged message back into nonce and ciphertext.
    ///
    /// # Errors
    ///
    /// - `MalformedSealedMessage`: input is shorter than nonce plus tag
    pub fn from_bytes(packaged: &[u8]) -> Result<Self, CryptoError> {
        if packaged.len() < Self::MIN_PACKAGED_LEN {
            return Err(CryptoError::MalformedSealedMessage {
                len: packaged.len(),
                min: Self::MIN_PACKAGED_LEN,
            });
        }

        let (nonce_bytes, ciphertext) = packaged.split_at(NONCE_SIZE);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(nonce_bytes);

        Ok(Self { nonce, ciphertext: ciphertext.to_vec() })
    }
}
