//! Session key derivation using HKDF-SHA256 (RFC 5869)

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::{agreement::SharedSecret, cipher::NONCE_SIZE, error::CryptoError};

/// Context label binding derived keys to this protocol
pub const SESSION_KEY_LABEL: &[u8] = b"X25519-HKDF-AES-Session";

/// Size of a derived session key (32 bytes, AES-256)
pub const SESSION_KEY_SIZE: usize = 32;

/// SHA-256 output length
const HASH_LEN: usize = 32;

/// Largest HKDF-Expand output: 255 blocks of the hash length
pub const MAX_OUTPUT_LEN: usize = 255 * HASH_LEN;

/// Symmetric key shared by both parties after derivation.
///
/// Zeroized on drop. `Debug` is redacted.
#[derive(Clone)]
pub struct SessionKey {
    key: [u8; SESSION_KEY_SIZE],
}

impl SessionKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(key: [u8; SESSION_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Copy a key out of derived output.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyOrNonceSize`: `bytes` is not exactly 32 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SESSION_KEY_SIZE {
            return Err(CryptoError::InvalidKeyOrNonceSize {
                key_len: bytes.len(),
                nonce_len: NONCE_SIZE,
            });
        }

        let mut key = [0u8; SESSION_KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// 32-byte key for AES-256-GCM.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.key
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.key.as_slice().ct_eq(other.key.as_slice()).into()
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive `output_length` bytes from a secret with HKDF-SHA256.
///
/// Extract with `(salt, secret)`, then expand with `context_label` as the
/// info parameter. A `None` salt is a string of `HashLen` zero bytes, as in
/// RFC 5869 section 2.2.
///
/// # Errors
///
/// - `OutputLengthUnsupported`: `output_length` exceeds [`MAX_OUTPUT_LEN`]
pub fn derive_key(
    secret: &[u8],
    context_label: &[u8],
    salt: Option<&[u8]>,
    output_length: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if output_length > MAX_OUTPUT_LEN {
        return Err(CryptoError::OutputLengthUnsupported {
            requested: output_length,
            max: MAX_OUTPUT_LEN,
        });
    }

    let hkdf = Hkdf::<Sha256>::new(salt, secret);

    let mut okm = Zeroizing::new(vec![0u8; output_length]);
    hkdf.expand(context_label, &mut okm).map_err(|_| CryptoError::OutputLengthUnsupported {
        requested: output_length,
        max: MAX_OUTPUT_LEN,
    })?;

    Ok(okm)
}

/// Derive the 32-byte session key from an X25519 shared secret.
///
/// Deterministic: both parties holding the same shared secret get the same
/// key.
pub fn derive_session_key(
    shared_secret: &SharedSecret,
    context_label: &[u8],
    salt: Option<&[u8]>,
) -> Result<SessionKey, CryptoError> {
    let okm = derive_key(shared_secret.as_bytes(), context_label, salt, SESSION_KEY_SIZE)?;
    SessionKey::from_slice(&okm)
}
