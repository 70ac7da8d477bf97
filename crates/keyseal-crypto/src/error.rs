//! Error types for keyseal cryptographic operations

use thiserror::Error;

/// Errors from key agreement, key derivation and AEAD operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The secure random source could not produce bytes
    #[error("randomness unavailable: {reason}")]
    RandomnessUnavailable {
        /// Reason reported by the random source
        reason: String,
    },

    /// Peer public key is a low-order point and yields an all-zero secret
    #[error("invalid peer key: agreement produced an all-zero shared secret")]
    InvalidPeerKey,

    /// Requested HKDF output exceeds 255 * hash length
    #[error("output length unsupported: requested {requested} bytes, maximum is {max}")]
    OutputLengthUnsupported {
        /// Requested output length in bytes
        requested: usize,
        /// Largest output the construction can produce
        max: usize,
    },

    /// AEAD key is not 32 bytes or nonce is not 12 bytes
    #[error("invalid key or nonce size: key is {key_len} bytes, nonce is {nonce_len} bytes")]
    InvalidKeyOrNonceSize {
        /// Length of the supplied key
        key_len: usize,
        /// Length of the supplied nonce
        nonce_len: usize,
    },

    /// Authentication tag did not verify
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Plaintext exceeds the AES-GCM per-message limit
    #[error("plaintext too long: {len} bytes")]
    PlaintextTooLong {
        /// Length of the rejected plaintext
        len: usize,
    },

    /// Packaged message is too short to hold a nonce and a tag
    #[error("malformed sealed message: {len} bytes, need at least {min}")]
    MalformedSealedMessage {
        /// Length of the packaged input
        len: usize,
        /// Minimum valid length
        min: usize,
    },
}

impl CryptoError {
    /// Returns true if the error points at tampered or hostile input rather
    /// than a local failure (entropy, caller misuse).
    pub fn is_untrusted_input(&self) -> bool {
        match self {
            Self::InvalidPeerKey
            | Self::AuthenticationFailed
            | Self::MalformedSealedMessage { .. } => true,

            Self::RandomnessUnavailable { .. }
            | Self::OutputLengthUnsupported { .. }
            | Self::InvalidKeyOrNonceSize { .. }
            | Self::PlaintextTooLong { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_is_untrusted_input() {
        assert!(CryptoError::AuthenticationFailed.is_untrusted_input());
        assert!(CryptoError::InvalidPeerKey.is_untrusted_input());
    }

    #[test]
    fn local_failures_are_not_untrusted_input() {
        let err = CryptoError::RandomnessUnavailable { reason: "no entropy".to_string() };
        assert!(!err.is_untrusted_input());

        let err = CryptoError::InvalidKeyOrNonceSize { key_len: 16, nonce_len: 12 };
        assert!(!err.is_untrusted_input());
    }

    #[test]
    fn error_display() {
        let err = CryptoError::OutputLengthUnsupported { requested: 9000, max: 8160 };
        assert_eq!(
            err.to_string(),
            "output length unsupported: requested 9000 bytes, maximum is 8160"
        );

        let err = CryptoError::InvalidKeyOrNonceSize { key_len: 31, nonce_len: 12 };
        assert_eq!(err.to_string(), "invalid key or nonce size: key is 31 bytes, nonce is 12 bytes");
    }
}
