//! Session error types.
//!
//! Every error is terminal for the session that produced it. [`FailureKind`]
//! is the copyable tag recorded in [`crate::SessionState::Failed`].

use keyseal_crypto::CryptoError;
use thiserror::Error;

use crate::session::SessionState;

/// Distinguishes failure causes without carrying their details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Entropy source failed
    RandomnessUnavailable,
    /// Peer public key was a degenerate point
    InvalidPeerKey,
    /// The two parties disagree on the shared secret or session key
    SharedSecretMismatch,
    /// Configured key length exceeds what HKDF can produce
    OutputLengthUnsupported,
    /// Key or nonce had the wrong size for AES-256-GCM
    InvalidKeyOrNonceSize,
    /// AEAD tag did not verify
    AuthenticationFailed,
    /// Opened text differs from the text that was sealed
    PlaintextMismatch,
    /// Plaintext exceeds the AEAD per-message limit
    PlaintextTooLong,
    /// Packaged message too short to parse
    MalformedSealedMessage,
    /// Operation called out of order
    InvalidState,
}

/// Errors that can occur while running a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The secure random source could not produce bytes
    #[error("randomness unavailable: {reason}")]
    RandomnessUnavailable {
        /// Reason reported by the random source
        reason: String,
    },

    /// A received public key produced an all-zero shared secret
    #[error("invalid peer key: agreement produced an all-zero shared secret")]
    InvalidPeerKey,

    /// The parties computed different secrets or keys.
    ///
    /// Cannot happen with a correct X25519 implementation fed genuine public
    /// keys. Treat as a defect.
    #[error("shared secret mismatch after {stage}")]
    SharedSecretMismatch {
        /// Step at which the mismatch was detected
        stage: &'static str,
    },

    /// Configured key length exceeds 255 * hash length
    #[error("output length unsupported: requested {requested} bytes, maximum is {max}")]
    OutputLengthUnsupported {
        /// Requested output length
        requested: usize,
        /// Largest supported output
        max: usize,
    },

    /// Key or nonce had the wrong size
    #[error("invalid key or nonce size: key is {key_len} bytes, nonce is {nonce_len} bytes")]
    InvalidKeyOrNonceSize {
        /// Length of the key
        key_len: usize,
        /// Length of the nonce
        nonce_len: usize,
    },

    /// The sealed message did not authenticate under the receiver's key
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Decryption succeeded but the text differs from what was sealed
    #[error("plaintext mismatch: round-tripped message differs from the original")]
    PlaintextMismatch,

    /// Plaintext exceeds the AEAD per-message limit
    #[error("plaintext too long: {len} bytes")]
    PlaintextTooLong {
        /// Rejected plaintext length
        len: usize,
    },

    /// Packaged message too short to hold a nonce and a tag
    #[error("malformed sealed message: {len} bytes, need at least {min}")]
    MalformedSealedMessage {
        /// Length received
        len: usize,
        /// Minimum valid length
        min: usize,
    },

    /// Operation attempted in a state that does not allow it
    #[error("invalid state: cannot {operation} in {state:?}")]
    InvalidState {
        /// State when the operation was attempted
        state: SessionState,
        /// Operation that was attempted
        operation: &'static str,
    },
}

impl SessionError {
    /// Failure tag for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RandomnessUnavailable { .. } => FailureKind::RandomnessUnavailable,
            Self::InvalidPeerKey => FailureKind::InvalidPeerKey,
            Self::SharedSecretMismatch { .. } => FailureKind::SharedSecretMismatch,
            Self::OutputLengthUnsupported { .. } => FailureKind::OutputLengthUnsupported,
            Self::InvalidKeyOrNonceSize { .. } => FailureKind::InvalidKeyOrNonceSize,
            Self::AuthenticationFailed => FailureKind::AuthenticationFailed,
            Self::PlaintextMismatch => FailureKind::PlaintextMismatch,
            Self::PlaintextTooLong { .. } => FailureKind::PlaintextTooLong,
            Self::MalformedSealedMessage { .. } => FailureKind::MalformedSealedMessage,
            Self::InvalidState { .. } => FailureKind::InvalidState,
        }
    }

    /// Returns true if this error indicates a bug rather than bad input or a
    /// failing environment.
    ///
    /// Defects are internal consistency violations: correct primitives
    /// driven in order never produce them.
    pub fn is_defect(&self) -> bool {
        match self {
            Self::SharedSecretMismatch { .. } | Self::PlaintextMismatch => true,

            Self::RandomnessUnavailable { .. }
            | Self::InvalidPeerKey
            | Self::OutputLengthUnsupported { .. }
            | Self::InvalidKeyOrNonceSize { .. }
            | Self::AuthenticationFailed
            | Self::PlaintextTooLong { .. }
            | Self::MalformedSealedMessage { .. }
            | Self::InvalidState { .. } => false,
        }
    }
}

impl From<CryptoError> for SessionError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::RandomnessUnavailable { reason } => Self::RandomnessUnavailable { reason },
            CryptoError::InvalidPeerKey => Self::InvalidPeerKey,
            CryptoError::OutputLengthUnsupported { requested, max } => {
                Self::OutputLengthUnsupported { requested, max }
            },
            CryptoError::InvalidKeyOrNonceSize { key_len, nonce_len } => {
                Self::InvalidKeyOrNonceSize { key_len, nonce_len }
            },
            CryptoError::AuthenticationFailed => Self::AuthenticationFailed,
            CryptoError::PlaintextTooLong { len } => Self::PlaintextTooLong { len },
            CryptoError::MalformedSealedMessage { len, min } => {
                Self::MalformedSealedMessage { len, min }
            },
        }
    }
}
