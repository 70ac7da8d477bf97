//! Keyseal Cryptographic Primitives
//!
//! Building blocks for an ephemeral key-exchange-then-encrypt session. All
//! functions are pure except where a [`RandomSource`] is passed in, so tests
//! can substitute a seeded source for reproducible fixtures.
//!
//! # Key Lifecycle
//!
//! ```text
//! RandomSource ──► X25519 KeyPair (per party)
//!                        │
//!                        ▼  diffie_hellman(own private, peer public)
//!                  SharedSecret (32 bytes)
//!                        │
//!                        ▼  HKDF-SHA256(salt, secret, label)
//!                  SessionKey (32 bytes)
//!                        │
//!                        ▼  AES-256-GCM(key, fresh nonce)
//!                  SealedMessage = nonce(12) || ciphertext || tag(16)
//! ```
//!
//! # Security
//!
//! Secrecy:
//! - Private scalars, shared secrets and session keys are zeroized on drop
//! - None of them implement a revealing `Debug`
//!
//! Integrity:
//! - AES-256-GCM tag verified in constant time
//! - Failed authentication tag -> no plaintext is returned
//!
//! Degenerate keys:
//! - Agreement with a low-order peer point yields an all-zero secret, which
//!   is rejected instead of being fed to HKDF
//!
//! The exchange is unauthenticated. Nothing binds a public key to an
//! identity.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod agreement;
pub mod cipher;
pub mod derivation;
pub mod error;
pub mod random;

pub use agreement::{KeyPair, PublicKey, SharedSecret, X25519_KEY_SIZE};
pub use cipher::{KEY_SIZE, NONCE_SIZE, SealedMessage, TAG_SIZE, open, seal};
pub use derivation::{
    MAX_OUTPUT_LEN, SESSION_KEY_LABEL, SESSION_KEY_SIZE, SessionKey, derive_key,
    derive_session_key,
};
pub use error::CryptoError;
pub use random::{OsRandom, RandomSource, SeededRandom};
