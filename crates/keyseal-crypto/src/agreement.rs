//! X25519 key agreement (RFC 7748)
//!
//! # Security
//!
//! - Private scalars live in `x25519_dalek::StaticSecret`, zeroized on drop
//! - Shared secrets are wrapped in `Zeroizing<>`
//! - Agreement results that are all-zero (low-order peer point) are rejected

use std::fmt;

use subtle::ConstantTimeEq;
use x25519_dalek::StaticSecret;
use zeroize::Zeroizing;

use crate::{error::CryptoError, random::RandomSource};

/// Size of an X25519 scalar, point and shared secret (32 bytes)
pub const X25519_KEY_SIZE: usize = 32;

/// X25519 public key (a Montgomery u-coordinate).
///
/// Safe to share and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; X25519_KEY_SIZE]);

impl PublicKey {
    /// Wrap raw bytes received from a peer.
    ///
    /// Any 32-byte value is accepted here. Degenerate points are caught by
    /// [`KeyPair::compute_shared_secret`].
    pub fn from_bytes(bytes: [u8; X25519_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw 32-byte encoding.
    pub fn as_bytes(&self) -> &[u8; X25519_KEY_SIZE] {
        &self.0
    }
}

impl From<[u8; X25519_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; X25519_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Raw output of X25519 agreement.
///
/// Input key material for [`crate::derive_key`]. Zeroized on drop.
pub struct SharedSecret(Zeroizing<[u8; X25519_KEY_SIZE]>);

impl SharedSecret {
    /// Raw 32-byte secret.
    pub fn as_bytes(&self) -> &[u8; X25519_KEY_SIZE] {
        &self.0
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// Ephemeral X25519 key pair.
///
/// The private scalar never leaves this struct: there is no accessor for it
/// and `Debug` only prints the public key.
pub struct KeyPair {
    private_key: StaticSecret,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a key pair from 32 bytes of the supplied random source.
    ///
    /// Clamping is applied by X25519 itself, so every 32-byte string is a
    /// valid private key.
    ///
    /// # Errors
    ///
    /// - `RandomnessUnavailable`: the random source failed
    pub fn generate<R: RandomSource>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut scalar = Zeroizing::new([0u8; X25519_KEY_SIZE]);
        rng.try_fill_bytes(&mut scalar[..])?;
        Ok(Self::from_private_bytes(*scalar))
    }

    /// Build a key pair from a known private scalar.
    ///
    /// Intended for known-answer tests. Use [`KeyPair::generate`] otherwise.
    #[doc(hidden)]
    pub fn from_private_bytes(private: [u8; X25519_KEY_SIZE]) -> Self {
        let private_key = StaticSecret::from(private);
        let public_key = PublicKey(x25519_dalek::PublicKey::from(&private_key).to_bytes());
        Self { private_key, public_key }
    }

    /// Public half of the pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// X25519 agreement with a peer's public key.
    ///
    /// # Errors
    ///
    /// - `InvalidPeerKey`: the peer point is of low order and the result is
    ///   all zeros
    pub fn compute_shared_secret(
        &self,
        peer_public: &PublicKey,
    ) -> Result<SharedSecret, CryptoError> {
        let peer = x25519_dalek::PublicKey::from(peer_public.0);
        let shared = self.private_key.diffie_hellman(&peer);

        if !shared.was_contributory() {
            return Err(CryptoError::InvalidPeerKey);
        }

        Ok(SharedSecret(Zeroizing::new(shared.to_bytes())))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
