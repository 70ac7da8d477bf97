//! A participant in the exchange.

use keyseal_crypto::{KeyPair, PublicKey, RandomSource, SessionKey, SharedSecret, derive_key};

use crate::{config::SessionConfig, error::SessionError};

/// Name of the sending party.
pub const ALICE: &str = "Alice";

/// Name of the receiving party.
pub const BOB: &str = "Bob";

/// A named party owning an ephemeral key pair.
///
/// Only the public key is observable from outside.
#[derive(Debug)]
pub struct Party {
    name: &'static str,
    key_pair: KeyPair,
}

impl Party {
    /// Generate a fresh key pair for `name`.
    pub fn generate<R: RandomSource>(
        name: &'static str,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let key_pair = KeyPair::generate(rng)?;
        Ok(Self { name, key_pair })
    }

    /// Wrap an existing key pair.
    pub fn from_key_pair(name: &'static str, key_pair: KeyPair) -> Self {
        Self { name, key_pair }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Public key to send to the peer.
    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    /// Compute the shared secret with a received peer public key.
    pub fn agree(&self, peer_public: &PublicKey) -> Result<SharedSecret, SessionError> {
        self.key_pair.compute_shared_secret(peer_public).map_err(|err| {
            tracing::warn!(party = self.name, error = %err, "key agreement rejected peer key");
            SessionError::from(err)
        })
    }

    /// Derive this party's session key from its shared secret.
    pub fn derive_session_key(
        &self,
        shared_secret: &SharedSecret,
        config: &SessionConfig,
    ) -> Result<SessionKey, SessionError> {
        let okm = derive_key(
            shared_secret.as_bytes(),
            &config.context_label,
            config.salt.as_deref(),
            config.key_length,
        )?;

        Ok(SessionKey::from_slice(&okm)?)
    }
}
