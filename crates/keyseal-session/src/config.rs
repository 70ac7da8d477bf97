//! Session configuration.

use keyseal_crypto::{SESSION_KEY_LABEL, SESSION_KEY_SIZE};

/// Message sealed when the caller supplies an empty plaintext.
pub const DEFAULT_PLAINTEXT: &str = "Hello from Alice!";

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// HKDF info parameter binding the key to this protocol
    pub context_label: Vec<u8>,
    /// HKDF salt. `None` means `HashLen` zero bytes
    pub salt: Option<Vec<u8>>,
    /// Derived key length in bytes. AES-256-GCM only accepts 32
    pub key_length: usize,
    /// Substituted for an empty plaintext
    pub default_plaintext: String,
}

impl SessionConfig {
    /// Replace the context label.
    #[must_use]
    pub fn with_context_label(mut self, label: impl Into<Vec<u8>>) -> Self {
        self.context_label = label.into();
        self
    }

    /// Set an HKDF salt.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Text that will actually be sealed for `plaintext`.
    pub fn effective_plaintext<'a>(&'a self, plaintext: &'a str) -> &'a str {
        if plaintext.is_empty() { &self.default_plaintext } else { plaintext }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            context_label: SESSION_KEY_LABEL.to_vec(),
            salt: None,
            key_length: SESSION_KEY_SIZE,
            default_plaintext: DEFAULT_PLAINTEXT.to_string(),
        }
    }
}
