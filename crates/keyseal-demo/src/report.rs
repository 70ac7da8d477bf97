//! Transcript rendering.

use std::{fmt, io};

use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use keyseal_session::SessionOutcome;

/// Encode bytes for display: standard alphabet, no padding.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Display-ready view of a finished session.
///
/// Holds only encoded strings, so the session key bytes are not kept alive
/// past construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Alice's public key
    pub alice_public: String,
    /// Bob's public key
    pub bob_public: String,
    /// Derived session key
    pub session_key: String,
    /// Packaged message: nonce || ciphertext || tag
    pub encrypted: String,
    /// Text Bob recovered
    pub decrypted: String,
}

impl Report {
    /// Encode every displayable field of `outcome`.
    pub fn from_outcome(outcome: &SessionOutcome) -> Self {
        Self {
            alice_public: encode(outcome.alice_public.as_bytes()),
            bob_public: encode(outcome.bob_public.as_bytes()),
            session_key: encode(outcome.session_key.as_bytes()),
            encrypted: encode(&outcome.packaged),
            decrypted: outcome.decrypted.clone(),
        }
    }

    /// Write the transcript to `out`.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alice public (base64): {}", self.alice_public)?;
        writeln!(f, "Bob public (base64): {}", self.bob_public)?;
        writeln!(f, "Session key (HKDF, base64): {}", self.session_key)?;
        writeln!(f, "Encrypted (iv+cipher, base64): {}", self.encrypted)?;
        writeln!(f, "Decrypted text: {}", self.decrypted)
    }
}
