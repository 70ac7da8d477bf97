//! Fuzz target for X25519 agreement and HKDF derivation
//!
//! # Strategy
//!
//! - Arbitrary private scalars and peer public keys, including low-order points
//! - Arbitrary context labels, salts and output lengths around the HKDF limit
//!
//! # Invariants
//!
//! - Agreement with an arbitrary peer key either succeeds or reports
//!   `InvalidPeerKey`, never an all-zero secret
//! - Agreement between two honest key pairs is commutative
//! - Derivation is deterministic and honors the output length limit

#![no_main]

use arbitrary::Arbitrary;
use keyseal_crypto::{derive_key, CryptoError, KeyPair, PublicKey, MAX_OUTPUT_LEN};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct AgreementScenario {
    /// Local private scalar
    private: [u8; 32],
    /// Second honest party's scalar
    other_private: [u8; 32],
    /// Untrusted peer public key
    peer: [u8; 32],
    /// HKDF info
    label: Vec<u8>,
    /// HKDF salt
    salt: Option<Vec<u8>>,
    /// Requested output length, mapped around the limit
    length: u16,
}

fuzz_target!(|scenario: AgreementScenario| {
    let local = KeyPair::from_private_bytes(scenario.private);
    let peer = PublicKey::from_bytes(scenario.peer);

    // INVARIANT 1: Untrusted peer keys never yield an all-zero secret
    match local.compute_shared_secret(&peer) {
        Ok(secret) => assert_ne!(secret.as_bytes(), &[0u8; 32]),
        Err(err) => assert_eq!(err, CryptoError::InvalidPeerKey),
    }

    // INVARIANT 2: Honest agreement is commutative
    let other = KeyPair::from_private_bytes(scenario.other_private);
    let (Ok(ab), Ok(ba)) = (
        local.compute_shared_secret(other.public_key()),
        other.compute_shared_secret(local.public_key()),
    ) else {
        return;
    };
    assert!(ab.ct_eq(&ba));

    // INVARIANT 3: Derivation respects the HKDF output limit
    let length = usize::from(scenario.length) % (MAX_OUTPUT_LEN + 64);
    let salt = scenario.salt.as_deref();
    match derive_key(ab.as_bytes(), &scenario.label, salt, length) {
        Ok(okm) => {
            assert!(length <= MAX_OUTPUT_LEN);
            assert_eq!(okm.len(), length);

            // INVARIANT 4: Derivation is deterministic
            let again = derive_key(ba.as_bytes(), &scenario.label, salt, length)
                .expect("same inputs must derive");
            assert_eq!(okm.as_slice(), again.as_slice());
        },
        Err(err) => {
            assert!(length > MAX_OUTPUT_LEN);
            assert_eq!(
                err,
                CryptoError::OutputLengthUnsupported { requested: length, max: MAX_OUTPUT_LEN }
            );
        },
    }
});
