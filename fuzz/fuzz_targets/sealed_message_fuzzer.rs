//! Fuzz target for sealed message parsing and decryption
//!
//! Feeds attacker-controlled packaged bytes to the receiver side.
//!
//! # Strategy
//!
//! - Arbitrary packaged bytes (shorter and longer than nonce plus tag)
//! - Arbitrary session keys
//! - Seal/open round-trips followed by single-byte corruption
//!
//! # Invariants
//!
//! - Parsing never panics and rejects only inputs shorter than 28 bytes
//! - Parse then package reproduces the input exactly
//! - Opening forged input never succeeds
//! - Round-trip restores the plaintext
//! - Any corrupted byte fails authentication

#![no_main]

use arbitrary::Arbitrary;
use keyseal_crypto::{CryptoError, SealedMessage, SeededRandom, SessionKey};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct SealedScenario {
    /// Key the receiver holds
    key: [u8; 32],
    /// Bytes received off the wire
    packaged: Vec<u8>,
    /// Plaintext for the honest round-trip
    plaintext: Vec<u8>,
    /// Seed for the nonce source
    seed: u64,
    /// Byte to corrupt in the honest message
    corrupt_at: usize,
    /// Non-zero corruption mask
    mask: std::num::NonZeroU8,
}

fuzz_target!(|scenario: SealedScenario| {
    let key = SessionKey::from_bytes(scenario.key);

    // INVARIANT 1: Parsing never panics, rejects only short input
    match SealedMessage::from_bytes(&scenario.packaged) {
        Ok(message) => {
            assert!(scenario.packaged.len() >= SealedMessage::MIN_PACKAGED_LEN);

            // INVARIANT 2: Packaging is the inverse of parsing
            assert_eq!(message.to_bytes(), scenario.packaged);

            // INVARIANT 3: Forged input does not authenticate
            assert!(matches!(message.open(&key), Err(CryptoError::AuthenticationFailed)));
        },
        Err(err) => {
            assert!(scenario.packaged.len() < SealedMessage::MIN_PACKAGED_LEN);
            assert!(matches!(err, CryptoError::MalformedSealedMessage { .. }));
        },
    }

    let mut rng = SeededRandom::from_u64(scenario.seed);
    let Ok(sealed) = SealedMessage::seal(&key, &mut rng, &scenario.plaintext) else {
        return;
    };

    // INVARIANT 4: Round-trip restores the plaintext
    let packaged = sealed.to_bytes();
    let parsed = SealedMessage::from_bytes(&packaged).expect("own package must parse");
    let opened = parsed.open(&key).expect("own message must open");
    assert_eq!(opened.as_slice(), scenario.plaintext.as_slice());

    // INVARIANT 5: Any corrupted byte fails authentication
    let mut corrupted = packaged;
    let index = scenario.corrupt_at % corrupted.len();
    corrupted[index] ^= scenario.mask.get();
    let parsed = SealedMessage::from_bytes(&corrupted).expect("length unchanged");
    assert!(matches!(parsed.open(&key), Err(CryptoError::AuthenticationFailed)));
});
