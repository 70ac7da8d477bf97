//! End-to-end session scenarios.
//!
//! These tests drive the full exchange through the public API:
//! - The canonical Alice → Bob round-trip with the default label
//! - Empty-plaintext substitution
//! - Degenerate peer keys rejected during agreement
//! - Reproducibility under a seeded random source
//! - A run against the OS random source

use keyseal_session::{
    DEFAULT_PLAINTEXT, FailureKind, OsRandom, PublicKey, SeededRandom, Session, SessionConfig,
    SessionError, SessionState,
};

/// Label the session key is bound to.
const LABEL: &[u8] = b"X25519-HKDF-AES-Session";

#[test]
fn alice_to_bob_round_trip() {
    let config = SessionConfig::default();
    assert_eq!(config.context_label, LABEL);
    assert_eq!(config.salt, None);
    assert_eq!(config.key_length, 32);

    let mut session = Session::new(config);
    let outcome = session.run(&mut SeededRandom::from_u64(2024), "Hello from Alice!").unwrap();

    assert_eq!(session.state(), SessionState::Done);
    assert_eq!(outcome.plaintext, "Hello from Alice!");
    assert_eq!(outcome.decrypted, "Hello from Alice!");
    assert_eq!(outcome.session_key.as_bytes().len(), 32);
    assert_ne!(outcome.alice_public, outcome.bob_public);
}

#[test]
fn both_parties_derive_the_same_key() {
    let mut rng = SeededRandom::from_u64(77);
    let mut session = Session::new(SessionConfig::default());

    session.generate_keys(&mut rng).unwrap();
    let (alice, bob) = session.public_keys().unwrap();
    session.compute_agreement(&bob, &alice).unwrap();
    session.verify_agreement().unwrap();

    // derive_keys fails with SharedSecretMismatch if the two keys differ
    session.derive_keys().unwrap();
    assert_eq!(session.state(), SessionState::KeysDerived);
}

#[test]
fn empty_plaintext_round_trips_default() {
    let mut session = Session::new(SessionConfig::default());

    let outcome = session.run(&mut SeededRandom::from_u64(1), "").unwrap();

    assert_eq!(outcome.plaintext, DEFAULT_PLAINTEXT);
    assert_eq!(outcome.decrypted, "Hello from Alice!");
}

#[test]
fn custom_default_plaintext_is_used() {
    let config =
        SessionConfig { default_plaintext: "fallback".to_string(), ..SessionConfig::default() };
    let mut session = Session::new(config);

    let outcome = session.run(&mut SeededRandom::from_u64(1), "").unwrap();

    assert_eq!(outcome.decrypted, "fallback");
}

#[test]
fn degenerate_peer_key_is_rejected() {
    // Low-order points: u = 0 and u = 1
    let mut order_four = [0u8; 32];
    order_four[0] = 1;

    for degenerate in [[0u8; 32], order_four] {
        let mut session = Session::new(SessionConfig::default());
        session.generate_keys(&mut SeededRandom::from_u64(5)).unwrap();
        let (_, bob) = session.public_keys().unwrap();

        let err = session.compute_agreement(&bob, &PublicKey::from_bytes(degenerate)).unwrap_err();

        assert_eq!(err, SessionError::InvalidPeerKey);
        assert_eq!(session.state(), SessionState::Failed(FailureKind::InvalidPeerKey));
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let mut session = Session::new(SessionConfig::default());
        session.run(&mut SeededRandom::from_u64(seed), "reproducible").unwrap()
    };

    let first = run(42);
    let second = run(42);
    let other = run(43);

    assert_eq!(first.alice_public, second.alice_public);
    assert_eq!(first.bob_public, second.bob_public);
    assert!(first.session_key.ct_eq(&second.session_key));
    assert_eq!(first.packaged, second.packaged);

    assert_ne!(first.alice_public, other.alice_public);
    assert_ne!(first.packaged, other.packaged);
}

#[test]
fn salt_and_label_change_the_session_key() {
    let run = |config: SessionConfig| {
        let mut session = Session::new(config);
        session.run(&mut SeededRandom::from_u64(8), "same keys").unwrap()
    };

    let plain = run(SessionConfig::default());
    let salted = run(SessionConfig::default().with_salt(b"salt".to_vec()));
    let relabeled = run(SessionConfig::default().with_context_label("another-label"));

    // Same seed, same key pairs
    assert_eq!(plain.alice_public, salted.alice_public);

    assert!(!plain.session_key.ct_eq(&salted.session_key));
    assert!(!plain.session_key.ct_eq(&relabeled.session_key));
}

#[test]
fn packaged_message_layout() {
    let mut session = Session::new(SessionConfig::default());

    let outcome = session.run(&mut SeededRandom::from_u64(3), "layout").unwrap();

    // nonce(12) || ciphertext(6) || tag(16)
    assert_eq!(outcome.packaged.len(), 12 + 6 + 16);
}

#[test]
fn unicode_plaintext_round_trips() {
    let mut session = Session::new(SessionConfig::default());

    let outcome = session.run(&mut SeededRandom::from_u64(4), "héllo wörld ✓").unwrap();

    assert_eq!(outcome.decrypted, "héllo wörld ✓");
}

#[test]
fn os_random_session_completes() {
    let mut session = Session::new(SessionConfig::default());

    let outcome = session.run(&mut OsRandom::new(), "Hello from Alice!").unwrap();

    assert_eq!(outcome.decrypted, "Hello from Alice!");
    assert_eq!(session.state(), SessionState::Done);
}

#[test]
fn failure_kinds_are_distinguishable() {
    let kinds = [
        SessionError::RandomnessUnavailable { reason: "x".to_string() }.kind(),
        SessionError::InvalidPeerKey.kind(),
        SessionError::SharedSecretMismatch { stage: "agreement" }.kind(),
        SessionError::OutputLengthUnsupported { requested: 1, max: 0 }.kind(),
        SessionError::InvalidKeyOrNonceSize { key_len: 1, nonce_len: 1 }.kind(),
        SessionError::AuthenticationFailed.kind(),
    ];

    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
