//! Fuzz target for the session orchestrator under an active attacker
//!
//! The attacker may replace either public key in transit and rewrite the
//! packaged message between seal and open.
//!
//! # Invariants
//!
//! - The session never panics and ends in `Done` or `Failed`
//! - A failed session refuses every further operation
//! - An untouched exchange decrypts to the effective plaintext
//! - A rewritten package never opens

#![no_main]

use arbitrary::Arbitrary;
use keyseal_session::{
    FailureKind, PublicKey, SeededRandom, Session, SessionConfig, SessionError, SessionState,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct TransitScenario {
    seed: u64,
    message: String,
    /// Key delivered to Alice instead of Bob's
    to_alice: Option<[u8; 32]>,
    /// Key delivered to Bob instead of Alice's
    to_bob: Option<[u8; 32]>,
    /// Replacement for the packaged message
    packaged: Option<Vec<u8>>,
}

fn assert_terminal(session: &mut Session, err: &SessionError) {
    assert_eq!(session.state(), SessionState::Failed(err.kind()));

    // INVARIANT 2: Failed sessions refuse further work
    let after = session.finish().expect_err("failed session must not finish");
    assert_eq!(after.kind(), FailureKind::InvalidState);
    assert_eq!(session.state(), SessionState::Failed(err.kind()));
}

fn agree(
    session: &mut Session,
    to_alice: &PublicKey,
    to_bob: &PublicKey,
) -> Result<(), SessionError> {
    session.compute_agreement(to_alice, to_bob)?;
    session.verify_agreement()?;
    session.derive_keys()
}

fuzz_target!(|scenario: TransitScenario| {
    let mut rng = SeededRandom::from_u64(scenario.seed);
    let mut session = Session::new(SessionConfig::default());

    session.generate_keys(&mut rng).expect("seeded randomness never fails");
    let (alice, bob) = session.public_keys().expect("keys generated");

    let to_alice = scenario.to_alice.map_or(bob, PublicKey::from_bytes);
    let to_bob = scenario.to_bob.map_or(alice, PublicKey::from_bytes);

    // INVARIANT 1: Every step either advances or fails terminally
    if let Err(err) = agree(&mut session, &to_alice, &to_bob) {
        assert_terminal(&mut session, &err);
        return;
    }

    let honest = session.seal(&mut rng, &scenario.message).expect("sealing a string succeeds");
    let delivered = scenario.packaged.unwrap_or_else(|| honest.clone());

    match session.open(&delivered) {
        Ok(text) => {
            // INVARIANT 4: Only the honest package opens
            assert_eq!(delivered, honest);

            // INVARIANT 3: Untouched exchange round-trips
            let expected = session.config().effective_plaintext(&scenario.message).to_string();
            assert_eq!(text, expected);

            let outcome = session.finish().expect("opened session finishes");
            assert_eq!(outcome.decrypted, expected);
            assert_eq!(session.state(), SessionState::Done);
        },
        Err(err) => {
            assert_ne!(delivered, honest);
            assert_terminal(&mut session, &err);
        },
    }
});
