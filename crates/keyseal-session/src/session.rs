//! Session orchestrator state machine.
//!
//! Drives one complete exchange between two local parties: key generation,
//! agreement, derivation, one seal by Alice and one open by Bob. Every step
//! is a method that checks the current state, so callers (and tests) can sit
//! between steps and play the role of the transport, e.g. substituting the
//! public key Alice receives.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐ generate ┌───────────────┐ agree ┌───────────────────┐ verify
//! │ Init │─────────>│ KeysGenerated │──────>│ AgreementComputed │───────┐
//! └──────┘          └───────────────┘       └───────────────────┘       │
//!                                                                       ↓
//! ┌────────┐ open ┌────────┐ seal ┌─────────────┐ derive ┌───────────────────┐
//! │ Opened │<─────│ Sealed │<─────│ KeysDerived │<───────│ AgreementVerified │
//! └────────┘      └────────┘      └─────────────┘        └───────────────────┘
//!     │ finish
//!     ↓
//! ┌──────┐        any step may end in  ┌────────────────┐
//! │ Done │                 ───────────>│ Failed(reason) │
//! └──────┘                             └────────────────┘
//! ```
//!
//! There are no retries. A failed session keeps its [`FailureKind`] and
//! rejects every further operation. Key material held by the session is
//! dropped (and zeroized) as soon as it fails or finishes.

use std::mem;

use keyseal_crypto::{PublicKey, RandomSource, SealedMessage, SessionKey, SharedSecret};

use crate::{
    config::SessionConfig,
    error::{FailureKind, SessionError},
    party::{ALICE, BOB, Party},
};

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing generated yet
    Init,
    /// Both parties hold key pairs
    KeysGenerated,
    /// Both parties computed a shared secret
    AgreementComputed,
    /// The two shared secrets are equal
    AgreementVerified,
    /// Both parties derived identical session keys
    KeysDerived,
    /// Alice sealed the message
    Sealed,
    /// Bob opened the message
    Opened,
    /// Round-trip verified, outcome handed out
    Done,
    /// Terminal failure
    Failed(FailureKind),
}

/// Everything the presentation layer may display after a successful run.
///
/// Private keys are deliberately absent.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Alice's public key
    pub alice_public: PublicKey,
    /// Bob's public key
    pub bob_public: PublicKey,
    /// The agreed session key
    pub session_key: SessionKey,
    /// Text that was sealed (after default substitution)
    pub plaintext: String,
    /// `nonce || ciphertext || tag` as sent to Bob
    pub packaged: Vec<u8>,
    /// Text Bob recovered
    pub decrypted: String,
}

#[derive(Debug)]
struct Parties {
    alice: Party,
    bob: Party,
}

impl Parties {
    fn generate<R: RandomSource>(rng: &mut R) -> Result<Self, SessionError> {
        let alice = Party::generate(ALICE, rng)?;
        let bob = Party::generate(BOB, rng)?;
        Ok(Self { alice, bob })
    }

    fn agree(
        &self,
        received_by_alice: &PublicKey,
        received_by_bob: &PublicKey,
    ) -> Result<Secrets, SessionError> {
        let alice = self.alice.agree(received_by_alice)?;
        let bob = self.bob.agree(received_by_bob)?;
        Ok(Secrets { alice, bob })
    }

    fn derive(&self, secrets: &Secrets, config: &SessionConfig) -> Result<Keys, SessionError> {
        let alice = self.alice.derive_session_key(&secrets.alice, config)?;
        let bob = self.bob.derive_session_key(&secrets.bob, config)?;
        Ok(Keys { alice, bob })
    }
}

#[derive(Debug)]
struct Secrets {
    alice: SharedSecret,
    bob: SharedSecret,
}

#[derive(Debug)]
struct Keys {
    alice: SessionKey,
    bob: SessionKey,
}

#[derive(Debug)]
struct Transmission {
    plaintext: String,
    packaged: Vec<u8>,
}

/// Internal state with the material each step owns.
#[derive(Debug)]
enum Stage {
    Init,
    KeysGenerated(Parties),
    AgreementComputed(Parties, Secrets),
    AgreementVerified(Parties, Secrets),
    KeysDerived(Parties, Keys),
    Sealed(Parties, Keys, Transmission),
    Opened(Parties, Keys, Transmission, String),
    Done,
    Failed(FailureKind),
}

impl Stage {
    fn state(&self) -> SessionState {
        match self {
            Self::Init => SessionState::Init,
            Self::KeysGenerated(..) => SessionState::KeysGenerated,
            Self::AgreementComputed(..) => SessionState::AgreementComputed,
            Self::AgreementVerified(..) => SessionState::AgreementVerified,
            Self::KeysDerived(..) => SessionState::KeysDerived,
            Self::Sealed(..) => SessionState::Sealed,
            Self::Opened(..) => SessionState::Opened,
            Self::Done => SessionState::Done,
            Self::Failed(kind) => SessionState::Failed(*kind),
        }
    }

    fn parties(&self) -> Option<&Parties> {
        match self {
            Self::KeysGenerated(parties)
            | Self::AgreementComputed(parties, _)
            | Self::AgreementVerified(parties, _)
            | Self::KeysDerived(parties, _)
            | Self::Sealed(parties, ..)
            | Self::Opened(parties, ..) => Some(parties),
            Self::Init | Self::Done | Self::Failed(_) => None,
        }
    }
}

/// Single-pass two-party session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    stage: Stage,
}

impl Session {
    /// Create a session in [`SessionState::Init`].
    pub fn new(config: SessionConfig) -> Self {
        Self { config, stage: Stage::Init }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.stage.state()
    }

    /// Configuration this session runs with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run every step in order and return the outcome.
    ///
    /// An empty `plaintext` is replaced by
    /// [`SessionConfig::default_plaintext`].
    pub fn run<R: RandomSource>(
        &mut self,
        rng: &mut R,
        plaintext: &str,
    ) -> Result<SessionOutcome, SessionError> {
        self.generate_keys(rng)?;

        let (alice_public, bob_public) = self.public_keys()?;
        self.compute_agreement(&bob_public, &alice_public)?;
        self.verify_agreement()?;
        self.derive_keys()?;

        let packaged = self.seal(rng, plaintext)?;
        self.open(&packaged)?;

        self.finish()
    }

    /// Generate key pairs for Alice and Bob.
    pub fn generate_keys<R: RandomSource>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::Init) {
            return Err(self.invalid_state("generate keys"));
        }

        match Parties::generate(rng) {
            Ok(parties) => {
                self.transition(Stage::KeysGenerated(parties));
                Ok(())
            },
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Public keys `(alice, bob)` to be exchanged.
    pub fn public_keys(&self) -> Result<(PublicKey, PublicKey), SessionError> {
        self.stage
            .parties()
            .map(|parties| (*parties.alice.public_key(), *parties.bob.public_key()))
            .ok_or_else(|| self.invalid_state("read public keys"))
    }

    /// Each party computes a shared secret from the public key it received.
    pub fn compute_agreement(
        &mut self,
        received_by_alice: &PublicKey,
        received_by_bob: &PublicKey,
    ) -> Result<(), SessionError> {
        let parties = match self.take_stage() {
            Stage::KeysGenerated(parties) => parties,
            other => return Err(self.restore(other, "compute agreement")),
        };

        match parties.agree(received_by_alice, received_by_bob) {
            Ok(secrets) => {
                self.transition(Stage::AgreementComputed(parties, secrets));
                Ok(())
            },
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Check that both parties computed the same secret.
    pub fn verify_agreement(&mut self) -> Result<(), SessionError> {
        let (parties, secrets) = match self.take_stage() {
            Stage::AgreementComputed(parties, secrets) => (parties, secrets),
            other => return Err(self.restore(other, "verify agreement")),
        };

        if !secrets.alice.ct_eq(&secrets.bob) {
            return Err(self.fail(SessionError::SharedSecretMismatch { stage: "agreement" }));
        }

        self.transition(Stage::AgreementVerified(parties, secrets));
        Ok(())
    }

    /// Each party derives its session key. The keys must match.
    pub fn derive_keys(&mut self) -> Result<(), SessionError> {
        let (parties, secrets) = match self.take_stage() {
            Stage::AgreementVerified(parties, secrets) => (parties, secrets),
            other => return Err(self.restore(other, "derive keys")),
        };

        let keys = match parties.derive(&secrets, &self.config) {
            Ok(keys) => keys,
            Err(err) => return Err(self.fail(err)),
        };

        if !keys.alice.ct_eq(&keys.bob) {
            return Err(self.fail(SessionError::SharedSecretMismatch { stage: "derivation" }));
        }

        self.transition(Stage::KeysDerived(parties, keys));
        Ok(())
    }

    /// Alice seals `plaintext` under her session key with a fresh nonce.
    ///
    /// Returns the packaged `nonce || ciphertext || tag` to hand to Bob.
    pub fn seal<R: RandomSource>(
        &mut self,
        rng: &mut R,
        plaintext: &str,
    ) -> Result<Vec<u8>, SessionError> {
        let (parties, keys) = match self.take_stage() {
            Stage::KeysDerived(parties, keys) => (parties, keys),
            other => return Err(self.restore(other, "seal")),
        };

        let plaintext = self.config.effective_plaintext(plaintext).to_string();
        let sealed = match SealedMessage::seal(&keys.alice, rng, plaintext.as_bytes()) {
            Ok(sealed) => sealed,
            Err(err) => return Err(self.fail(err.into())),
        };

        let packaged = sealed.to_bytes();
        tracing::debug!(
            party = parties.alice.name(),
            plaintext_len = plaintext.len(),
            packaged_len = packaged.len(),
            "message sealed"
        );

        let transmission = Transmission { plaintext, packaged: packaged.clone() };
        self.transition(Stage::Sealed(parties, keys, transmission));
        Ok(packaged)
    }

    /// Bob opens the packaged message he received.
    ///
    /// Returns the recovered text. On authentication failure nothing is
    /// returned and the session fails.
    pub fn open(&mut self, packaged: &[u8]) -> Result<String, SessionError> {
        let (parties, keys, transmission) = match self.take_stage() {
            Stage::Sealed(parties, keys, transmission) => (parties, keys, transmission),
            other => return Err(self.restore(other, "open")),
        };

        let opened =
            SealedMessage::from_bytes(packaged).and_then(|received| received.open(&keys.bob));
        let opened = match opened {
            Ok(opened) => opened,
            Err(err) => return Err(self.fail(err.into())),
        };

        let Ok(decrypted) = String::from_utf8(opened.to_vec()) else {
            return Err(self.fail(SessionError::PlaintextMismatch));
        };

        tracing::debug!(party = parties.bob.name(), len = decrypted.len(), "message opened");

        self.transition(Stage::Opened(parties, keys, transmission, decrypted.clone()));
        Ok(decrypted)
    }

    /// Confirm the round-trip and release the outcome.
    ///
    /// Private keys are dropped here.
    pub fn finish(&mut self) -> Result<SessionOutcome, SessionError> {
        let (parties, keys, transmission, decrypted) = match self.take_stage() {
            Stage::Opened(parties, keys, transmission, decrypted) => {
                (parties, keys, transmission, decrypted)
            },
            other => return Err(self.restore(other, "finish")),
        };

        if decrypted != transmission.plaintext {
            return Err(self.fail(SessionError::PlaintextMismatch));
        }

        let outcome = SessionOutcome {
            alice_public: *parties.alice.public_key(),
            bob_public: *parties.bob.public_key(),
            session_key: keys.alice,
            plaintext: transmission.plaintext,
            packaged: transmission.packaged,
            decrypted,
        };

        self.transition(Stage::Done);
        tracing::info!(packaged_len = outcome.packaged.len(), "session complete");

        Ok(outcome)
    }

    fn take_stage(&mut self) -> Stage {
        mem::replace(&mut self.stage, Stage::Init)
    }

    fn restore(&mut self, stage: Stage, operation: &'static str) -> SessionError {
        self.stage = stage;
        self.invalid_state(operation)
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState { state: self.state(), operation }
    }

    fn transition(&mut self, next: Stage) {
        tracing::debug!(state = ?next.state(), "session transition");
        self.stage = next;
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        if err.is_defect() {
            tracing::error!(error = %err, "session failed on internal consistency check");
        } else {
            tracing::warn!(error = %err, "session failed");
        }

        self.stage = Stage::Failed(err.kind());
        err
    }
}
