//! Session
//!
//! Two-party ephemeral key exchange followed by a single authenticated
//! encryption round-trip, run locally between Alice and Bob.
//!
//! # Architecture
//!
//! [`Session`] is a pure state machine over the primitives in
//! [`keyseal_crypto`]: it performs no I/O and takes its randomness as an
//! injected [`RandomSource`]. Each protocol step is a method, and
//! [`Session::run`] drives them all in order. The only values that cross
//! between the parties are their public keys and the packaged sealed message,
//! both of which the caller can observe (and tamper with) between steps.
//!
//! # Components
//!
//! - [`Session`]: Linear orchestrator with terminal failure states
//! - [`Party`]: Named participant owning an ephemeral key pair
//! - [`SessionConfig`]: Context label, salt, key length and default message
//! - [`SessionError`]: Failure causes, one per distinguishable kind

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod party;
mod session;

pub use config::{DEFAULT_PLAINTEXT, SessionConfig};
pub use error::{FailureKind, SessionError};
pub use keyseal_crypto::{OsRandom, PublicKey, RandomSource, SeededRandom, SessionKey};
pub use party::{ALICE, BOB, Party};
pub use session::{Session, SessionOutcome, SessionState};
