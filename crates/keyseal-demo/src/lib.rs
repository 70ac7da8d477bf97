//! Keyseal demo presentation layer.
//!
//! Turns a completed [`keyseal_session::SessionOutcome`] into the
//! human-readable transcript printed by the `keyseal-demo` binary. Binary
//! values are shown as standard-alphabet Base64 without padding.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod report;

pub use report::{Report, encode};
