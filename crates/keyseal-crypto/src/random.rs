//! Random sources for key generation and nonces.
//!
//! Decouples the primitives from the process-wide RNG. Production code uses
//! [`OsRandom`]; tests and reproducible fixtures use [`SeededRandom`].

use rand_chacha::{
    ChaCha20Rng,
    rand_core::{RngCore, SeedableRng},
};

use crate::error::CryptoError;

/// Source of cryptographically secure random bytes.
///
/// # Invariants
///
/// - Production implementations MUST use cryptographically secure entropy
/// - A failure to produce bytes is reported, never papered over with zeros
pub trait RandomSource {
    /// Fill `buffer` entirely with random bytes.
    fn try_fill_bytes(&mut self, buffer: &mut [u8]) -> Result<(), CryptoError>;

    /// Draw a fixed-size array of random bytes.
    fn random_array<const N: usize>(&mut self) -> Result<[u8; N], CryptoError>
    where
        Self: Sized,
    {
        let mut bytes = [0u8; N];
        self.try_fill_bytes(&mut bytes)?;
        Ok(bytes)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn try_fill_bytes(&mut self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        (**self).try_fill_bytes(buffer)
    }
}

/// OS cryptographic RNG (getrandom).
///
/// Uses `/dev/urandom` / `getrandom(2)` on Linux, `BCryptGenRandom` on
/// Windows. Not reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl OsRandom {
    /// Create a handle to the OS RNG.
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for OsRandom {
    fn try_fill_bytes(&mut self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::fill(buffer)
            .map_err(|e| CryptoError::RandomnessUnavailable { reason: e.to_string() })
    }
}

/// Deterministic ChaCha20 stream seeded from a `u64` or 32-byte seed.
///
/// Same seed, same byte sequence. Only for tests and reproducible demo runs.
pub struct SeededRandom {
    rng: ChaCha20Rng,
}

impl SeededRandom {
    /// Seed from a 32-byte value.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { rng: ChaCha20Rng::from_seed(seed) }
    }

    /// Seed from a `u64`.
    pub fn from_u64(seed: u64) -> Self {
        Self { rng: ChaCha20Rng::seed_from_u64(seed) }
    }
}

impl std::fmt::Debug for SeededRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededRandom").finish_non_exhaustive()
    }
}

impl RandomSource for SeededRandom {
    fn try_fill_bytes(&mut self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        self.rng.fill_bytes(buffer);
        Ok(())
    }
}
