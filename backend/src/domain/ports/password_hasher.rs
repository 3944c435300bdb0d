//! Driven port for one-way password hashing.

use super::define_port_error;
use crate::domain::PasswordHash;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The hasher rejected its parameters or input.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, slow hash for stored credentials.
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    ///
    /// # Errors
    /// [`PasswordHashError::Hashing`] when the adapter cannot produce a hash.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Whether `plaintext` matches `hash`. Malformed hashes never match.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool;
}

/// Reversible stand-in for tests that do not care about hash cost.
///
/// Never wire this into a server: the "hash" embeds the plaintext.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "$fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let reversed: String = plaintext.chars().rev().collect();
        Ok(PasswordHash::from_encoded(format!("{FIXTURE_PREFIX}{reversed}")))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        hash.as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .is_some_and(|reversed| reversed.chars().rev().eq(plaintext.chars()))
    }
}
