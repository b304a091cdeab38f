//! Driven port for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum PasswordHasherError {
        /// The adapter could not produce a hash.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hash and verify client passwords.
///
/// Implementations are CPU bound; callers on an async runtime should expect
/// them to block briefly.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only unusable hashes are errors.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
