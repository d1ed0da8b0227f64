use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),

    /// Internal to verification, never surfaced by `PasswordHasher::verify`.
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
