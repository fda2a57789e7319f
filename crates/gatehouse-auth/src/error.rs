//! Error types for the gatehouse-auth crate.

use thiserror::Error;

/// Authentication and credential errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token has expired.
    #[error("Token has expired")]
    TokenExpired,

    /// Token signature verification failed.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token uses an unsupported algorithm.
    #[error("Unsupported token algorithm")]
    InvalidAlgorithm,

    /// Token is malformed or otherwise invalid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A required claim is missing from the token.
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// The signing or verification key is invalid.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored password hash is not in a recognized format.
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}
