//! Authentication primitives for gatehouse.
//!
//! Provides JWT claims with RS256 encoding/decoding and Argon2id password
//! hashing. This crate is the user/auth collaborator for the invitation
//! API: it owns token validation and credential storage formats, nothing
//! more.

pub mod claims;
pub mod error;
pub mod jwt;
pub mod password;

pub use claims::JwtClaims;
pub use error::AuthError;
pub use jwt::{decode_token, decode_token_with_config, encode_token, ValidationConfig};
pub use password::{hash_password, verify_password, PasswordHasher};
