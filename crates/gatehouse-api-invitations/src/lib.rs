//! Invitation-gated user registration API.
//!
//! Authenticated users spend a limited quota to generate invitation keys,
//! email them to invitees, and those keys gate access to account
//! registration. The crate provides the request/response DTOs, the key
//! lifecycle service, the form validator, the email and registration
//! collaborator traits, and the axum handlers and router that tie them
//! together.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod settings;

pub use error::{ErrorResponse, InvitationError};
pub use router::{invitation_router, AppState};
pub use settings::InvitationSettings;
