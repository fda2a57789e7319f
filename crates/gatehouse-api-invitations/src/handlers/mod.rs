//! HTTP handlers for the invitation API.

mod bulk;
mod invite;
mod invited;
mod register;

// Glob re-exports keep the utoipa-generated path items visible for the
// OpenAPI document assembled in the application crate.
pub use bulk::*;
pub use invite::*;
pub use invited::*;
pub use register::*;
