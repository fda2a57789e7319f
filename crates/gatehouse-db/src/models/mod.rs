//! Record models and their queries.

mod invitation_key;
mod invitation_quota;
mod user;

pub use invitation_key::{CreateInvitationKey, InvitationKey};
pub use invitation_quota::InvitationQuota;
pub use user::{CreateUser, User};
