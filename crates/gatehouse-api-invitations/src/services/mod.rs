//! Business logic for the invitation API.

mod email_service;
mod invitation_service;
mod registration_service;
mod validation;

pub use email_service::{
    EmailError, EmailSender, MockEmailSender, SentEmail, SmtpConfig, SmtpEmailSender,
};
pub use invitation_service::InvitationService;
pub use registration_service::{DefaultRegistrationBackend, RegistrationBackend};
pub use validation::validate_invite;
