//! Request and response models for the invitation API.

mod invitations;
mod register;

pub use invitations::{
    BulkInvitationFailure, BulkInvitationRequest, BulkInvitationResponse,
    CreateInvitationRequest, GrantQuotaRequest,
    GrantQuotaResponse, InvitationKeySummary, InvitationResponse, InvitedResponse,
    RemainingResponse, SweepResponse,
};
pub use register::{RegisterRequest, RegisterResponse};
