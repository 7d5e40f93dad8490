use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Plain acknowledgement for actions without a resource body
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

/// Counters shown on the admin dashboard landing page
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AdminOverviewDto {
    pub user: crate::model::user::UserDto,
    /// Visible tickets that are open, in progress or reopened
    pub open_tickets: usize,
    /// Support chats not yet resolved, zero when the user cannot see the queue
    pub open_support_chats: usize,
    pub pending_approvals: usize,
}
