use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum SupportError {
    #[error("Support chat ID {0} not found")]
    ChatNotFound(i32),
    #[error("Only active support agents can do this")]
    NotAgent,
    #[error("Support chat ID {0} is already assigned")]
    AlreadyAssigned(i32),
    #[error("Support chat ID {0} is closed")]
    ChatClosed(i32),
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("You are not part of support chat ID {0}")]
    NotParticipant(i32),
}

impl IntoResponse for SupportError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::ChatNotFound(_) => StatusCode::NOT_FOUND,
            Self::NotAgent | Self::NotParticipant(_) => StatusCode::FORBIDDEN,
            Self::AlreadyAssigned(_) | Self::ChatClosed(_) | Self::EmptyMessage => {
                StatusCode::BAD_REQUEST
            }
        };

        error_response(status, self.to_string())
    }
}
