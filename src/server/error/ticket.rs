use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum TicketError {
    #[error("Ticket ID {0} not found")]
    NotFound(i32),
    #[error("Ticket category ID {0} not found")]
    CategoryNotFound(i32),
    #[error("Ticket category ID {0} is inactive")]
    CategoryInactive(i32),
    #[error("Ticket category ID {category_id} does not belong to sector ID {sector_id}")]
    CategorySectorMismatch { category_id: i32, sector_id: i32 },
    #[error("Field {0:?} must not be empty")]
    EmptyField(&'static str),
    #[error("You do not have access to ticket ID {0}")]
    NotVisible(i32),
    #[error("Cannot assume ticket: {0}")]
    CannotAssume(&'static str),
    #[error("Webhook ID {0} not found")]
    WebhookNotFound(i32),
}

impl IntoResponse for TicketError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) | Self::CategoryNotFound(_) | Self::WebhookNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::NotVisible(_) => StatusCode::FORBIDDEN,
            Self::CategoryInactive(_)
            | Self::CategorySectorMismatch { .. }
            | Self::EmptyField(_)
            | Self::CannotAssume(_) => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.to_string())
    }
}
