use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User ID {0} not found")]
    UserNotFound(i32),
    #[error("Sector ID {0} not found")]
    SectorNotFound(i32),
    #[error("A user with email {0:?} already exists")]
    EmailTaken(String),
    #[error("A sector named {0:?} already exists")]
    SectorNameTaken(String),
    #[error("Invalid user data: {0}")]
    InvalidInput(String),
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UserNotFound(_) | Self::SectorNotFound(_) => StatusCode::NOT_FOUND,
            Self::EmailTaken(_) | Self::SectorNameTaken(_) | Self::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        error_response(status, self.to_string())
    }
}
