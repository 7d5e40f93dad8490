use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{error_response, InternalServerError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// Shorthand for a [`AuthError::PermissionDenied`] with the given reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied(reason.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                error_response(StatusCode::UNAUTHORIZED, "Authentication required")
            }
            Self::UserNotInDatabase(user_id) => {
                tracing::debug!(
                    user_id = %user_id,
                    "{}",
                    self
                );

                error_response(StatusCode::UNAUTHORIZED, "Authentication required")
            }
            Self::InvalidCredentials => {
                error_response(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            Self::PermissionDenied(ref reason) => {
                tracing::debug!("{}", self);

                error_response(StatusCode::FORBIDDEN, reason.clone())
            }
            Self::PasswordHash(_) => InternalServerError(self).into_response(),
        }
    }
}
