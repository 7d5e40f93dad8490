//! Error types for the helpdesk server.
//!
//! Each domain has its own `thiserror` enum with an `IntoResponse` implementation mapping
//! it to an HTTP status and an [`ErrorDto`] body. [`Error`] aggregates the domain errors
//! and the library errors so handlers and services can use `?` throughout.

pub mod auth;
pub mod checklist;
pub mod config;
pub mod notification;
pub mod prize;
pub mod support;
pub mod ticket;
pub mod user;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, checklist::ChecklistError, config::ConfigError,
        notification::NotificationError, prize::PrizeError, support::SupportError,
        ticket::TicketError, user::UserError,
    },
};

/// Main error type for the server application.
///
/// Domain errors carry their own HTTP mapping, library errors fall back to a generic
/// 500 response through [`InternalServerError`].
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// User or sector management error.
    #[error(transparent)]
    UserError(#[from] UserError),
    /// Ticket, category or webhook error.
    #[error(transparent)]
    TicketError(#[from] TicketError),
    /// Checklist template, assignment or execution error.
    #[error(transparent)]
    ChecklistError(#[from] ChecklistError),
    /// Prize, redemption or credit ledger error.
    #[error(transparent)]
    PrizeError(#[from] PrizeError),
    /// Support chat error.
    #[error(transparent)]
    SupportError(#[from] SupportError),
    /// Notification channel or device registry error.
    #[error(transparent)]
    NotificationError(#[from] NotificationError),
    /// Request failed validation, returned as 400 with the message.
    #[error("{0}")]
    Validation(String),
    /// Internal error indicating a bug, e.g. a row missing despite a foreign key.
    #[error("Internal error: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Filesystem error while storing uploaded media.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Malformed multipart request body.
    #[error(transparent)]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::UserError(err) => err.into_response(),
            Self::TicketError(err) => err.into_response(),
            Self::ChecklistError(err) => err.into_response(),
            Self::PrizeError(err) => err.into_response(),
            Self::SupportError(err) => err.into_response(),
            Self::NotificationError(err) => err.into_response(),
            Self::Validation(message) => error_response(StatusCode::BAD_REQUEST, message),
            Self::MultipartError(err) => {
                tracing::debug!("{}", err);

                // 413 when the upload is over the body limit, 400 otherwise
                match err.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => {
                        error_response(StatusCode::PAYLOAD_TOO_LARGE, "Upload too large")
                    }
                    _ => error_response(StatusCode::BAD_REQUEST, "Invalid form data"),
                }
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Builds a JSON error response with the provided status and message.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error and returns a generic message so implementation details never reach the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
