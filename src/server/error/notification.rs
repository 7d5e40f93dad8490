use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Push provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error(transparent)]
    WebPush(#[from] web_push::WebPushError),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Device ID {0} not found")]
    DeviceNotFound(i32),
    #[error("Notification ID {0} not found")]
    NotificationNotFound(i32),
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::DeviceNotFound(_) | Self::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            Self::Http(_) | Self::Api { .. } | Self::WebPush(_) => {
                tracing::error!("{}", self);

                return error_response(StatusCode::BAD_GATEWAY, "Push provider request failed");
            }
            Self::DbErr(_) => {
                return super::InternalServerError(self).into_response();
            }
        };

        error_response(status, self.to_string())
    }
}
