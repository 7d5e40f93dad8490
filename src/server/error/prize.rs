use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entity::sea_orm_active_enums::RedemptionStatus;
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum PrizeError {
    #[error("Prize ID {0} not found")]
    PrizeNotFound(i32),
    #[error("Redemption ID {0} not found")]
    RedemptionNotFound(i32),
    #[error("Prize ID {0} is not available")]
    Unavailable(i32),
    #[error("Insufficient balance: have {balance} cents, need {required} cents")]
    InsufficientBalance { balance: i64, required: i64 },
    #[error("Cannot change redemption status from {from:?} to {to:?}")]
    InvalidStatusChange {
        from: RedemptionStatus,
        to: RedemptionStatus,
    },
    #[error("Adjustment would leave user ID {user_id} with a negative balance")]
    NegativeBalance { user_id: i32 },
    #[error("You can only cancel your own redemptions")]
    NotOwner,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl IntoResponse for PrizeError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::PrizeNotFound(_) | Self::RedemptionNotFound(_) => StatusCode::NOT_FOUND,
            Self::NotOwner => StatusCode::FORBIDDEN,
            Self::Unavailable(_)
            | Self::InsufficientBalance { .. }
            | Self::InvalidStatusChange { .. }
            | Self::NegativeBalance { .. }
            | Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.to_string())
    }
}
