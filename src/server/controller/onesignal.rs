use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        notification::{OneSignalStatsDto, RegisterPlayerDto, SegmentDto, SendNotificationDto},
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::Error,
        model::app::AppState,
        service::notification::{onesignal::OneSignalService, NotificationService},
    },
};

pub static ONESIGNAL_TAG: &str = "onesignal";

/// Link a OneSignal player to the current user
///
/// Also accepts the legacy Truepush body with `subscriber_id`.
#[utoipa::path(
    post,
    path = "/api/onesignal/players",
    tag = ONESIGNAL_TAG,
    request_body = RegisterPlayerDto,
    responses(
        (status = 200, description = "Player registered", body = MessageDto),
        (status = 400, description = "Missing player ID", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register_player(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPlayerDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    NotificationService::new(&state.db, &state.notifier)
        .register_onesignal_player(&user, payload.player_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            message: "Player registered".to_string(),
        }),
    ))
}

/// Push only send through OneSignal
#[utoipa::path(
    post,
    path = "/api/onesignal/send",
    tag = ONESIGNAL_TAG,
    request_body = SendNotificationDto,
    responses(
        (status = 200, description = "Recipients reported by OneSignal", body = MessageDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 502, description = "OneSignal request failed", body = ErrorDto),
        (status = 503, description = "OneSignal is not configured", body = ErrorDto)
    ),
)]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SendNotificationDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let delivered = OneSignalService::new(&state.db, state.onesignal.as_ref())
        .send(&user, payload)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            message: format!("Sent to {} recipients", delivered),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/onesignal/stats",
    tag = ONESIGNAL_TAG,
    responses(
        (status = 200, description = "Subscriber counts", body = OneSignalStatsDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 502, description = "OneSignal request failed", body = ErrorDto),
        (status = 503, description = "OneSignal is not configured", body = ErrorDto)
    ),
)]
pub async fn stats(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let stats = OneSignalService::new(&state.db, state.onesignal.as_ref())
        .stats(&user)
        .await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    get,
    path = "/api/onesignal/segments",
    tag = ONESIGNAL_TAG,
    responses(
        (status = 200, description = "Built-in segments", body = Vec<SegmentDto>),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 503, description = "OneSignal is not configured", body = ErrorDto)
    ),
)]
pub async fn segments(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let segments = OneSignalService::new(&state.db, state.onesignal.as_ref()).segments(&user)?;

    Ok((StatusCode::OK, Json(segments)))
}
