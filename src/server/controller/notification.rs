use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        notification::{
            DeviceTokenDto, DispatchReportDto, NotificationDto, SendNotificationDto, SubscribeDto,
            VapidPublicKeyDto,
        },
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::{notification::NotificationError, Error},
        model::app::AppState,
        service::notification::NotificationService,
    },
};

pub static NOTIFICATION_TAG: &str = "notification";

/// The user's in-app notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Inbox", body = Vec<NotificationDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn inbox(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let notifications = NotificationService::new(&state.db, &state.notifier)
        .inbox(&user)
        .await?;

    Ok((StatusCode::OK, Json(notifications)))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = NOTIFICATION_TAG,
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "Notification not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    NotificationService::new(&state.db, &state.notifier)
        .mark_read(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Number of notifications marked as read", body = MessageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let count = NotificationService::new(&state.db, &state.notifier)
        .mark_all_read(&user)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            message: format!("{} notifications marked as read", count),
        }),
    ))
}

/// Register the browser's Web Push subscription
#[utoipa::path(
    post,
    path = "/api/notifications/subscribe",
    tag = NOTIFICATION_TAG,
    request_body = SubscribeDto,
    responses(
        (status = 201, description = "Device registered", body = DeviceTokenDto),
        (status = 400, description = "Missing endpoint", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn subscribe(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SubscribeDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let device = NotificationService::new(&state.db, &state.notifier)
        .subscribe(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(device)))
}

#[utoipa::path(
    get,
    path = "/api/notifications/devices",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "The user's devices", body = Vec<DeviceTokenDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_devices(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let devices = NotificationService::new(&state.db, &state.notifier)
        .devices(&user)
        .await?;

    Ok((StatusCode::OK, Json(devices)))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/devices/{id}",
    tag = NOTIFICATION_TAG,
    params(("id" = i32, Path, description = "Device ID")),
    responses(
        (status = 204, description = "Device deactivated"),
        (status = 404, description = "Device not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_device(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    NotificationService::new(&state.db, &state.notifier)
        .remove_device(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Send a test notification to the current user
#[utoipa::path(
    post,
    path = "/api/notifications/test",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Delivery report", body = DispatchReportDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn send_test(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let report = NotificationService::new(&state.db, &state.notifier)
        .send_test(&user)
        .await;

    Ok((StatusCode::OK, Json(DispatchReportDto::from(report))))
}

/// Communication broadcast to selected users or everyone
#[utoipa::path(
    post,
    path = "/api/notifications/send",
    tag = NOTIFICATION_TAG,
    request_body = SendNotificationDto,
    responses(
        (status = 200, description = "Delivery report", body = DispatchReportDto),
        (status = 400, description = "Missing title or message", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn broadcast(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SendNotificationDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let report = NotificationService::new(&state.db, &state.notifier)
        .broadcast(&user, payload)
        .await?;

    Ok((StatusCode::OK, Json(DispatchReportDto::from(report))))
}

/// Application server key for `PushManager.subscribe`
#[utoipa::path(
    get,
    path = "/api/notifications/vapid-public-key",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "VAPID public key", body = VapidPublicKeyDto),
        (status = 503, description = "Web Push is not configured", body = ErrorDto)
    ),
)]
pub async fn vapid_public_key(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let public_key = state
        .vapid_public_key
        .clone()
        .ok_or(NotificationError::NotConfigured("Web Push"))?;

    Ok((StatusCode::OK, Json(VapidPublicKeyDto { public_key })))
}
