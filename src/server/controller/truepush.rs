//! Legacy Truepush endpoints, kept so old clients land on their OneSignal equivalents.
//!
//! Every route answers 307 so the method and body are replayed against the new endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Redirect},
    Json,
};
use tower_sessions::Session;

use crate::{
    model::notification::RegisterPlayerDto,
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::notification::NotificationService,
    },
};

pub static TRUEPUSH_TAG: &str = "truepush";

/// Records the legacy subscriber for a logged in user, then redirects to the player endpoint
#[utoipa::path(
    post,
    path = "/api/truepush/subscribe",
    tag = TRUEPUSH_TAG,
    request_body = RegisterPlayerDto,
    responses((status = 307, description = "Redirect to /api/onesignal/players")),
)]
pub async fn subscribe(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<RegisterPlayerDto>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    if let (Ok(Json(payload)), Ok(user)) = (payload, get_user_from_session(&state, &session).await) {
        NotificationService::new(&state.db, &state.notifier)
            .record_truepush_subscriber(&user, payload.player_id)
            .await?;
    }

    Ok(Redirect::temporary("/api/onesignal/players"))
}

#[utoipa::path(
    post,
    path = "/api/truepush/send",
    tag = TRUEPUSH_TAG,
    responses((status = 307, description = "Redirect to /api/onesignal/send")),
)]
pub async fn send() -> impl IntoResponse {
    Redirect::temporary("/api/onesignal/send")
}

#[utoipa::path(
    get,
    path = "/api/truepush/stats",
    tag = TRUEPUSH_TAG,
    responses((status = 307, description = "Redirect to /api/onesignal/stats")),
)]
pub async fn stats() -> impl IntoResponse {
    Redirect::temporary("/api/onesignal/stats")
}

#[utoipa::path(
    get,
    path = "/api/truepush/segments",
    tag = TRUEPUSH_TAG,
    responses((status = 307, description = "Redirect to /api/onesignal/segments")),
)]
pub async fn segments() -> impl IntoResponse {
    Redirect::temporary("/api/onesignal/segments")
}
