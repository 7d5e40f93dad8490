use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        audit::{SystemLogDto, SystemLogQuery},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::audit::AuditService,
    },
};

pub static AUDIT_TAG: &str = "audit";

/// System audit log, newest first
///
/// Restricted to SUPERADMIN.
#[utoipa::path(
    get,
    path = "/api/admin/logs",
    tag = AUDIT_TAG,
    params(SystemLogQuery),
    responses(
        (status = 200, description = "Audit entries", body = Vec<SystemLogDto>),
        (status = 303, description = "Not logged in, redirect to login"),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_logs(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SystemLogQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let logs = AuditService::new(&state.db).list(&user, query).await?;

    Ok((StatusCode::OK, Json(logs)))
}
