//! Admin dashboard routes and the guard redirecting anonymous visitors to the login page.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Local;
use entity::sea_orm_active_enums::{Hierarchy, TicketStatus};
use tower_sessions::Session;

use crate::{
    model::{
        api::{AdminOverviewDto, ErrorDto},
        checklist::PendingApprovalsQuery,
        user::UserDto,
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::{auth::AuthError, Error},
        model::{app::AppState, permission::UserPermissions, session::user::SessionUserId},
        service::{
            checklist::ChecklistService, support::SupportService, ticket::TicketService,
        },
    },
};

pub static ADMIN_TAG: &str = "admin";

pub static ADMIN_PATH_PREFIX: &str = "/admin";

pub static ADMIN_API_PATH_PREFIX: &str = "/api/admin";

fn is_admin_path(path: &str) -> bool {
    [ADMIN_PATH_PREFIX, ADMIN_API_PATH_PREFIX].iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Redirects requests for admin pages and admin API routes without a logged in user to
/// `/auth/login`.
///
/// Never serves admin content to anonymous visitors, whatever the route returns.
pub async fn require_login_for_admin(session: Session, request: Request, next: Next) -> Response {
    if !is_admin_path(request.uri().path()) {
        return next.run(request).await;
    }

    match SessionUserId::get(&session).await {
        Ok(Some(_)) => next.run(request).await,
        Ok(None) => Redirect::to("/auth/login").into_response(),
        Err(e) => {
            tracing::debug!("Unreadable session on admin path: {}", e);

            Redirect::to("/auth/login").into_response()
        }
    }
}

/// Admin dashboard landing data
#[utoipa::path(
    get,
    path = "/admin/",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Dashboard counters", body = AdminOverviewDto),
        (status = 303, description = "Not logged in, redirect to login"),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn overview(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    if !user.is_at_least(Hierarchy::Supervisor) {
        return Err(AuthError::denied("The admin dashboard requires SUPERVISOR or above").into());
    }

    let open_tickets = TicketService::new(&state.db, &state.http, &state.notifier)
        .list_tickets(&user)
        .await?
        .into_iter()
        .filter(|ticket| {
            matches!(
                ticket.status,
                TicketStatus::Aberto | TicketStatus::EmAndamento | TicketStatus::Reaberto
            )
        })
        .count();

    let dashboard = SupportService::new(&state.db, &state.notifier)
        .dashboard(&user)
        .await?;
    let open_support_chats = dashboard.open.len() + dashboard.in_progress.len();

    let pending_approvals = ChecklistService::new(&state.db, &state.notifier)
        .pending_approvals(&user, PendingApprovalsQuery::default(), Local::now().date_naive())
        .await?
        .stats
        .pending_total;

    Ok((
        StatusCode::OK,
        Json(AdminOverviewDto {
            user: UserDto::from(user),
            open_tickets,
            open_support_chats,
            pending_approvals,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::is_admin_path;

    /// Expect both admin prefixes to be guarded without catching lookalike paths
    #[test]
    fn matches_admin_prefixes_only() {
        assert!(is_admin_path("/admin"));
        assert!(is_admin_path("/admin/"));
        assert!(is_admin_path("/api/admin"));
        assert!(is_admin_path("/api/admin/logs"));

        assert!(!is_admin_path("/administrator"));
        assert!(!is_admin_path("/api/administration"));
        assert!(!is_admin_path("/api/auth/user"));
    }
}
