//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every endpoint is registered through a utoipa-axum [`OpenApiRouter`] so the OpenAPI
//! document served at `/api/docs/openapi.json` always matches the mounted routes. Swagger UI
//! is available at `/api/docs`, uploaded evidence is served from `/media`.

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header::HOST, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, error::error_response, model::app::AppState};

/// Builds the application router with all API endpoints, Swagger UI and media files.
///
/// The session layer is not added here; callers wrap the router with it so the admin guard
/// can read the session.
pub fn routes(state: AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(info(title = "Chamados", description = "Helpdesk API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Login and session"),
        (name = controller::user::USER_TAG, description = "Users and sectors"),
        (name = controller::audit::AUDIT_TAG, description = "System audit log"),
        (name = controller::ticket::TICKET_TAG, description = "Tickets, categories and webhooks"),
        (name = controller::checklist::CHECKLIST_TAG, description = "Checklists and approvals"),
        (name = controller::prize::PRIZE_TAG, description = "Prizes and credits"),
        (name = controller::notification::NOTIFICATION_TAG, description = "In-app and Web Push notifications"),
        (name = controller::onesignal::ONESIGNAL_TAG, description = "OneSignal push"),
        (name = controller::truepush::TRUEPUSH_TAG, description = "Legacy Truepush redirects"),
        (name = controller::support::SUPPORT_TAG, description = "Support chat"),
        (name = controller::admin::ADMIN_TAG, description = "Admin dashboard"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Auth
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::get_user))
        // Users
        .routes(routes!(controller::user::list_users, controller::user::create_user))
        .routes(routes!(controller::user::list_sectors, controller::user::create_sector))
        .routes(routes!(controller::audit::list_logs))
        // Tickets
        .routes(routes!(
            controller::ticket::list_categories,
            controller::ticket::create_category
        ))
        .routes(routes!(
            controller::ticket::list_tickets,
            controller::ticket::create_ticket
        ))
        .routes(routes!(controller::ticket::get_ticket))
        .routes(routes!(controller::ticket::update_ticket_status))
        .routes(routes!(controller::ticket::assume_ticket))
        .routes(routes!(controller::ticket::add_comment))
        .routes(routes!(
            controller::ticket::list_webhooks,
            controller::ticket::create_webhook
        ))
        .routes(routes!(controller::ticket::delete_webhook))
        // Checklists
        .routes(routes!(
            controller::checklist::list_templates,
            controller::checklist::create_template
        ))
        .routes(routes!(
            controller::checklist::get_template,
            controller::checklist::deactivate_template
        ))
        .routes(routes!(controller::checklist::create_assignment))
        .routes(routes!(controller::checklist::today_executions))
        .routes(routes!(controller::checklist::get_execution))
        .merge(
            OpenApiRouter::new()
                .routes(routes!(controller::checklist::submit_execution))
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .routes(routes!(controller::checklist::approve_execution))
        .routes(routes!(controller::checklist::reject_execution))
        .routes(routes!(controller::checklist::pending_approvals))
        // Prizes
        .routes(routes!(
            controller::prize::list_prizes,
            controller::prize::create_prize
        ))
        .routes(routes!(controller::prize::redeem_prize))
        .routes(routes!(controller::prize::list_redemptions))
        .routes(routes!(controller::prize::update_redemption_status))
        .routes(routes!(controller::prize::cancel_redemption))
        .routes(routes!(controller::prize::adjust_credits))
        .routes(routes!(controller::prize::list_transactions))
        // Notifications
        .routes(routes!(controller::notification::inbox))
        .routes(routes!(controller::notification::mark_read))
        .routes(routes!(controller::notification::mark_all_read))
        .routes(routes!(controller::notification::subscribe))
        .routes(routes!(controller::notification::list_devices))
        .routes(routes!(controller::notification::remove_device))
        .routes(routes!(controller::notification::send_test))
        .routes(routes!(controller::notification::broadcast))
        .routes(routes!(controller::notification::vapid_public_key))
        .routes(routes!(controller::onesignal::register_player))
        .routes(routes!(controller::onesignal::send))
        .routes(routes!(controller::onesignal::stats))
        .routes(routes!(controller::onesignal::segments))
        .routes(routes!(controller::truepush::subscribe))
        .routes(routes!(controller::truepush::send))
        .routes(routes!(controller::truepush::stats))
        .routes(routes!(controller::truepush::segments))
        // Support
        .routes(routes!(
            controller::support::my_chats,
            controller::support::create_chat
        ))
        .routes(routes!(controller::support::get_chat))
        .routes(routes!(controller::support::send_message))
        .routes(routes!(controller::support::assume_chat))
        .routes(routes!(controller::support::update_chat_status))
        .routes(routes!(controller::support::dashboard))
        .routes(routes!(controller::support::register_agent))
        // Admin
        .routes(routes!(controller::admin::overview))
        .split_for_parts();

    let media = ServeDir::new(state.media.root());

    routes
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .nest_service("/media", media)
        .layer(middleware::from_fn(controller::admin::require_login_for_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_allowed_host))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Rejects requests whose `Host` header is not listed in `ALLOWED_HOSTS`.
///
/// Ports are ignored and an empty list accepts every host.
async fn require_allowed_host(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.allowed_hosts.is_empty() {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port);

    match host {
        Some(host) if is_allowed(&state.allowed_hosts, host) => next.run(request).await,
        _ => {
            tracing::warn!(host = ?host, "Rejected request for disallowed host");

            error_response(StatusCode::BAD_REQUEST, "Invalid host")
        }
    }
}

fn strip_port(host: &str) -> &str {
    // IPv6 literals keep their brackets
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }

    host.split(':').next().unwrap_or(host)
}

/// `.example.com` entries match the domain and every subdomain, `*` matches anything.
fn is_allowed(allowed_hosts: &[String], host: &str) -> bool {
    allowed_hosts.iter().any(|allowed| {
        if allowed == "*" {
            return true;
        }

        match allowed.strip_prefix('.') {
            Some(domain) => {
                host.eq_ignore_ascii_case(domain)
                    || host
                        .to_ascii_lowercase()
                        .ends_with(&format!(".{}", domain.to_ascii_lowercase()))
            }
            None => host.eq_ignore_ascii_case(allowed),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect ports to be stripped from plain and IPv6 hosts
    #[test]
    fn strips_ports() {
        assert_eq!(strip_port("example.com:8000"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8000"), "[::1]");
    }

    /// Expect exact, wildcard and subdomain entries to match
    #[test]
    fn matches_allowed_hosts() {
        let hosts = vec!["localhost".to_string(), ".example.com".to_string()];

        assert!(is_allowed(&hosts, "localhost"));
        assert!(is_allowed(&hosts, "LOCALHOST"));
        assert!(is_allowed(&hosts, "example.com"));
        assert!(is_allowed(&hosts, "chamados.example.com"));
        assert!(!is_allowed(&hosts, "badexample.com"));
        assert!(!is_allowed(&hosts, "evil.com"));
        assert!(is_allowed(&["*".to_string()], "anything"));
    }
}
