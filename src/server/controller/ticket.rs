use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        ticket::{
            CategoryDto, CategoryQuery, CommentDto, CreateCategoryDto, CreateCommentDto,
            CreateTicketDto, CreateWebhookDto, TicketDetailDto, TicketDto, UpdateTicketStatusDto,
            WebhookDto,
        },
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::Error,
        model::app::AppState,
        service::ticket::{webhook::WebhookService, TicketService},
    },
};

pub static TICKET_TAG: &str = "ticket";

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = TICKET_TAG,
    params(CategoryQuery),
    responses(
        (status = 200, description = "Active categories", body = Vec<CategoryDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_categories(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, Error> {
    get_user_from_session(&state, &session).await?;

    let categories = TicketService::new(&state.db, &state.http, &state.notifier)
        .list_categories(query.sector_id)
        .await?;

    Ok((StatusCode::OK, Json(categories)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = TICKET_TAG,
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Invalid category", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_category(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateCategoryDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let category = TicketService::new(&state.db, &state.http, &state.notifier)
        .create_category(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Tickets visible to the current user
#[utoipa::path(
    get,
    path = "/api/tickets",
    tag = TICKET_TAG,
    responses(
        (status = 200, description = "Visible tickets, newest first", body = Vec<TicketDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let tickets = TicketService::new(&state.db, &state.http, &state.notifier)
        .list_tickets(&user)
        .await?;

    Ok((StatusCode::OK, Json(tickets)))
}

/// Open a ticket
///
/// Webhooks and notifications are sent after the ticket is stored, their failures never
/// affect the response.
#[utoipa::path(
    post,
    path = "/api/tickets",
    tag = TICKET_TAG,
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = TicketDto),
        (status = 400, description = "Invalid ticket", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let ticket = TicketService::new(&state.db, &state.http, &state.notifier)
        .create_ticket(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    tag = TICKET_TAG,
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket with comments and history", body = TicketDetailDto),
        (status = 403, description = "Ticket not visible", body = ErrorDto),
        (status = 404, description = "Ticket not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let ticket = TicketService::new(&state.db, &state.http, &state.notifier)
        .get_ticket(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(ticket)))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/status",
    tag = TICKET_TAG,
    params(("id" = i32, Path, description = "Ticket ID")),
    request_body = UpdateTicketStatusDto,
    responses(
        (status = 200, description = "Status changed", body = TicketDto),
        (status = 403, description = "Not allowed to change this ticket", body = ErrorDto),
        (status = 404, description = "Ticket not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_ticket_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTicketStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let ticket = TicketService::new(&state.db, &state.http, &state.notifier)
        .update_status(&user, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ticket)))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/assume",
    tag = TICKET_TAG,
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket assumed", body = TicketDto),
        (status = 400, description = "Ticket cannot be assumed", body = ErrorDto),
        (status = 404, description = "Ticket not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn assume_ticket(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let ticket = TicketService::new(&state.db, &state.http, &state.notifier)
        .assume_ticket(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(ticket)))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/comments",
    tag = TICKET_TAG,
    params(("id" = i32, Path, description = "Ticket ID")),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "Empty comment", body = ErrorDto),
        (status = 403, description = "Ticket not visible", body = ErrorDto),
        (status = 404, description = "Ticket not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<CreateCommentDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let comment = TicketService::new(&state.db, &state.http, &state.notifier)
        .add_comment(&user, id, payload.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/api/webhooks",
    tag = TICKET_TAG,
    responses(
        (status = 200, description = "Configured webhooks", body = Vec<WebhookDto>),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_webhooks(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let webhooks = WebhookService::new(&state.db, &state.http).list(&user).await?;

    Ok((StatusCode::OK, Json(webhooks)))
}

#[utoipa::path(
    post,
    path = "/api/webhooks",
    tag = TICKET_TAG,
    request_body = CreateWebhookDto,
    responses(
        (status = 201, description = "Webhook created", body = WebhookDto),
        (status = 400, description = "Invalid webhook", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_webhook(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateWebhookDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let webhook = WebhookService::new(&state.db, &state.http)
        .create(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(webhook)))
}

#[utoipa::path(
    delete,
    path = "/api/webhooks/{id}",
    tag = TICKET_TAG,
    params(("id" = i32, Path, description = "Webhook ID")),
    responses(
        (status = 204, description = "Webhook deleted"),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 404, description = "Webhook not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_webhook(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    WebhookService::new(&state.db, &state.http)
        .delete(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
