use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        support::{
            AgentDto, ChatDetailDto, ChatDto, ChatMessageDto, CreateChatDto, RegisterAgentDto,
            SendChatMessageDto, SupportDashboardDto, UpdateChatStatusDto,
        },
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::support::SupportService,
    },
};

pub static SUPPORT_TAG: &str = "support";

#[utoipa::path(
    post,
    path = "/api/support/chats",
    tag = SUPPORT_TAG,
    request_body = CreateChatDto,
    responses(
        (status = 201, description = "Chat opened with its first message", body = ChatDetailDto),
        (status = 400, description = "Empty title or message", body = ErrorDto),
        (status = 404, description = "Sector not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_chat(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateChatDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let chat = SupportService::new(&state.db, &state.notifier)
        .create_chat(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

/// Chats opened by the current user
#[utoipa::path(
    get,
    path = "/api/support/chats",
    tag = SUPPORT_TAG,
    responses(
        (status = 200, description = "The user's chats", body = Vec<ChatDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn my_chats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let chats = SupportService::new(&state.db, &state.notifier)
        .my_chats(&user)
        .await?;

    Ok((StatusCode::OK, Json(chats)))
}

#[utoipa::path(
    get,
    path = "/api/support/chats/{id}",
    tag = SUPPORT_TAG,
    params(("id" = i32, Path, description = "Chat ID")),
    responses(
        (status = 200, description = "Chat with messages", body = ChatDetailDto),
        (status = 403, description = "Not a participant", body = ErrorDto),
        (status = 404, description = "Chat not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_chat(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let chat = SupportService::new(&state.db, &state.notifier)
        .get_chat(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(chat)))
}

#[utoipa::path(
    post,
    path = "/api/support/chats/{id}/messages",
    tag = SUPPORT_TAG,
    params(("id" = i32, Path, description = "Chat ID")),
    request_body = SendChatMessageDto,
    responses(
        (status = 201, description = "Message posted", body = ChatMessageDto),
        (status = 400, description = "Empty message or closed chat", body = ErrorDto),
        (status = 403, description = "Not a participant", body = ErrorDto),
        (status = 404, description = "Chat not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<SendChatMessageDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let message = SupportService::new(&state.db, &state.notifier)
        .send_message(&user, id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    post,
    path = "/api/support/chats/{id}/assume",
    tag = SUPPORT_TAG,
    params(("id" = i32, Path, description = "Chat ID")),
    responses(
        (status = 200, description = "Chat assigned to the agent", body = ChatDto),
        (status = 400, description = "Chat closed or already assigned", body = ErrorDto),
        (status = 403, description = "Not an active agent", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn assume_chat(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let chat = SupportService::new(&state.db, &state.notifier)
        .assume(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(chat)))
}

#[utoipa::path(
    post,
    path = "/api/support/chats/{id}/status",
    tag = SUPPORT_TAG,
    params(("id" = i32, Path, description = "Chat ID")),
    request_body = UpdateChatStatusDto,
    responses(
        (status = 200, description = "Status changed", body = ChatDto),
        (status = 403, description = "Not an agent", body = ErrorDto),
        (status = 404, description = "Chat not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_chat_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateChatStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let chat = SupportService::new(&state.db, &state.notifier)
        .update_status(&user, id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(chat)))
}

/// Kanban view of the support queue
#[utoipa::path(
    get,
    path = "/api/support/dashboard",
    tag = SUPPORT_TAG,
    responses(
        (status = 200, description = "Chats grouped by status", body = SupportDashboardDto),
        (status = 403, description = "Not an agent or supervisor", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let dashboard = SupportService::new(&state.db, &state.notifier)
        .dashboard(&user)
        .await?;

    Ok((StatusCode::OK, Json(dashboard)))
}

#[utoipa::path(
    post,
    path = "/api/support/agents",
    tag = SUPPORT_TAG,
    request_body = RegisterAgentDto,
    responses(
        (status = 201, description = "Agent registered", body = AgentDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register_agent(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterAgentDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let agent = SupportService::new(&state.db, &state.notifier)
        .register_agent(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(agent)))
}
