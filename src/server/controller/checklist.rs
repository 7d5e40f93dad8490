use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        checklist::{
            AssignmentDto, CreateAssignmentDto, CreateTemplateDto, ExecutionDto,
            PendingApprovalsDto, PendingApprovalsQuery, RejectExecutionDto, TemplateDto,
        },
    },
    server::{
        controller::util::{get_user::get_user_from_session, multipart::read_task_submissions},
        error::Error,
        model::app::AppState,
        service::checklist::ChecklistService,
    },
};

pub static CHECKLIST_TAG: &str = "checklist";

#[utoipa::path(
    get,
    path = "/api/checklists/templates",
    tag = CHECKLIST_TAG,
    responses(
        (status = 200, description = "Templates visible to the user", body = Vec<TemplateDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_templates(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let templates = ChecklistService::new(&state.db, &state.notifier)
        .list_templates(&user)
        .await?;

    Ok((StatusCode::OK, Json(templates)))
}

#[utoipa::path(
    post,
    path = "/api/checklists/templates",
    tag = CHECKLIST_TAG,
    request_body = CreateTemplateDto,
    responses(
        (status = 201, description = "Template created", body = TemplateDto),
        (status = 400, description = "Template without tasks or empty name", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_template(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateTemplateDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let template = ChecklistService::new(&state.db, &state.notifier)
        .create_template(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/api/checklists/templates/{id}",
    tag = CHECKLIST_TAG,
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template with ordered tasks", body = TemplateDto),
        (status = 404, description = "Template not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_user_from_session(&state, &session).await?;

    let template = ChecklistService::new(&state.db, &state.notifier)
        .get_template(id)
        .await?;

    Ok((StatusCode::OK, Json(template)))
}

/// Deactivate a template, existing executions are kept
#[utoipa::path(
    delete,
    path = "/api/checklists/templates/{id}",
    tag = CHECKLIST_TAG,
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 204, description = "Template deactivated"),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 404, description = "Template not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn deactivate_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    ChecklistService::new(&state.db, &state.notifier)
        .deactivate_template(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Assign a template and generate its executions
#[utoipa::path(
    post,
    path = "/api/checklists/assignments",
    tag = CHECKLIST_TAG,
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentDto),
        (status = 400, description = "Invalid schedule", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateAssignmentDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let assignment = ChecklistService::new(&state.db, &state.notifier)
        .create_assignment(&user, payload, Local::now().date_naive())
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Executions assigned to the current user for today
#[utoipa::path(
    get,
    path = "/api/checklists/today",
    tag = CHECKLIST_TAG,
    responses(
        (status = 200, description = "Today's executions", body = Vec<ExecutionDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn today_executions(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let executions = ChecklistService::new(&state.db, &state.notifier)
        .today_executions(&user, Local::now().date_naive())
        .await?;

    Ok((StatusCode::OK, Json(executions)))
}

#[utoipa::path(
    get,
    path = "/api/checklists/executions/{id}",
    tag = CHECKLIST_TAG,
    params(("id" = i32, Path, description = "Execution ID")),
    responses(
        (status = 200, description = "Execution with task rows", body = ExecutionDto),
        (status = 403, description = "Execution not visible", body = ErrorDto),
        (status = 404, description = "Execution not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_execution(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let execution = ChecklistService::new(&state.db, &state.notifier)
        .get_execution(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(execution)))
}

/// Submit a checklist execution
///
/// Multipart form with `task_{id}` checkboxes, `notes_{id}` text and optional
/// `evidence_image_{id}` / `evidence_video_{id}` files. Every task marked complete needs
/// notes, a new image or video, or evidence from an earlier submission; otherwise nothing
/// is stored. The body limit comes from `MAX_UPLOAD_BYTES`.
#[utoipa::path(
    post,
    path = "/api/checklists/executions/{id}/submit",
    tag = CHECKLIST_TAG,
    params(("id" = i32, Path, description = "Execution ID")),
    request_body(content = String, content_type = "multipart/form-data", description = "Task fields keyed by task ID"),
    responses(
        (status = 200, description = "Execution submitted", body = ExecutionDto),
        (status = 400, description = "Missing evidence, unknown task or invalid state", body = ErrorDto),
        (status = 413, description = "Upload over the configured size limit", body = ErrorDto),
        (status = 403, description = "Only the assigned user may submit", body = ErrorDto),
        (status = 404, description = "Execution not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_execution(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let submissions = read_task_submissions(multipart).await?;

    let execution = ChecklistService::new(&state.db, &state.notifier)
        .submit_execution(&user, id, submissions, &state.media)
        .await?;

    Ok((StatusCode::OK, Json(execution)))
}

#[utoipa::path(
    post,
    path = "/api/checklists/executions/{id}/approve",
    tag = CHECKLIST_TAG,
    params(("id" = i32, Path, description = "Execution ID")),
    responses(
        (status = 200, description = "Execution approved", body = ExecutionDto),
        (status = 400, description = "Execution is not awaiting approval", body = ErrorDto),
        (status = 403, description = "Not an approver for this execution", body = ErrorDto),
        (status = 404, description = "Execution not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_execution(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let execution = ChecklistService::new(&state.db, &state.notifier)
        .approve_execution(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(execution)))
}

/// Send an execution back to its executor with a note
#[utoipa::path(
    post,
    path = "/api/checklists/executions/{id}/reject",
    tag = CHECKLIST_TAG,
    params(("id" = i32, Path, description = "Execution ID")),
    request_body = RejectExecutionDto,
    responses(
        (status = 200, description = "Execution returned to pending", body = ExecutionDto),
        (status = 400, description = "Not awaiting approval", body = ErrorDto),
        (status = 403, description = "Not an approver for this execution", body = ErrorDto),
        (status = 404, description = "Execution not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_execution(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<RejectExecutionDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let execution = ChecklistService::new(&state.db, &state.notifier)
        .reject_execution(&user, id, payload.note)
        .await?;

    Ok((StatusCode::OK, Json(execution)))
}

#[utoipa::path(
    get,
    path = "/api/checklists/approvals",
    tag = CHECKLIST_TAG,
    params(PendingApprovalsQuery),
    responses(
        (status = 200, description = "Executions awaiting the user's approval", body = PendingApprovalsDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn pending_approvals(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PendingApprovalsQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let approvals = ChecklistService::new(&state.db, &state.notifier)
        .pending_approvals(&user, query, Local::now().date_naive())
        .await?;

    Ok((StatusCode::OK, Json(approvals)))
}
