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
        user::{CreateSectorDto, CreateUserDto, SectorDto, UserDto, UserQuery},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::user::UserService,
    },
};

pub static USER_TAG: &str = "user";

/// List users, optionally filtered by sector
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    params(UserQuery),
    responses(
        (status = 200, description = "Users", body = Vec<UserDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let users = UserService::new(&state.db)
        .list_users(&user, query.sector_id)
        .await?;

    Ok((StatusCode::OK, Json(users)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = USER_TAG,
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid data or email already in use", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateUserDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let created = UserService::new(&state.db)
        .create_user(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/sectors",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Sectors", body = Vec<SectorDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_sectors(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_user_from_session(&state, &session).await?;

    let sectors = UserService::new(&state.db).list_sectors().await?;

    Ok((StatusCode::OK, Json(sectors)))
}

#[utoipa::path(
    post,
    path = "/api/sectors",
    tag = USER_TAG,
    request_body = CreateSectorDto,
    responses(
        (status = 201, description = "Sector created", body = SectorDto),
        (status = 400, description = "Name already in use", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_sector(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateSectorDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let sector = UserService::new(&state.db)
        .create_sector(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(sector)))
}
