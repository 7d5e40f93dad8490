use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        user::{LoginDto, UserDto},
    },
    server::{
        controller::util::{client_ip::ClientIp, get_user::get_user_from_session},
        error::{auth::AuthError, Error},
        model::{app::AppState, session::user::SessionUserId},
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Password login
///
/// Checks the credentials of an active user and stores the user in the session.
///
/// # Responses
/// - 200 (OK): Logged in, returns the user
/// - 401 (Unauthorized): Unknown email, inactive account or wrong password
/// - 500 (Internal Server Error): Database or session store failure
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = UserDto),
        (status = 401, description = "Invalid email or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    client_ip: ClientIp,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db)
        .login(&payload.email, &payload.password, client_ip.as_deref())
        .await?;

    SessionUserId::insert(&session, user.id).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

/// Logs the user out by clearing their session
///
/// # Responses
/// - 307 (Temporary Redirect): Redirect to the login route, with or without a session
/// - 500 (Internal Server Error): There was an issue clearing the session
#[utoipa::path(
    get,
    path = "/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Redirect to login"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    client_ip: ClientIp,
) -> Result<impl IntoResponse, Error> {
    // Clearing an empty session fails in the store, only clear when a user is present
    if let Some(user) = SessionUserId::get_record(&session).await? {
        AuthService::new(&state.db)
            .logout(user.user_id, client_ip.as_deref())
            .await?;

        tracing::info!(
            user_id = user.user_id,
            session_minutes = (Utc::now() - user.logged_in_at).num_minutes(),
            "User logged out"
        );

        session.clear().await;
    }

    Ok(Redirect::temporary("/auth/login"))
}

/// Current user
///
/// # Responses
/// - 200 (OK): The logged in user
/// - 404 (Not Found): No user in session, or the session user no longer exists
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged in user", body = UserDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse, Error> {
    match get_user_from_session(&state, &session).await {
        Ok(user) => Ok((StatusCode::OK, Json(UserDto::from(user))).into_response()),
        Err(Error::AuthError(AuthError::UserNotInSession | AuthError::UserNotInDatabase(_))) => {
            Ok((
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    error: "User not found".to_string(),
                }),
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}
