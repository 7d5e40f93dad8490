use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, Error},
    model::{app::AppState, db::UserModel, session::user::SessionUserId},
};

/// Loads the active user stored in the session.
///
/// # Returns
/// - `Ok(UserModel)`: Active user found for the session's user ID
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: No user ID in session
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))`: User deleted or deactivated,
///   the session is cleared
/// - `Err(Error)`: Session or database failure
pub async fn get_user_from_session(state: &AppState, session: &Session) -> Result<UserModel, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = UserRepository::new(&state.db)
        .get_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
    else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but no active account",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    Ok(user)
}
