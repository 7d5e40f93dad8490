use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chamados::{
    model::user::LoginDto,
    server::{
        controller::{
            auth::{get_user, login, logout},
            util::client_ip::ClientIp,
        },
        model::session::user::SessionUserId,
    },
};
use entity::sea_orm_active_enums::{ActionType, Hierarchy};
use sea_orm::EntityTrait;

use super::*;

fn credentials(email: &str, password: &str) -> Json<LoginDto> {
    Json(LoginDto {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Expect 200 and the user stored in session for valid credentials
#[tokio::test]
async fn login_stores_user_in_session() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;

    let result = login(
        State(test.into_app_state()),
        test.session.clone(),
        ClientIp::default(),
        credentials("ana@example.com", TEST_PASSWORD),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);

    let session_user = SessionUserId::get(&test.session).await.unwrap();
    assert_eq!(session_user, Some(user.id));

    let logs = entity::prelude::SystemLog::find().all(&test.db).await?;
    assert!(logs.iter().any(|log| log.action_type == ActionType::UserLogin));

    Ok(())
}

/// Expect 401 and an empty session for a wrong password
#[tokio::test]
async fn login_rejects_wrong_password() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    test.user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;

    let result = login(
        State(test.into_app_state()),
        test.session.clone(),
        ClientIp::default(),
        credentials("ana@example.com", "wrong password"),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}

/// Expect 401 for an inactive account even with the right password
#[tokio::test]
async fn login_rejects_inactive_user() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    test.user()
        .insert_inactive_user("old@example.com", None)
        .await?;

    let result = login(
        State(test.into_app_state()),
        test.session.clone(),
        ClientIp::default(),
        credentials("old@example.com", TEST_PASSWORD),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );

    Ok(())
}

/// Expect 307 and a cleared session after logout
#[tokio::test]
async fn logout_clears_session() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = logout(
        State(test.into_app_state()),
        test.session.clone(),
        ClientIp(Some("198.51.100.4".to_string())),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(
        result.unwrap().into_response().status(),
        StatusCode::TEMPORARY_REDIRECT
    );
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    let logs = entity::prelude::SystemLog::find().all(&test.db).await?;
    assert!(logs.iter().any(|log| log.action_type == ActionType::UserLogout
        && log.ip_address.as_deref() == Some("198.51.100.4")));

    Ok(())
}

/// Expect 307 after logout without a session instead of a store error
#[tokio::test]
async fn logout_without_session_redirects() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;

    let result = logout(
        State(test.into_app_state()),
        test.session.clone(),
        ClientIp::default(),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(
        result.unwrap().into_response().status(),
        StatusCode::TEMPORARY_REDIRECT
    );

    Ok(())
}

/// Expect 404 from the current user endpoint when nobody is logged in
#[tokio::test]
async fn current_user_not_found_without_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;

    let result = get_user(State(test.into_app_state()), test.session.clone()).await;

    assert!(result.is_ok());
    assert_eq!(
        result.unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

/// Expect 200 from the current user endpoint for a logged in user
#[tokio::test]
async fn current_user_found_with_session() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Supervisor, None)
        .await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = get_user(State(test.into_app_state()), test.session.clone()).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);

    Ok(())
}
