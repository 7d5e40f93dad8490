use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use chamados::{
    model::notification::RegisterPlayerDto,
    server::{
        controller::truepush::{segments, send, stats, subscribe},
        model::session::user::SessionUserId,
    },
};
use entity::sea_orm_active_enums::Hierarchy;
use sea_orm::EntityTrait;

use super::*;

/// Expect the subscriber to be recorded and a 307 to the OneSignal player endpoint
#[tokio::test]
async fn subscribe_records_and_redirects() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_notification_tables().build().await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = subscribe(
        State(test.into_app_state()),
        test.session.clone(),
        Ok(Json(RegisterPlayerDto {
            player_id: "legacy-subscriber".to_string(),
        })),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap(),
        "/api/onesignal/players"
    );

    let subscribers = entity::prelude::TruepushSubscriber::find()
        .all(&test.db)
        .await?;
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].user_id, Some(user.id));

    Ok(())
}

/// Expect anonymous subscriptions to redirect without recording anything
#[tokio::test]
async fn subscribe_without_session_only_redirects() -> Result<(), TestError> {
    let test = TestBuilder::new().with_notification_tables().build().await?;

    let result = subscribe(
        State(test.into_app_state()),
        test.session.clone(),
        Ok(Json(RegisterPlayerDto {
            player_id: "legacy-subscriber".to_string(),
        })),
    )
    .await;

    assert_eq!(
        result.unwrap().into_response().status(),
        StatusCode::TEMPORARY_REDIRECT
    );
    assert!(entity::prelude::TruepushSubscriber::find()
        .all(&test.db)
        .await?
        .is_empty());

    Ok(())
}

/// Expect the remaining legacy routes to point at their OneSignal equivalents
#[tokio::test]
async fn legacy_routes_redirect() {
    for (resp, location) in [
        (send().await.into_response(), "/api/onesignal/send"),
        (stats().await.into_response(), "/api/onesignal/stats"),
        (segments().await.into_response(), "/api/onesignal/segments"),
    ] {
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), location);
    }
}
