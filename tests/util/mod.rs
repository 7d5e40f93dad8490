//! Helpers turning a [`TestContext`] into application state or a full router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chamados::server::{model::app::AppState, router, util::media::MediaStore};
use chamados_test_utils::{constant::TEST_PASSWORD, TestContext};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

pub trait TestContextExt {
    /// State sharing the test database and media directory, with only in-app notifications
    fn into_app_state(&self) -> AppState;

    /// Every route with an in-memory session layer, as the binary serves them
    fn into_router(&self) -> Router;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        AppState::new(self.db.clone(), MediaStore::new(self.media_root()))
    }

    fn into_router(&self) -> Router {
        router_for(self.into_app_state())
    }
}

/// Router over a custom state, for tests that change limits or channels
pub fn router_for(state: AppState) -> Router {
    let session = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

    router::routes(state).layer(session)
}

/// Logs in through `/auth/login` and returns the session cookie to send with later requests.
pub async fn login_cookie(app: &Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD }).to_string();
    let request = Request::post("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .expect("login should set a session cookie")
}

pub async fn json_body(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();

    serde_json::from_slice(&bytes).unwrap()
}
