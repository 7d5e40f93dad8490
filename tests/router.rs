//! Requests sent through the full router, session layer included.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chamados_test_utils::prelude::*;
use chrono::Local;
use entity::sea_orm_active_enums::{ExecutionStatus, Hierarchy};
use sea_orm::EntityTrait;
use tower::ServiceExt;

use crate::util::{json_body, login_cookie, router_for, TestContextExt};

/// Multipart body marking one task complete with a video of `video_len` bytes.
fn video_submission(task_id: i32, video_len: usize) -> (String, Vec<u8>) {
    let boundary = "EVIDENCEBOUNDARY";
    let mut body = Vec::with_capacity(video_len + 512);

    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"task_{id}\"\r\n\r\non\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"evidence_video_{id}\"; filename=\"round.mp4\"\r\n\
             Content-Type: video/mp4\r\n\r\n",
            b = boundary,
            id = task_id
        )
        .as_bytes(),
    );
    body.extend(std::iter::repeat(b'v').take(video_len));
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

/// Inserts a pending execution for today assigned to `exec@example.com`, returning its and the task's IDs
async fn pending_execution(test: &mut TestContext) -> Result<(i32, i32), TestError> {
    let sector = test.user().insert_sector("Operações").await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let executor = test
        .user()
        .insert_user("exec@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;

    let (template, tasks) = test
        .checklist()
        .insert_template(sector.id, supervisor.id, &["Film the stock room"])
        .await?;
    let assignment = test
        .checklist()
        .insert_assignment(template.id, executor.id, supervisor.id, Local::now().date_naive())
        .await?;
    let (execution, _) = test
        .checklist()
        .insert_execution(&assignment, &tasks, ExecutionStatus::Pending)
        .await?;

    Ok((execution.id, tasks[0].id))
}

/// Expect evidence well over axum's 2 MB default body limit to be accepted
#[tokio::test]
async fn submit_accepts_large_evidence() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let (execution_id, task_id) = pending_execution(&mut test).await?;
    let app = test.into_router();

    let cookie = login_cookie(&app, "exec@example.com").await;
    let (content_type, body) = video_submission(task_id, 3 * 1024 * 1024);
    let response = app
        .oneshot(
            Request::post(format!("/api/checklists/executions/{}/submit", execution_id))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let execution = entity::prelude::ChecklistExecution::find_by_id(execution_id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(execution.status, ExecutionStatus::AwaitingApproval);

    let task_execution = entity::prelude::ChecklistTaskExecution::find()
        .one(&test.db)
        .await?
        .unwrap();
    let video = task_execution.evidence_video.unwrap();
    let stored = std::fs::metadata(test.media_root().join(video)).unwrap();
    assert_eq!(stored.len(), 3 * 1024 * 1024);

    Ok(())
}

/// Expect 413 and nothing stored when the upload exceeds the configured limit
#[tokio::test]
async fn submit_rejects_evidence_over_limit() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let (execution_id, task_id) = pending_execution(&mut test).await?;

    let mut state = test.into_app_state();
    state.max_upload_bytes = 64 * 1024;
    let app = router_for(state);

    let cookie = login_cookie(&app, "exec@example.com").await;
    let (content_type, body) = video_submission(task_id, 128 * 1024);
    let response = app
        .oneshot(
            Request::post(format!("/api/checklists/executions/{}/submit", execution_id))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let execution = entity::prelude::ChecklistExecution::find_by_id(execution_id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(execution.status, ExecutionStatus::Pending);

    Ok(())
}

/// Expect the login audit entry to carry the first X-Forwarded-For address
#[tokio::test]
async fn login_records_forwarded_client_ip() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    test.user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;
    let app = test.into_router();

    let body = serde_json::json!({ "email": "ana@example.com", "password": TEST_PASSWORD });
    let response = app
        .oneshot(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let logs = entity::prelude::SystemLog::find().all(&test.db).await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].ip_address.as_deref(), Some("203.0.113.7"));

    Ok(())
}

/// Expect anonymous admin requests to be sent to the login page
#[tokio::test]
async fn admin_redirects_anonymous_to_login() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let app = test.into_router();

    let response = app
        .oneshot(Request::get("/admin/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );

    Ok(())
}

/// Expect anonymous requests for the admin API to be sent to the login page too
#[tokio::test]
async fn admin_logs_redirect_anonymous_to_login() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let app = test.into_router();

    let response = app
        .oneshot(Request::get("/api/admin/logs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );

    Ok(())
}

/// Expect a logged in supervisor to reach the admin overview through the session cookie
#[tokio::test]
async fn admin_overview_for_logged_in_supervisor() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    test.user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let app = test.into_router();

    let cookie = login_cookie(&app, "sup@example.com").await;
    let response = app
        .oneshot(
            Request::get("/admin/")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["open_tickets"], 0);
    assert_eq!(body["user"]["email"], "sup@example.com");

    Ok(())
}

/// Expect a standard user to be logged in but denied the admin overview
#[tokio::test]
async fn admin_overview_denied_for_standard_user() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    test.user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;
    let app = test.into_router();

    let cookie = login_cookie(&app, "ana@example.com").await;
    let response = app
        .oneshot(
            Request::get("/admin/")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect API routes outside the admin prefix to answer without redirecting
#[tokio::test]
async fn api_routes_are_not_redirected() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let app = test.into_router();

    let response = app
        .oneshot(Request::get("/api/auth/user").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect the legacy Truepush routes to keep method and body through a 307
#[tokio::test]
async fn truepush_send_redirects_through_router() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let app = test.into_router();

    let response = app
        .oneshot(
            Request::post("/api/truepush/send")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/onesignal/send"
    );

    Ok(())
}
