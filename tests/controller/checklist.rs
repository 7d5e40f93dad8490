use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Path, State},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::IntoResponse,
    Json,
};
use chamados::{
    model::checklist::{CreateAssignmentDto, CreateTaskDto, CreateTemplateDto},
    server::{
        controller::checklist::{
            approve_execution, create_assignment, create_template, submit_execution,
        },
        model::session::user::SessionUserId,
    },
};
use chrono::Local;
use entity::sea_orm_active_enums::{
    AssignmentPeriod, ExecutionStatus, Hierarchy, ScheduleType,
};
use sea_orm::EntityTrait;

use super::*;

/// Builds a multipart body from `(name, file_name, value)` parts.
async fn form(parts: &[(String, Option<&str>, &str)]) -> Multipart {
    let mut body = String::new();
    for (name, file_name, value) in parts {
        body.push_str("--FORMBOUNDARY\r\n");
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str("--FORMBOUNDARY--\r\n");

    let request = Request::builder()
        .header(CONTENT_TYPE, "multipart/form-data; boundary=FORMBOUNDARY")
        .body(Body::from(body))
        .unwrap();

    Multipart::from_request(request, &()).await.unwrap()
}

struct Setup {
    supervisor_id: i32,
    executor_id: i32,
    execution_id: i32,
    task_id: i32,
}

/// Supervisor creates a one task template and assigns it to an executor for today's morning
async fn template_assigned_for_today(test: &mut TestContext) -> Result<Setup, TestError> {
    let sector = test.user().insert_sector("Operações").await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let executor = test
        .user()
        .insert_user("exec@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    SessionUserId::insert(&test.session, supervisor.id).await.unwrap();

    let result = create_template(
        State(test.into_app_state()),
        test.session.clone(),
        Json(CreateTemplateDto {
            name: "Opening".to_string(),
            description: String::new(),
            sector_id: sector.id,
            tasks: vec![CreateTaskDto {
                title: "Unlock the front door".to_string(),
                description: String::new(),
                is_required: true,
            }],
        }),
    )
    .await;
    assert_eq!(result.unwrap().into_response().status(), StatusCode::CREATED);

    let template = entity::prelude::ChecklistTemplate::find()
        .one(&test.db)
        .await?
        .unwrap();
    let task = entity::prelude::ChecklistTask::find()
        .one(&test.db)
        .await?
        .unwrap();

    let today = Local::now().date_naive();
    let result = create_assignment(
        State(test.into_app_state()),
        test.session.clone(),
        Json(CreateAssignmentDto {
            template_id: template.id,
            assigned_to: executor.id,
            schedule_type: ScheduleType::Daily,
            custom_dates: Vec::new(),
            start_date: today,
            end_date: today,
            period: AssignmentPeriod::Morning,
        }),
    )
    .await;
    assert_eq!(result.unwrap().into_response().status(), StatusCode::CREATED);

    let executions = entity::prelude::ChecklistExecution::find().all(&test.db).await?;
    assert_eq!(executions.len(), 1);

    Ok(Setup {
        supervisor_id: supervisor.id,
        executor_id: executor.id,
        execution_id: executions[0].id,
        task_id: task.id,
    })
}

/// Expect a submission with evidence to await approval and the supervisor's approval to close it
#[tokio::test]
async fn submit_then_approve() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let setup = template_assigned_for_today(&mut test).await?;

    SessionUserId::insert(&test.session, setup.executor_id).await.unwrap();
    let multipart = form(&[
        (format!("task_{}", setup.task_id), None, "on"),
        (format!("notes_{}", setup.task_id), None, "Opened at 7:55"),
        (
            format!("evidence_image_{}", setup.task_id),
            Some("door.jpg"),
            "jpeg-bytes",
        ),
    ])
    .await;

    let result = submit_execution(
        State(test.into_app_state()),
        test.session.clone(),
        Path(setup.execution_id),
        multipart,
    )
    .await;
    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);

    let execution = entity::prelude::ChecklistExecution::find_by_id(setup.execution_id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(execution.status, ExecutionStatus::AwaitingApproval);

    let task_execution = entity::prelude::ChecklistTaskExecution::find()
        .one(&test.db)
        .await?
        .unwrap();
    assert!(task_execution.is_completed);
    let image = task_execution.evidence_image.unwrap();
    assert!(test.media_root().join(&image).exists());

    // The executor can never approve their own work
    let result = approve_execution(
        State(test.into_app_state()),
        test.session.clone(),
        Path(setup.execution_id),
    )
    .await;
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    SessionUserId::insert(&test.session, setup.supervisor_id).await.unwrap();
    let result = approve_execution(
        State(test.into_app_state()),
        test.session.clone(),
        Path(setup.execution_id),
    )
    .await;
    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);

    let execution = entity::prelude::ChecklistExecution::find_by_id(setup.execution_id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(execution.status, ExecutionStatus::Approved);
    assert_eq!(execution.approved_by, Some(setup.supervisor_id));

    Ok(())
}

/// Expect 400 and nothing stored when a completed task has no evidence
#[tokio::test]
async fn rejects_completed_task_without_evidence() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let setup = template_assigned_for_today(&mut test).await?;

    SessionUserId::insert(&test.session, setup.executor_id).await.unwrap();
    let multipart = form(&[(format!("task_{}", setup.task_id), None, "on")]).await;

    let result = submit_execution(
        State(test.into_app_state()),
        test.session.clone(),
        Path(setup.execution_id),
        multipart,
    )
    .await;
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    let execution = entity::prelude::ChecklistExecution::find_by_id(setup.execution_id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(execution.status, ExecutionStatus::Pending);

    let task_execution = entity::prelude::ChecklistTaskExecution::find()
        .one(&test.db)
        .await?
        .unwrap();
    assert!(!task_execution.is_completed);

    Ok(())
}
