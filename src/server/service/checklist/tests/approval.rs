use sea_orm::EntityTrait;

use super::*;

struct Scenario {
    executor: UserModel,
    supervisor: UserModel,
    execution_id: i32,
}

/// Sector "Loja" with an executor, its supervisor and one execution in `status`
async fn scenario(test: &mut TestContext, status: ExecutionStatus) -> Result<Scenario, TestError> {
    let sector = test.user().insert_sector("Loja").await?;
    let executor = test
        .user()
        .insert_user("exec@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let (template, tasks) = test
        .checklist()
        .insert_template(sector.id, supervisor.id, &["Open doors"])
        .await?;
    let assignment = test
        .checklist()
        .insert_assignment(template.id, executor.id, supervisor.id, date())
        .await?;
    let (execution, _) = test
        .checklist()
        .insert_execution(&assignment, &tasks, status)
        .await?;

    Ok(Scenario {
        executor,
        supervisor,
        execution_id: execution.id,
    })
}

/// Expect a supervisor of the sector to approve, with an audit entry
#[tokio::test]
async fn supervisor_approves() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checklist_tables()
        .with_notification_tables()
        .build()
        .await?;
    let scenario = scenario(&mut test, ExecutionStatus::AwaitingApproval).await?;

    let notifier = Notifier::new();
    let result = ChecklistService::new(&test.db, &notifier)
        .approve_execution(&scenario.supervisor, scenario.execution_id)
        .await;

    assert!(result.is_ok());
    let approved = result.unwrap();
    assert_eq!(approved.status, ExecutionStatus::Approved);
    assert_eq!(approved.approved_by, Some(scenario.supervisor.id));
    assert!(approved.approved_at.is_some());

    let audit = AuditRepository::new(&test.db)
        .list(Some(ActionType::ChecklistApprove), 10)
        .await?;
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].user_id, Some(scenario.supervisor.id));

    Ok(())
}

/// Expect rejection to return the execution to pending, audit it and notify the executor
#[tokio::test]
async fn rejection_returns_to_pending() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checklist_tables()
        .with_notification_tables()
        .build()
        .await?;
    let scenario = scenario(&mut test, ExecutionStatus::AwaitingApproval).await?;

    let notifier = Notifier::new();
    let checklist_service = ChecklistService::new(&test.db, &notifier);

    let result = checklist_service
        .reject_execution(
            &scenario.supervisor,
            scenario.execution_id,
            Some("Photo is blurry".to_string()),
        )
        .await;

    assert!(result.is_ok());
    let rejected = result.unwrap();
    assert_eq!(rejected.status, ExecutionStatus::Pending);
    assert!(rejected.submitted_at.is_none());
    assert_eq!(rejected.rejection_note.as_deref(), Some("Photo is blurry"));

    let audit = AuditRepository::new(&test.db)
        .list(Some(ActionType::ChecklistReject), 10)
        .await?;
    assert_eq!(audit.len(), 1);

    let inbox = entity::prelude::UserNotification::find().all(&test.db).await?;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].user_id, scenario.executor.id);

    Ok(())
}

/// Expect a rejection without a note (or with a blank one) to succeed and store no note
#[tokio::test]
async fn rejection_without_note() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checklist_tables()
        .with_notification_tables()
        .build()
        .await?;
    let scenario = scenario(&mut test, ExecutionStatus::AwaitingApproval).await?;

    let notifier = Notifier::new();
    let rejected = ChecklistService::new(&test.db, &notifier)
        .reject_execution(&scenario.supervisor, scenario.execution_id, Some("  ".to_string()))
        .await
        .unwrap();

    assert_eq!(rejected.status, ExecutionStatus::Pending);
    assert!(rejected.rejection_note.is_none());

    let audit = AuditRepository::new(&test.db)
        .list(Some(ActionType::ChecklistReject), 10)
        .await?;
    assert_eq!(audit.len(), 1);
    assert!(audit[0].description.ends_with(')'));

    Ok(())
}

/// Expect the executor to be refused even with a reviewing role
#[tokio::test]
async fn executor_cannot_review() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_checklist_tables().build().await?;
    let sector = test.user().insert_sector("Loja").await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let (template, tasks) = test
        .checklist()
        .insert_template(sector.id, supervisor.id, &["Open doors"])
        .await?;
    let assignment = test
        .checklist()
        .insert_assignment(template.id, supervisor.id, supervisor.id, date())
        .await?;
    let (execution, _) = test
        .checklist()
        .insert_execution(&assignment, &tasks, ExecutionStatus::AwaitingApproval)
        .await?;

    let notifier = Notifier::new();
    let result = ChecklistService::new(&test.db, &notifier)
        .approve_execution(&supervisor, execution.id)
        .await;

    assert!(matches!(
        result,
        Err(Error::ChecklistError(ChecklistError::SelfApproval))
    ));

    Ok(())
}

/// Expect supervisors of other sectors and PADRAO users to be refused, ADMINISTRATIVO allowed
#[tokio::test]
async fn reviewer_must_cover_sector() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_checklist_tables().build().await?;
    let scenario = scenario(&mut test, ExecutionStatus::AwaitingApproval).await?;
    let other_sector = test.user().insert_sector("Estoque").await?;
    let outsider = test
        .user()
        .insert_user("out@example.com", Hierarchy::Supervisor, Some(other_sector.id))
        .await?;
    let colleague = test
        .user()
        .insert_user("col@example.com", Hierarchy::Padrao, scenario.supervisor.sector_id)
        .await?;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, Some(other_sector.id))
        .await?;

    let notifier = Notifier::new();
    let checklist_service = ChecklistService::new(&test.db, &notifier);

    assert!(matches!(
        checklist_service.approve_execution(&outsider, scenario.execution_id).await,
        Err(Error::ChecklistError(ChecklistError::NotApprover))
    ));
    assert!(matches!(
        checklist_service.approve_execution(&colleague, scenario.execution_id).await,
        Err(Error::ChecklistError(ChecklistError::NotApprover))
    ));
    assert!(checklist_service
        .approve_execution(&admin, scenario.execution_id)
        .await
        .is_ok());

    Ok(())
}

/// Expect review to be refused outside awaiting_approval
#[tokio::test]
async fn only_awaiting_approval_is_reviewable() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_checklist_tables().build().await?;
    let scenario = scenario(&mut test, ExecutionStatus::Pending).await?;

    let notifier = Notifier::new();
    let checklist_service = ChecklistService::new(&test.db, &notifier);

    assert!(matches!(
        checklist_service
            .approve_execution(&scenario.supervisor, scenario.execution_id)
            .await,
        Err(Error::ChecklistError(ChecklistError::InvalidTransition {
            from: ExecutionStatus::Pending,
            to: ExecutionStatus::Approved,
        }))
    ));
    assert!(matches!(
        checklist_service
            .reject_execution(&scenario.supervisor, scenario.execution_id, Some("No".to_string()))
            .await,
        Err(Error::ChecklistError(ChecklistError::InvalidTransition { .. }))
    ));

    Ok(())
}

/// Expect the approval queue to be limited to the reviewer's sector
#[tokio::test]
async fn pending_approvals_are_sector_scoped() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_checklist_tables().build().await?;
    let scenario = scenario(&mut test, ExecutionStatus::AwaitingApproval).await?;

    let other_sector = test.user().insert_sector("Estoque").await?;
    let other_executor = test
        .user()
        .insert_user("exec2@example.com", Hierarchy::Padrao, Some(other_sector.id))
        .await?;
    let (template, tasks) = test
        .checklist()
        .insert_template(other_sector.id, other_executor.id, &["Count boxes"])
        .await?;
    let assignment = test
        .checklist()
        .insert_assignment(template.id, other_executor.id, other_executor.id, date())
        .await?;
    test.checklist()
        .insert_execution(&assignment, &tasks, ExecutionStatus::AwaitingApproval)
        .await?;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, None)
        .await?;

    let notifier = Notifier::new();
    let checklist_service = ChecklistService::new(&test.db, &notifier);

    let supervisor_queue = checklist_service
        .pending_approvals(&scenario.supervisor, Default::default(), date())
        .await;
    assert!(supervisor_queue.is_ok());
    let supervisor_queue = supervisor_queue.unwrap();
    assert_eq!(supervisor_queue.executions.len(), 1);
    assert_eq!(supervisor_queue.executions[0].id, scenario.execution_id);
    assert_eq!(supervisor_queue.stats.pending_today, 1);

    let admin_queue = checklist_service
        .pending_approvals(&admin, Default::default(), date())
        .await;
    assert!(admin_queue.is_ok_and(|queue| queue.stats.pending_total == 2));

    assert!(matches!(
        checklist_service
            .pending_approvals(&scenario.executor, Default::default(), date())
            .await,
        Err(Error::AuthError(_))
    ));

    Ok(())
}
