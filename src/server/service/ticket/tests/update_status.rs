use sea_orm::{EntityTrait, PaginatorTrait};

use super::*;

/// Expect resolving a ticket to stamp resolved_at and write log, comment, audit and notification
#[tokio::test]
async fn resolves_ticket() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_ticket_tables()
        .with_notification_tables()
        .build()
        .await?;
    let sector = test.user().insert_sector("TI").await?;
    let creator = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;
    let ticket = test.ticket().insert_ticket(creator.id, &category).await?;

    let notifier = Notifier::new();
    let http = reqwest::Client::new();
    let ticket_service = TicketService::new(&test.db, &http, &notifier);

    let result = ticket_service
        .update_status(
            &supervisor,
            ticket.id,
            UpdateTicketStatusDto {
                status: TicketStatus::Resolvido,
                observation: "Toner replaced".to_string(),
                solution: Some("Replaced the toner".to_string()),
            },
        )
        .await;

    assert!(result.is_ok());
    let updated = result.unwrap();
    assert_eq!(updated.status, TicketStatus::Resolvido);
    assert!(updated.resolved_at.is_some());
    assert_eq!(updated.solution, "Replaced the toner");

    let logs = AuditRepository::new(&test.db)
        .list(Some(ActionType::TicketUpdate), 10)
        .await?;
    assert_eq!(logs.len(), 1);

    assert_eq!(
        entity::prelude::TicketComment::find().count(&test.db).await?,
        1
    );
    // Creator is notified, the acting supervisor is not
    let inbox = entity::prelude::UserNotification::find().all(&test.db).await?;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].user_id, creator.id);

    Ok(())
}

/// Expect an unrelated PADRAO user to be refused
#[tokio::test]
async fn refuses_unrelated_user() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_ticket_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    let creator = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let other = test
        .user()
        .insert_user("bob@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;
    let ticket = test.ticket().insert_ticket(creator.id, &category).await?;

    let notifier = Notifier::new();
    let http = reqwest::Client::new();
    let result = TicketService::new(&test.db, &http, &notifier)
        .update_status(
            &other,
            ticket.id,
            UpdateTicketStatusDto {
                status: TicketStatus::Fechado,
                observation: String::new(),
                solution: None,
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::TicketError(TicketError::NotVisible(_)))
    ));

    Ok(())
}

/// Expect an empty comment to be rejected and a valid one to notify the creator
#[tokio::test]
async fn comments_on_visible_ticket() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_ticket_tables()
        .with_notification_tables()
        .build()
        .await?;
    let sector = test.user().insert_sector("TI").await?;
    let creator = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, None)
        .await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;
    let ticket = test.ticket().insert_ticket(creator.id, &category).await?;

    let notifier = Notifier::new();
    let http = reqwest::Client::new();
    let ticket_service = TicketService::new(&test.db, &http, &notifier);

    assert!(matches!(
        ticket_service.add_comment(&admin, ticket.id, " ".to_string()).await,
        Err(Error::TicketError(TicketError::EmptyField("comment")))
    ));

    let comment = ticket_service
        .add_comment(&admin, ticket.id, "Checking".to_string())
        .await;
    assert!(comment.is_ok_and(|comment| comment.comment_type == CommentType::Comment));

    let inbox = entity::prelude::UserNotification::find().all(&test.db).await?;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].user_id, creator.id);

    Ok(())
}
