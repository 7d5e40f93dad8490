use super::*;

/// Expect a supervisor to assume an open ticket, moving it to EM_ANDAMENTO with history
#[tokio::test]
async fn supervisor_assumes_open_ticket() -> Result<(), TestError> {
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

    let result = ticket_service.assume_ticket(&supervisor, ticket.id).await;

    assert!(result.is_ok());
    let assumed = result.unwrap();
    assert_eq!(assumed.status, TicketStatus::EmAndamento);
    assert_eq!(assumed.assigned_to, Some(supervisor.id));

    let detail = ticket_service.get_ticket(&creator, ticket.id).await;
    assert!(detail.is_ok());
    let detail = detail.unwrap();
    assert!(detail
        .comments
        .iter()
        .any(|comment| comment.comment_type == CommentType::Assumption));
    assert_eq!(detail.logs.len(), 1);
    assert_eq!(detail.logs[0].old_status, Some(TicketStatus::Aberto));

    // Already assigned to the supervisor now
    assert!(matches!(
        ticket_service.assume_ticket(&supervisor, ticket.id).await,
        Err(Error::TicketError(TicketError::CannotAssume(_)))
    ));

    Ok(())
}

/// Expect creators, PADRAO users and closed tickets to be refused
#[tokio::test]
async fn refuses_invalid_assumptions() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_ticket_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    let creator = test
        .user()
        .insert_user("sup1@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let padrao = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;
    let ticket = test.ticket().insert_ticket(creator.id, &category).await?;

    assert_eq!(
        assume_blocker(&creator, &ticket),
        Some("you created this ticket")
    );
    assert_eq!(
        assume_blocker(&padrao, &ticket),
        Some("requires SUPERVISOR or above")
    );

    let mut closed = ticket.clone();
    closed.status = TicketStatus::Fechado;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, None)
        .await?;
    assert_eq!(assume_blocker(&admin, &closed), Some("the ticket is closed"));
    assert_eq!(assume_blocker(&admin, &ticket), None);

    Ok(())
}
