use mockito::Matcher;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use super::*;
use crate::server::{
    config::OneSignalConfig,
    data::ticket::NewWebhook,
    service::notification::onesignal::{OneSignalChannel, OneSignalClient},
};

fn request(sector_id: i32, category_id: i32) -> CreateTicketDto {
    CreateTicketDto {
        title: "Printer offline".to_string(),
        description: "The second floor printer stopped".to_string(),
        sector_id,
        category_id,
        priority: None,
    }
}

/// Expect the ticket to be created and kept when the push provider answers 500
#[tokio::test]
async fn keeps_ticket_when_push_fails() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_ticket_tables()
        .with_notification_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/notifications")
                .match_body(Matcher::PartialJson(json!({
                    "headings": { "en": "Novo Chamado #1" },
                })))
                .with_status(500)
                .with_body("internal error")
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let sector = test.user().insert_sector("TI").await?;
    let creator = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    test.user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;

    let client = OneSignalClient::new(
        reqwest::Client::new(),
        &OneSignalConfig {
            app_id: TEST_ONESIGNAL_APP_ID.to_string(),
            rest_api_key: TEST_ONESIGNAL_API_KEY.to_string(),
            api_url: test.server_url(),
        },
        "http://localhost:8000",
    );
    let notifier = Notifier::new().with_channel(OneSignalChannel::new(client));
    let http = reqwest::Client::new();

    let ticket_service = TicketService::new(&test.db, &http, &notifier);
    let result = ticket_service
        .create_ticket(&creator, request(sector.id, category.id))
        .await;

    assert!(result.is_ok());
    let ticket = result.unwrap();
    assert_eq!(ticket.status, TicketStatus::Aberto);
    assert_eq!(ticket.solution_time_hours, 24);
    assert!(ticket.due_date.is_some());

    let stored = entity::prelude::Ticket::find_by_id(ticket.id).one(&test.db).await?;
    assert!(stored.is_some());

    // The supervisor still gets the in-app notification
    assert_eq!(
        entity::prelude::UserNotification::find().count(&test.db).await?,
        1
    );
    test.assert_mocks();

    Ok(())
}

/// Expect the TICKET_CREATED webhook and the category webhook to receive the new ticket
#[tokio::test]
async fn fires_creation_webhooks() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_ticket_tables()
        .with_notification_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/hooks/ticket")
                .match_header("x-token", "abc")
                .match_body(Matcher::PartialJson(json!({
                    "event": "TICKET_CREATED",
                    "webhook_name": "ERP",
                    "ticket": { "sector": "TI", "category": "Hardware" },
                })))
                .with_status(200)
                .expect(1)
                .create()
        })
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/hooks/category")
                .match_body(Matcher::PartialJson(json!({ "status": "ABERTO" })))
                .with_status(204)
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let sector = test.user().insert_sector("TI").await?;
    let creator = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let category_hook = format!("{}/hooks/category", test.server_url());
    let category = test
        .ticket()
        .insert_category_with_webhook(sector.id, "Hardware", Some(category_hook))
        .await?;

    crate::server::data::ticket::WebhookRepository::new(&test.db)
        .create(NewWebhook {
            name: "ERP".to_string(),
            url: format!("{}/hooks/ticket", test.server_url()),
            event: WebhookEvent::TicketCreated,
            category_id: None,
            sector_id: Some(sector.id),
            headers: r#"{"x-token":"abc"}"#.to_string(),
        })
        .await?;

    let notifier = Notifier::new();
    let http = reqwest::Client::new();
    let result = TicketService::new(&test.db, &http, &notifier)
        .create_ticket(&creator, request(sector.id, category.id))
        .await;

    assert!(result.is_ok());
    test.assert_mocks();

    Ok(())
}

/// Expect a category from another sector and empty fields to be rejected
#[tokio::test]
async fn validates_request() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_ticket_tables().build().await?;
    let ti = test.user().insert_sector("TI").await?;
    let rh = test.user().insert_sector("RH").await?;
    let creator = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(ti.id))
        .await?;
    let category = test.ticket().insert_category(ti.id, "Hardware").await?;

    let notifier = Notifier::new();
    let http = reqwest::Client::new();
    let ticket_service = TicketService::new(&test.db, &http, &notifier);

    let mismatch = ticket_service
        .create_ticket(&creator, request(rh.id, category.id))
        .await;
    assert!(matches!(
        mismatch,
        Err(Error::TicketError(TicketError::CategorySectorMismatch { .. }))
    ));

    let mut empty = request(ti.id, category.id);
    empty.title = "   ".to_string();
    let empty = ticket_service.create_ticket(&creator, empty).await;
    assert!(matches!(
        empty,
        Err(Error::TicketError(TicketError::EmptyField("title")))
    ));

    let missing = ticket_service.create_ticket(&creator, request(ti.id, 99)).await;
    assert!(matches!(
        missing,
        Err(Error::TicketError(TicketError::CategoryNotFound(99)))
    ));

    Ok(())
}

/// Expect PADRAO users to see their own tickets only
#[tokio::test]
async fn hides_other_users_tickets() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_ticket_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    let owner = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let other = test
        .user()
        .insert_user("bob@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;
    let ticket = test.ticket().insert_ticket(owner.id, &category).await?;

    let notifier = Notifier::new();
    let http = reqwest::Client::new();
    let ticket_service = TicketService::new(&test.db, &http, &notifier);

    assert!(matches!(
        ticket_service.get_ticket(&other, ticket.id).await,
        Err(Error::TicketError(TicketError::NotVisible(_)))
    ));
    assert!(ticket_service.get_ticket(&supervisor, ticket.id).await.is_ok());
    assert!(ticket_service
        .list_tickets(&other)
        .await
        .is_ok_and(|tickets| tickets.is_empty()));
    assert!(matches!(
        ticket_service.get_ticket(&owner, 99).await,
        Err(Error::TicketError(TicketError::NotFound(99)))
    ));

    Ok(())
}
