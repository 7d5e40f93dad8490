use chrono::Utc;

use super::*;
use crate::server::service::ticket::webhook::{build_payload, TicketContext};

fn ticket() -> TicketModel {
    let now = Utc::now().naive_utc();

    TicketModel {
        id: 7,
        title: "Printer offline".to_string(),
        description: "Second floor".to_string(),
        sector_id: 1,
        category_id: 2,
        status: TicketStatus::Aberto,
        priority: TicketPriority::Alta,
        solution: String::new(),
        solution_time_hours: 24,
        due_date: None,
        created_by: 3,
        assigned_to: None,
        created_at: now,
        updated_at: now,
        resolved_at: None,
        closed_at: None,
    }
}

fn webhook() -> entity::webhook::Model {
    entity::webhook::Model {
        id: 1,
        name: "ERP".to_string(),
        url: "http://localhost/hook".to_string(),
        event: WebhookEvent::TicketUpdated,
        category_id: None,
        sector_id: None,
        headers: "{}".to_string(),
        is_active: true,
        created_at: Utc::now().naive_utc(),
    }
}

/// Expect the payload to carry the event, ticket summary and resolved names
#[test]
fn builds_ticket_payload() {
    let context = TicketContext {
        sector_name: "TI".to_string(),
        category_name: "Hardware".to_string(),
        created_by_name: "Ana Souza".to_string(),
    };

    let payload = build_payload(&webhook(), &ticket(), &context, None);

    assert_eq!(payload["event"], "TICKET_UPDATED");
    assert_eq!(payload["webhook_name"], "ERP");
    assert_eq!(payload["object_id"], 7);
    assert_eq!(payload["ticket"]["priority"], "ALTA");
    assert_eq!(payload["ticket"]["sector"], "TI");
    assert_eq!(payload["ticket"]["created_by"], "Ana Souza");
    assert!(payload["ticket"]["due_date"].is_null());
    assert!(payload.get("user").is_none());
}

/// Expect resolved and closed statuses to map to their own events
#[test]
fn maps_status_to_event() {
    use crate::server::service::ticket::webhook::event_for_status;

    assert_eq!(event_for_status(TicketStatus::Resolvido), WebhookEvent::TicketResolved);
    assert_eq!(event_for_status(TicketStatus::Fechado), WebhookEvent::TicketClosed);
    assert_eq!(event_for_status(TicketStatus::EmAndamento), WebhookEvent::TicketUpdated);
}
