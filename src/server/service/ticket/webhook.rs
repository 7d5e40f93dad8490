//! Outbound ticket webhooks.
//!
//! Deliveries happen after the ticket change is committed. Each request has a 10 second
//! timeout and no retries; failures are logged and never reach the caller.

use std::{collections::HashMap, time::Duration};

use chrono::Utc;
use entity::sea_orm_active_enums::{Hierarchy, TicketStatus, WebhookEvent};
use sea_orm::{ActiveEnum, DatabaseConnection};
use serde_json::{json, Value};

use crate::{
    model::ticket::{CreateWebhookDto, TicketDto, WebhookDto},
    server::{
        data::{
            ticket::{CategoryRepository, NewWebhook, WebhookRepository},
            user::{SectorRepository, UserRepository},
        },
        error::{auth::AuthError, ticket::TicketError, Error},
        model::{
            db::{TicketModel, UserModel},
            permission::UserPermissions,
        },
    },
};

pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Names resolved once per delivery batch for the payload.
#[derive(Clone, Debug, Default)]
pub struct TicketContext {
    pub sector_name: String,
    pub category_name: String,
    pub created_by_name: String,
}

/// Event fired for a ticket entering `status`
pub fn event_for_status(status: TicketStatus) -> WebhookEvent {
    match status {
        TicketStatus::Resolvido => WebhookEvent::TicketResolved,
        TicketStatus::Fechado => WebhookEvent::TicketClosed,
        _ => WebhookEvent::TicketUpdated,
    }
}

pub fn build_payload(
    webhook: &entity::webhook::Model,
    ticket: &TicketModel,
    context: &TicketContext,
    actor: Option<&UserModel>,
) -> Value {
    let dto = TicketDto::from(ticket.clone());

    let mut payload = json!({
        "event": webhook.event.to_value(),
        "timestamp": Utc::now().to_rfc3339(),
        "webhook_name": webhook.name,
        "object_id": ticket.id,
        "ticket": {
            "id": ticket.id,
            "title": ticket.title,
            "description": ticket.description,
            "status": ticket.status.to_value(),
            "priority": ticket.priority.to_value(),
            "sector": context.sector_name,
            "category": context.category_name,
            "created_by": context.created_by_name,
            "created_at": ticket.created_at.and_utc().to_rfc3339(),
            "due_date": ticket.due_date.map(|due| due.and_utc().to_rfc3339()),
            "is_overdue": dto.is_overdue,
        },
    });

    if let Some(actor) = actor {
        payload["user"] = json!({
            "id": actor.id,
            "full_name": format!("{} {}", actor.first_name, actor.last_name),
            "email": actor.email,
        });
    }

    payload
}

pub struct WebhookService<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
}

impl<'a> WebhookService<'a> {
    pub fn new(db: &'a DatabaseConnection, http: &'a reqwest::Client) -> Self {
        Self { db, http }
    }

    pub async fn create(
        &self,
        actor: &UserModel,
        request: CreateWebhookDto,
    ) -> Result<WebhookDto, Error> {
        require_admin(actor)?;

        if request.name.trim().is_empty() {
            return Err(TicketError::EmptyField("name").into());
        }
        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(Error::Validation("Webhook URL must be http(s)".to_string()));
        }

        let headers = serde_json::to_string(&request.headers)
            .map_err(|e| Error::InternalError(format!("Failed to encode webhook headers: {}", e)))?;

        let webhook = WebhookRepository::new(self.db)
            .create(NewWebhook {
                name: request.name.trim().to_string(),
                url: request.url,
                event: request.event,
                category_id: request.category_id,
                sector_id: request.sector_id,
                headers,
            })
            .await?;

        Ok(webhook.into())
    }

    pub async fn list(&self, actor: &UserModel) -> Result<Vec<WebhookDto>, Error> {
        require_admin(actor)?;

        let webhooks = WebhookRepository::new(self.db).list().await?;

        Ok(webhooks.into_iter().map(WebhookDto::from).collect())
    }

    pub async fn delete(&self, actor: &UserModel, webhook_id: i32) -> Result<(), Error> {
        require_admin(actor)?;

        let result = WebhookRepository::new(self.db).delete(webhook_id).await?;
        if result.rows_affected == 0 {
            return Err(TicketError::WebhookNotFound(webhook_id).into());
        }

        Ok(())
    }

    /// Resolves the sector, category and creator names used in payloads
    pub async fn context(&self, ticket: &TicketModel) -> Result<TicketContext, Error> {
        let sector_name = SectorRepository::new(self.db)
            .get_by_id(ticket.sector_id)
            .await?
            .map(|sector| sector.name)
            .unwrap_or_default();
        let category_name = CategoryRepository::new(self.db)
            .get_by_id(ticket.category_id)
            .await?
            .map(|category| category.name)
            .unwrap_or_default();
        let created_by_name = UserRepository::new(self.db)
            .get_by_id(ticket.created_by)
            .await?
            .map(|user| format!("{} {}", user.first_name, user.last_name))
            .unwrap_or_default();

        Ok(TicketContext {
            sector_name,
            category_name,
            created_by_name,
        })
    }

    /// Delivers `event` to every matching webhook, returning how many accepted it
    pub async fn trigger(
        &self,
        event: WebhookEvent,
        ticket: &TicketModel,
        actor: Option<&UserModel>,
    ) -> usize {
        let webhooks = match WebhookRepository::new(self.db)
            .find_matching(event, ticket.category_id, ticket.sector_id)
            .await
        {
            Ok(webhooks) => webhooks,
            Err(e) => {
                tracing::error!(ticket_id = ticket.id, "Failed to load webhooks: {}", e);

                return 0;
            }
        };

        if webhooks.is_empty() {
            return 0;
        }

        let context = match self.context(ticket).await {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(ticket_id = ticket.id, "Failed to build webhook context: {}", e);

                return 0;
            }
        };

        let mut delivered = 0;
        for webhook in &webhooks {
            let payload = build_payload(webhook, ticket, &context, actor);
            let headers: HashMap<String, String> =
                serde_json::from_str(&webhook.headers).unwrap_or_else(|e| {
                    tracing::warn!(webhook_id = webhook.id, "Ignoring malformed webhook headers: {}", e);

                    HashMap::new()
                });

            let mut request = self
                .http
                .post(&webhook.url)
                .timeout(WEBHOOK_TIMEOUT)
                .json(&payload);
            for (name, value) in &headers {
                request = request.header(name.as_str(), value.as_str());
            }

            match request.send().await.and_then(|response| response.error_for_status()) {
                Ok(_) => delivered += 1,
                Err(e) => {
                    tracing::warn!(webhook_id = webhook.id, ticket_id = ticket.id, "Webhook delivery failed: {}", e);
                }
            }
        }

        delivered
    }

    /// Posts the creation summary to the category's own webhook URL, if it has one
    pub async fn trigger_category_hook(
        &self,
        ticket: &TicketModel,
        category: &entity::ticket_category::Model,
    ) -> bool {
        let Some(url) = category.webhook_url.as_deref().filter(|url| !url.is_empty()) else {
            return false;
        };

        let context = match self.context(ticket).await {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(ticket_id = ticket.id, "Failed to build webhook context: {}", e);

                return false;
            }
        };

        let payload = json!({
            "ticket_id": ticket.id,
            "title": ticket.title,
            "description": ticket.description,
            "sector": context.sector_name,
            "category": context.category_name,
            "created_by": context.created_by_name,
            "created_at": ticket.created_at.and_utc().to_rfc3339(),
            "status": ticket.status.to_value(),
        });

        match self
            .http
            .post(url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(ticket_id = ticket.id, category_id = category.id, "Category webhook failed: {}", e);

                false
            }
        }
    }
}

fn require_admin(actor: &UserModel) -> Result<(), AuthError> {
    if actor.is_at_least(Hierarchy::Administrativo) {
        Ok(())
    } else {
        Err(AuthError::denied("Managing webhooks requires ADMINISTRATIVO or above"))
    }
}
