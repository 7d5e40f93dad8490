//! OneSignal REST client and push channel.

use async_trait::async_trait;
use entity::sea_orm_active_enums::{ActionType, Hierarchy, NotificationPriority, NotificationType};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    model::notification::{OneSignalStatsDto, SegmentDto, SendNotificationDto},
    server::{
        config::OneSignalConfig,
        data::{audit::AuditRepository, notification::OneSignalPlayerRepository},
        error::{auth::AuthError, notification::NotificationError, Error},
        model::{db::UserModel, permission::UserPermissions},
        service::notification::dispatcher::{NotificationChannel, NotificationMessage, Recipients},
    },
};

/// Segment OneSignal creates for every app, used for broadcasts
pub static ALL_SUBSCRIBERS_SEGMENT: &str = "Total Subscriptions";

pub enum OneSignalTarget<'a> {
    /// External IDs set by the browser SDK, which are our user IDs
    Users(&'a [i32]),
    Everyone,
}

#[derive(Debug, Deserialize)]
pub struct OneSignalAppStats {
    #[serde(default)]
    pub players: u64,
    #[serde(default)]
    pub messageable_players: u64,
}

#[derive(Clone)]
pub struct OneSignalClient {
    http: reqwest::Client,
    app_id: String,
    rest_api_key: String,
    api_url: String,
    icon_url: String,
}

impl OneSignalClient {
    pub fn new(http: reqwest::Client, config: &OneSignalConfig, base_url: &str) -> Self {
        Self {
            http,
            app_id: config.app_id.clone(),
            rest_api_key: config.rest_api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            icon_url: format!("{}/static/images/logo.png", base_url),
        }
    }

    fn payload(&self, message: &NotificationMessage, target: OneSignalTarget<'_>) -> Value {
        let mut payload = json!({
            "app_id": self.app_id,
            "headings": { "en": message.title, "pt": message.title },
            "contents": { "en": message.body, "pt": message.body },
            "chrome_web_icon": self.icon_url,
        });

        if let Some(url) = &message.url {
            payload["url"] = json!(url);
        }

        match target {
            OneSignalTarget::Users(user_ids) => {
                let external_ids: Vec<String> = user_ids.iter().map(|id| id.to_string()).collect();

                payload["include_aliases"] = json!({ "external_id": external_ids });
                payload["target_channel"] = json!("push");
            }
            OneSignalTarget::Everyone => {
                payload["included_segments"] = json!([ALL_SUBSCRIBERS_SEGMENT]);
            }
        }

        payload
    }

    /// Creates a notification and returns the number of recipients OneSignal reported
    pub async fn send(
        &self,
        message: &NotificationMessage,
        target: OneSignalTarget<'_>,
    ) -> Result<u64, NotificationError> {
        let response = self
            .http
            .post(format!("{}/notifications", self.api_url))
            .header("Authorization", format!("Basic {}", self.rest_api_key))
            .json(&self.payload(message, target))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(NotificationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        // OneSignal answers 200 with an `errors` field when no subscriber matched
        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        if parsed.get("errors").is_some_and(|errors| !errors.is_null()) {
            return Err(NotificationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parsed
            .get("recipients")
            .and_then(Value::as_u64)
            .unwrap_or_default())
    }

    pub async fn app_stats(&self) -> Result<OneSignalAppStats, NotificationError> {
        let response = self
            .http
            .get(format!("{}/apps/{}", self.api_url, self.app_id))
            .header("Authorization", format!("Basic {}", self.rest_api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Api {
                status: status.as_u16(),
                body: response.text().await?,
            });
        }

        Ok(response.json().await?)
    }

    /// Segments every OneSignal app has out of the box
    pub fn segments(&self) -> Vec<SegmentDto> {
        [
            (ALL_SUBSCRIBERS_SEGMENT, "Todas as inscrições", "Every subscribed device"),
            ("Active Users", "Usuários ativos", "Devices seen in the last week"),
            ("Inactive Users", "Usuários inativos", "Devices not seen in the last week"),
        ]
        .into_iter()
        .map(|(id, name, description)| SegmentDto {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
    }
}

pub struct OneSignalChannel {
    client: OneSignalClient,
}

impl OneSignalChannel {
    pub fn new(client: OneSignalClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationChannel for OneSignalChannel {
    fn name(&self) -> &'static str {
        "onesignal"
    }

    async fn send(
        &self,
        _db: &DatabaseConnection,
        message: &NotificationMessage,
        recipients: &Recipients,
    ) -> Result<usize, NotificationError> {
        let target = if recipients.everyone {
            OneSignalTarget::Everyone
        } else if recipients.user_ids.is_empty() {
            return Ok(0);
        } else {
            OneSignalTarget::Users(&recipients.user_ids)
        };

        let delivered = self.client.send(message, target).await?;

        Ok(delivered as usize)
    }
}

/// Administrative OneSignal operations behind the `/api/onesignal` endpoints
pub struct OneSignalService<'a> {
    db: &'a DatabaseConnection,
    client: Option<&'a OneSignalClient>,
}

impl<'a> OneSignalService<'a> {
    pub fn new(db: &'a DatabaseConnection, client: Option<&'a OneSignalClient>) -> Self {
        Self { db, client }
    }

    fn client(&self) -> Result<&'a OneSignalClient, NotificationError> {
        self.client.ok_or(NotificationError::NotConfigured("OneSignal"))
    }

    fn require_admin(actor: &UserModel) -> Result<(), AuthError> {
        if !actor.is_at_least(Hierarchy::Administrativo) {
            return Err(AuthError::denied("OneSignal administration requires ADMINISTRATIVO or above"));
        }

        Ok(())
    }

    /// Push only send through OneSignal, without in-app rows. SUPERADMIN only.
    pub async fn send(&self, actor: &UserModel, request: SendNotificationDto) -> Result<u64, Error> {
        if !actor.is_superadmin() {
            return Err(AuthError::denied("Only SUPERADMIN users can send communications").into());
        }

        let title = request.title.trim();
        let body = request.message.trim();
        if title.is_empty() || body.is_empty() {
            return Err(Error::Validation("Title and message are required".to_string()));
        }

        let mut message = NotificationMessage::new(NotificationType::Communication, title, body)
            .with_priority(request.priority.unwrap_or(NotificationPriority::Normal))
            .created_by(actor.id);
        if let Some(url) = request.action_url.filter(|url| !url.is_empty()) {
            message = message.with_url(url);
        }

        let target = match &request.user_ids {
            Some(user_ids) => OneSignalTarget::Users(user_ids),
            None => OneSignalTarget::Everyone,
        };

        let delivered = self.client()?.send(&message, target).await?;

        AuditRepository::new(self.db)
            .record(
                Some(actor.id),
                ActionType::CommunicationSend,
                format!("Sent OneSignal push \"{}\" to {} devices", title, delivered),
            )
            .await?;

        Ok(delivered)
    }

    pub async fn stats(&self, actor: &UserModel) -> Result<OneSignalStatsDto, Error> {
        Self::require_admin(actor)?;

        let app = self.client()?.app_stats().await?;
        let registered_players = OneSignalPlayerRepository::new(self.db)
            .count_active()
            .await?;

        Ok(OneSignalStatsDto {
            players: app.players,
            messageable_players: app.messageable_players,
            registered_players,
        })
    }

    pub fn segments(&self, actor: &UserModel) -> Result<Vec<SegmentDto>, Error> {
        Self::require_admin(actor)?;

        Ok(self.client()?.segments())
    }
}
