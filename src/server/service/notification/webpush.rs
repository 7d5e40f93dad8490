//! Web Push channel signing each request with the server's VAPID key.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::json;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use crate::server::{
    config::VapidConfig,
    data::notification::DeviceTokenRepository,
    error::notification::NotificationError,
    service::notification::dispatcher::{NotificationChannel, NotificationMessage, Recipients},
};

/// Seconds the push service keeps an undelivered message
const MESSAGE_TTL: u32 = 24 * 60 * 60;

#[derive(Clone, Copy, Debug)]
enum DeviceUpdate {
    Delivered,
    Expired,
}

/// Records the push outcome on the device, returning whether the write went through.
///
/// A failed write is only logged so the remaining devices still get their push.
async fn update_device<C: ConnectionTrait>(
    device_repo: &DeviceTokenRepository<'_, C>,
    token: entity::device_token::Model,
    update: DeviceUpdate,
) -> bool {
    let device_id = token.id;
    let result = match update {
        DeviceUpdate::Delivered => device_repo.touch(token).await,
        DeviceUpdate::Expired => device_repo.deactivate(token).await,
    };

    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(device_id, ?update, "Failed to update push subscription: {}", e);

            false
        }
    }
}

pub struct WebPushChannel {
    client: HyperWebPushClient,
    private_key_pem: String,
    subject: String,
    icon_url: String,
}

impl WebPushChannel {
    pub fn new(config: &VapidConfig, base_url: &str) -> Self {
        Self {
            client: HyperWebPushClient::new(),
            private_key_pem: config.private_key_pem.clone(),
            subject: config.subject.clone(),
            icon_url: format!("{}/static/images/logo.png", base_url),
        }
    }

    /// JSON body read by the service worker
    pub fn payload(&self, message: &NotificationMessage) -> Vec<u8> {
        json!({
            "title": message.title,
            "body": message.body,
            "url": message.url.as_deref().unwrap_or("/"),
            "icon": self.icon_url,
        })
        .to_string()
        .into_bytes()
    }

    async fn push(
        &self,
        token: &entity::device_token::Model,
        payload: &[u8],
    ) -> Result<(), WebPushError> {
        let subscription = SubscriptionInfo::new(&token.endpoint, &token.p256dh, &token.auth);

        let mut signature =
            VapidSignatureBuilder::from_pem(self.private_key_pem.as_bytes(), &subscription)?;
        signature.add_claim("sub", self.subject.as_str());

        let mut builder = WebPushMessageBuilder::new(&subscription);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_ttl(MESSAGE_TTL);
        builder.set_vapid_signature(signature.build()?);

        self.client.send(builder.build()?).await
    }
}

#[async_trait]
impl NotificationChannel for WebPushChannel {
    fn name(&self) -> &'static str {
        "webpush"
    }

    /// Pushes to every active device of the recipients; expired endpoints are deactivated.
    ///
    /// Fails only when every attempted device failed.
    async fn send(
        &self,
        db: &DatabaseConnection,
        message: &NotificationMessage,
        recipients: &Recipients,
    ) -> Result<usize, NotificationError> {
        let device_repo = DeviceTokenRepository::new(db);
        let tokens = device_repo.active_for_users(&recipients.user_ids).await?;

        let payload = self.payload(message);
        let mut delivered = 0;
        let mut last_error = None;

        for token in tokens {
            match self.push(&token, &payload).await {
                Ok(()) => {
                    delivered += 1;
                    update_device(&device_repo, token, DeviceUpdate::Delivered).await;
                }
                Err(WebPushError::EndpointNotValid { .. } | WebPushError::EndpointNotFound { .. }) => {
                    tracing::info!(device_id = token.id, "Deactivating expired push subscription");

                    update_device(&device_repo, token, DeviceUpdate::Expired).await;
                }
                Err(e) => {
                    tracing::warn!(device_id = token.id, "Web push delivery failed: {}", e);

                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if delivered == 0 => Err(e.into()),
            _ => Ok(delivered),
        }
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use chrono::Utc;
    use entity::sea_orm_active_enums::{DeviceType, Hierarchy};

    use super::{update_device, DeviceUpdate};
    use crate::server::data::notification::DeviceTokenRepository;

    /// Expect a failed bookkeeping write to be reported, not raised, and a good one to apply
    #[tokio::test]
    async fn device_update_failure_is_not_fatal() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_notification_tables().build().await?;
        let user = test
            .user()
            .insert_user("ana@example.com", Hierarchy::Padrao, None)
            .await?;
        let device_repo = DeviceTokenRepository::new(&test.db);

        let stored = device_repo
            .upsert(
                user.id,
                "https://push.example.com/stored".to_string(),
                "p256dh".to_string(),
                "auth".to_string(),
                DeviceType::Web,
            )
            .await?;
        let now = Utc::now().naive_utc();
        let missing = entity::device_token::Model {
            id: stored.id + 100,
            user_id: Some(user.id),
            endpoint: "https://push.example.com/gone".to_string(),
            p256dh: "p256dh".to_string(),
            auth: "auth".to_string(),
            device_type: DeviceType::Web,
            is_active: true,
            created_at: now,
            last_used: now,
        };

        assert!(!update_device(&device_repo, missing, DeviceUpdate::Delivered).await);
        assert!(update_device(&device_repo, stored, DeviceUpdate::Expired).await);

        let active = device_repo.active_for_users(&[user.id]).await?;
        assert!(active.is_empty());

        Ok(())
    }
}
