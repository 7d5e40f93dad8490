//! Notification service layer.
//!
//! [`dispatcher`] fans a message out to the in-app inbox and the enabled push channels,
//! [`webpush`] and [`onesignal`] implement those channels. [`NotificationService`] covers the
//! per-user operations behind the HTTP endpoints: device registry, inbox and broadcasts.

pub mod dispatcher;
pub mod onesignal;
pub mod webpush;

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::{ActionType, DeviceType, NotificationPriority, NotificationType};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::notification::{DeviceTokenDto, NotificationDto, SendNotificationDto, SubscribeDto},
    server::{
        data::{
            audit::AuditRepository,
            notification::{
                DeviceTokenRepository, NotificationRepository, OneSignalPlayerRepository,
                TruepushSubscriberRepository,
            },
        },
        error::{auth::AuthError, notification::NotificationError, Error},
        model::{db::UserModel, permission::UserPermissions},
        service::notification::dispatcher::{
            Audience, DispatchReport, NotificationMessage, Notifier,
        },
    },
};

/// Inbox size returned by [`NotificationService::inbox`]
pub const INBOX_LIMIT: u64 = 50;

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a Notifier,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a Notifier) -> Self {
        Self { db, notifier }
    }

    /// Registers or refreshes the browser's push subscription for `user`
    pub async fn subscribe(
        &self,
        user: &UserModel,
        subscription: SubscribeDto,
    ) -> Result<DeviceTokenDto, Error> {
        if subscription.endpoint.trim().is_empty() {
            return Err(Error::Validation("Subscription endpoint is required".to_string()));
        }

        let token = DeviceTokenRepository::new(self.db)
            .upsert(
                user.id,
                subscription.endpoint,
                subscription.keys.p256dh,
                subscription.keys.auth,
                subscription.device_type.unwrap_or(DeviceType::Web),
            )
            .await?;

        tracing::debug!(user_id = user.id, device_id = token.id, "Registered push subscription");

        Ok(token.into())
    }

    pub async fn devices(&self, user: &UserModel) -> Result<Vec<DeviceTokenDto>, Error> {
        let tokens = DeviceTokenRepository::new(self.db)
            .list_for_user(user.id)
            .await?;

        Ok(tokens.into_iter().map(DeviceTokenDto::from).collect())
    }

    /// Deactivates one of the user's devices; other users' devices are reported as missing
    pub async fn remove_device(&self, user: &UserModel, device_id: i32) -> Result<(), Error> {
        let device_repo = DeviceTokenRepository::new(self.db);

        let token = device_repo
            .get_by_id(device_id)
            .await?
            .filter(|token| token.user_id == Some(user.id))
            .ok_or(NotificationError::DeviceNotFound(device_id))?;

        device_repo.deactivate(token).await?;

        Ok(())
    }

    pub async fn inbox(&self, user: &UserModel) -> Result<Vec<NotificationDto>, Error> {
        let rows = NotificationRepository::new(self.db)
            .list_for_user(user.id, INBOX_LIMIT)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(delivery, notification)| {
                notification.map(|notification| NotificationDto {
                    id: notification.id,
                    title: notification.title,
                    message: notification.message,
                    notification_type: notification.notification_type,
                    priority: notification.priority,
                    action_url: notification.action_url,
                    is_read: delivery.is_read,
                    read_at: delivery.read_at,
                    created_at: notification.created_at,
                })
            })
            .collect())
    }

    pub async fn mark_read(&self, user: &UserModel, notification_id: i32) -> Result<(), Error> {
        NotificationRepository::new(self.db)
            .mark_read(notification_id, user.id)
            .await?
            .ok_or(NotificationError::NotificationNotFound(notification_id))?;

        Ok(())
    }

    pub async fn mark_all_read(&self, user: &UserModel) -> Result<u64, Error> {
        Ok(NotificationRepository::new(self.db)
            .mark_all_read(user.id)
            .await?)
    }

    /// Sends a test notification to the user's own devices
    pub async fn send_test(&self, user: &UserModel) -> DispatchReport {
        let message = NotificationMessage::new(
            NotificationType::System,
            "Notificação de teste",
            "As notificações push estão funcionando neste dispositivo.",
        )
        .with_url("/");

        self.notifier
            .dispatch(self.db, message, Audience::Users(vec![user.id]))
            .await
    }

    /// Communication broadcast, restricted to SUPERADMIN.
    ///
    /// Targets `user_ids` when given, otherwise every active user.
    pub async fn broadcast(
        &self,
        actor: &UserModel,
        request: SendNotificationDto,
    ) -> Result<DispatchReport, Error> {
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

        let audience = match request.user_ids {
            Some(user_ids) => Audience::Users(user_ids),
            None => Audience::Everyone,
        };

        let report = self.notifier.dispatch(self.db, message, audience).await;

        let txn = self.db.begin().await?;
        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::CommunicationSend,
                format!("Sent communication \"{}\" to {} users", title, report.recipients),
            )
            .await?;
        txn.commit().await?;

        Ok(report)
    }

    pub async fn register_onesignal_player(
        &self,
        user: &UserModel,
        player_id: String,
    ) -> Result<(), Error> {
        if player_id.trim().is_empty() {
            return Err(Error::Validation("player_id is required".to_string()));
        }

        OneSignalPlayerRepository::new(self.db)
            .upsert(user.id, player_id)
            .await?;

        Ok(())
    }

    /// Keeps a record of a legacy Truepush subscriber, nothing is ever sent to it
    pub async fn record_truepush_subscriber(
        &self,
        user: &UserModel,
        subscriber_id: String,
    ) -> Result<(), Error> {
        if subscriber_id.trim().is_empty() {
            return Ok(());
        }

        TruepushSubscriberRepository::new(self.db)
            .upsert(user.id, subscriber_id)
            .await?;

        Ok(())
    }
}
