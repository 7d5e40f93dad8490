//! Fan-out of one notification across the in-app inbox and every enabled push channel.
//!
//! Dispatch is best-effort: the triggering action has already been committed by the time
//! [`Notifier::dispatch`] runs, so channel failures are logged and reported back in the
//! [`DispatchReport`] instead of being returned as errors.

use std::sync::Arc;

use async_trait::async_trait;
use entity::sea_orm_active_enums::{NotificationPriority, NotificationType};
use sea_orm::DatabaseConnection;

use crate::{
    model::notification::{ChannelFailureDto, DispatchReportDto},
    server::{
        data::{
            notification::{NewNotification, NotificationRepository},
            user::UserRepository,
        },
        error::notification::NotificationError,
    },
};

/// Content shared by every channel.
#[derive(Clone, Debug)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    /// Relative link opened when the notification is clicked
    pub url: Option<String>,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub created_by: Option<i32>,
}

impl NotificationMessage {
    pub fn new(
        notification_type: NotificationType,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: None,
            notification_type,
            priority: NotificationPriority::Normal,
            created_by: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn created_by(mut self, user_id: i32) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

/// Who a notification is addressed to before inactive users are filtered out.
#[derive(Clone, Debug)]
pub enum Audience {
    Users(Vec<i32>),
    Everyone,
}

/// Resolved recipients handed to each channel.
#[derive(Clone, Debug)]
pub struct Recipients {
    /// Active user IDs, deduplicated
    pub user_ids: Vec<i32>,
    /// Set for broadcasts so providers can target their own "all subscribers" segment
    pub everyone: bool,
}

/// A push provider.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns how many deliveries the provider accepted
    async fn send(
        &self,
        db: &DatabaseConnection,
        message: &NotificationMessage,
        recipients: &Recipients,
    ) -> Result<usize, NotificationError>;
}

#[derive(Clone, Debug, Default)]
pub struct DispatchReport {
    /// In-app notification row, `None` when it could not be stored
    pub notification_id: Option<i32>,
    pub recipients: usize,
    /// Sum of deliveries accepted by the push channels
    pub delivered: usize,
    /// `(channel, error)` pairs
    pub failed: Vec<(String, String)>,
}

impl From<DispatchReport> for DispatchReportDto {
    fn from(report: DispatchReport) -> Self {
        Self {
            notification_id: report.notification_id,
            recipients: report.recipients,
            delivered: report.delivered,
            failed: report
                .failed
                .into_iter()
                .map(|(channel, error)| ChannelFailureDto { channel, error })
                .collect(),
        }
    }
}

/// Cheap to clone; channels are shared behind an [`Arc`].
#[derive(Clone, Default)]
pub struct Notifier {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl Notifier {
    /// Creates a notifier that only writes in-app notifications
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: impl NotificationChannel + 'static) -> Self {
        self.channels.push(Arc::new(channel));
        self
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|channel| channel.name()).collect()
    }

    /// Stores the in-app notification and pushes it through every channel.
    ///
    /// Never fails; every problem is logged and recorded in the returned report.
    pub async fn dispatch(
        &self,
        db: &DatabaseConnection,
        message: NotificationMessage,
        audience: Audience,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        let user_repo = UserRepository::new(db);
        let resolved = match &audience {
            Audience::Users(user_ids) => user_repo.filter_active_ids(user_ids).await,
            Audience::Everyone => user_repo.all_active_ids().await,
        };

        let mut user_ids = match resolved {
            Ok(user_ids) => user_ids,
            Err(e) => {
                tracing::error!("Failed to resolve notification recipients: {}", e);
                report.failed.push(("recipients".to_string(), e.to_string()));

                return report;
            }
        };
        user_ids.sort_unstable();
        user_ids.dedup();

        let recipients = Recipients {
            user_ids,
            everyone: matches!(audience, Audience::Everyone),
        };
        report.recipients = recipients.user_ids.len();

        if recipients.user_ids.is_empty() && !recipients.everyone {
            tracing::debug!(title = %message.title, "Notification has no active recipients");

            return report;
        }

        let notification_repo = NotificationRepository::new(db);
        match notification_repo
            .create_for_users(
                NewNotification {
                    title: message.title.clone(),
                    message: message.body.clone(),
                    notification_type: message.notification_type,
                    priority: message.priority,
                    action_url: message.url.clone(),
                    created_by: message.created_by,
                },
                &recipients.user_ids,
            )
            .await
        {
            Ok(notification) => report.notification_id = Some(notification.id),
            Err(e) => {
                tracing::error!("Failed to store in-app notification: {}", e);
                report.failed.push(("in_app".to_string(), e.to_string()));
            }
        }

        for channel in &self.channels {
            match channel.send(db, &message, &recipients).await {
                Ok(delivered) => {
                    tracing::debug!(channel = channel.name(), delivered, "Push channel accepted notification");

                    report.delivered += delivered;
                }
                Err(e) => {
                    tracing::warn!(channel = channel.name(), "Push channel failed: {}", e);

                    report.failed.push((channel.name().to_string(), e.to_string()));
                }
            }
        }

        report
    }
}
