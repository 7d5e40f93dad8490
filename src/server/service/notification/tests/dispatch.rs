use async_trait::async_trait;
use sea_orm::{EntityTrait, PaginatorTrait};

use super::*;
use crate::server::service::notification::dispatcher::{NotificationChannel, Recipients};

struct FailingChannel;

#[async_trait]
impl NotificationChannel for FailingChannel {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn send(
        &self,
        _db: &DatabaseConnection,
        _message: &NotificationMessage,
        _recipients: &Recipients,
    ) -> Result<usize, NotificationError> {
        Err(NotificationError::NotConfigured("failing channel"))
    }
}

fn message() -> NotificationMessage {
    NotificationMessage::new(NotificationType::Ticket, "Novo Chamado #1", "Printer offline")
        .with_url("/tickets/1/")
}

/// Expect a failing channel to be reported while the in-app notification is still stored
#[tokio::test]
async fn reports_channel_failure_without_error() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_notification_tables().build().await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;

    let notifier = Notifier::new().with_channel(FailingChannel);
    let report = notifier
        .dispatch(&test.db, message(), Audience::Users(vec![user.id]))
        .await;

    assert!(report.notification_id.is_some());
    assert_eq!(report.recipients, 1);
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "failing");

    let inbox = entity::prelude::UserNotification::find().count(&test.db).await?;
    assert_eq!(inbox, 1);

    Ok(())
}

/// Expect inactive and duplicate recipients to be dropped before delivery
#[tokio::test]
async fn filters_inactive_recipients() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_notification_tables().build().await?;
    let active = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;
    let inactive = test.user().insert_inactive_user("bob@example.com", None).await?;

    let report = Notifier::new()
        .dispatch(
            &test.db,
            message(),
            Audience::Users(vec![active.id, active.id, inactive.id]),
        )
        .await;

    assert_eq!(report.recipients, 1);
    assert!(report.failed.is_empty());

    Ok(())
}

/// Expect nothing to be stored when no recipient is active
#[tokio::test]
async fn skips_empty_audience() -> Result<(), TestError> {
    let test = TestBuilder::new().with_notification_tables().build().await?;

    let report = Notifier::new()
        .dispatch(&test.db, message(), Audience::Users(Vec::new()))
        .await;

    assert!(report.notification_id.is_none());
    assert_eq!(
        entity::prelude::Notification::find().count(&test.db).await?,
        0
    );

    Ok(())
}

/// Expect a missing table to surface as a failure entry rather than a panic or error
#[tokio::test]
async fn reports_database_failure() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let report = Notifier::new()
        .dispatch(&test.db, message(), Audience::Everyone)
        .await;

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "recipients");

    Ok(())
}
