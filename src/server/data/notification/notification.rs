use chrono::Utc;
use entity::sea_orm_active_enums::{NotificationPriority, NotificationType};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub action_url: Option<String>,
    pub created_by: Option<i32>,
}

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a notification and one unread row per recipient
    pub async fn create_for_users(
        &self,
        notification: NewNotification,
        user_ids: &[i32],
    ) -> Result<entity::notification::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let notification = entity::notification::ActiveModel {
            title: ActiveValue::Set(notification.title),
            message: ActiveValue::Set(notification.message),
            notification_type: ActiveValue::Set(notification.notification_type),
            priority: ActiveValue::Set(notification.priority),
            action_url: ActiveValue::Set(notification.action_url),
            created_by: ActiveValue::Set(notification.created_by),
            created_at: ActiveValue::Set(now),
            sent_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        if !user_ids.is_empty() {
            let rows = user_ids
                .iter()
                .map(|user_id| entity::user_notification::ActiveModel {
                    notification_id: ActiveValue::Set(notification.id),
                    user_id: ActiveValue::Set(*user_id),
                    is_read: ActiveValue::Set(false),
                    read_at: ActiveValue::Set(None),
                    created_at: ActiveValue::Set(now),
                    ..Default::default()
                });

            entity::prelude::UserNotification::insert_many(rows)
                .exec(self.db)
                .await?;
        }

        Ok(notification)
    }

    /// Notifications delivered to `user_id`, newest first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<
        Vec<(
            entity::user_notification::Model,
            Option<entity::notification::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::UserNotification::find()
            .find_also_related(entity::prelude::Notification)
            .filter(entity::user_notification::Column::UserId.eq(user_id))
            .order_by_desc(entity::user_notification::Column::CreatedAt)
            .order_by_desc(entity::user_notification::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Marks the user's copy of a notification as read, `None` when the user never received it
    pub async fn mark_read(
        &self,
        notification_id: i32,
        user_id: i32,
    ) -> Result<Option<entity::user_notification::Model>, DbErr> {
        let Some(row) = entity::prelude::UserNotification::find()
            .filter(entity::user_notification::Column::NotificationId.eq(notification_id))
            .filter(entity::user_notification::Column::UserId.eq(user_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        if row.is_read {
            return Ok(Some(row));
        }

        let mut row: entity::user_notification::ActiveModel = row.into();
        row.is_read = ActiveValue::Set(true);
        row.read_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        Ok(Some(row.update(self.db).await?))
    }

    /// Returns the number of rows flipped to read
    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::UserNotification::update_many()
            .col_expr(entity::user_notification::Column::IsRead, Expr::value(true))
            .col_expr(
                entity::user_notification::Column::ReadAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::user_notification::Column::UserId.eq(user_id))
            .filter(entity::user_notification::Column::IsRead.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use entity::sea_orm_active_enums::{NotificationPriority, NotificationType};

    use super::{NewNotification, NotificationRepository};

    fn message() -> NewNotification {
        NewNotification {
            title: "Novo Chamado #1".to_string(),
            message: "Printer offline".to_string(),
            notification_type: NotificationType::Ticket,
            priority: NotificationPriority::Normal,
            action_url: Some("/tickets/1/".to_string()),
            created_by: None,
        }
    }

    /// Expect each recipient to get an unread copy that can be marked read once
    #[tokio::test]
    async fn creates_and_marks_read() -> Result<(), TestError> {
        let test = TestBuilder::new().with_notification_tables().build().await?;
        let repo = NotificationRepository::new(&test.db);

        let notification = repo.create_for_users(message(), &[1, 2]).await?;

        let inbox = repo.list_for_user(1, 50).await?;
        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].0.is_read);

        let read = repo.mark_read(notification.id, 1).await?;
        assert!(read.is_some_and(|row| row.is_read && row.read_at.is_some()));

        assert!(repo.mark_read(notification.id, 3).await?.is_none());

        assert_eq!(repo.mark_all_read(2).await?, 1);
        assert_eq!(repo.mark_all_read(2).await?, 0);

        Ok(())
    }
}
