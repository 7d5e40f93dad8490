use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

/// Legacy Truepush subscriber IDs, kept for history only.
pub struct TruepushSubscriberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TruepushSubscriberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn upsert(
        &self,
        user_id: i32,
        subscriber_id: String,
    ) -> Result<entity::truepush_subscriber::Model, DbErr> {
        let existing = entity::prelude::TruepushSubscriber::find()
            .filter(entity::truepush_subscriber::Column::SubscriberId.eq(&subscriber_id))
            .one(self.db)
            .await?;

        if let Some(subscriber) = existing {
            let mut subscriber: entity::truepush_subscriber::ActiveModel = subscriber.into();
            subscriber.user_id = ActiveValue::Set(Some(user_id));
            subscriber.is_active = ActiveValue::Set(true);

            return subscriber.update(self.db).await;
        }

        entity::truepush_subscriber::ActiveModel {
            user_id: ActiveValue::Set(Some(user_id)),
            subscriber_id: ActiveValue::Set(subscriber_id),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}
