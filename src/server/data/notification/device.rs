use chrono::Utc;
use entity::sea_orm_active_enums::DeviceType;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Web Push subscriptions keyed by their unique endpoint URL.
pub struct DeviceTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DeviceTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a subscription or rebinds and reactivates the existing one for the endpoint
    pub async fn upsert(
        &self,
        user_id: i32,
        endpoint: String,
        p256dh: String,
        auth: String,
        device_type: DeviceType,
    ) -> Result<entity::device_token::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let existing = entity::prelude::DeviceToken::find()
            .filter(entity::device_token::Column::Endpoint.eq(&endpoint))
            .one(self.db)
            .await?;

        match existing {
            Some(token) => {
                let mut token: entity::device_token::ActiveModel = token.into();
                token.user_id = ActiveValue::Set(Some(user_id));
                token.p256dh = ActiveValue::Set(p256dh);
                token.auth = ActiveValue::Set(auth);
                token.device_type = ActiveValue::Set(device_type);
                token.is_active = ActiveValue::Set(true);
                token.last_used = ActiveValue::Set(now);

                token.update(self.db).await
            }
            None => {
                entity::device_token::ActiveModel {
                    user_id: ActiveValue::Set(Some(user_id)),
                    endpoint: ActiveValue::Set(endpoint),
                    p256dh: ActiveValue::Set(p256dh),
                    auth: ActiveValue::Set(auth),
                    device_type: ActiveValue::Set(device_type),
                    is_active: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(now),
                    last_used: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }

    pub async fn get_by_id(
        &self,
        device_id: i32,
    ) -> Result<Option<entity::device_token::Model>, DbErr> {
        entity::prelude::DeviceToken::find_by_id(device_id)
            .one(self.db)
            .await
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<entity::device_token::Model>, DbErr> {
        entity::prelude::DeviceToken::find()
            .filter(entity::device_token::Column::UserId.eq(user_id))
            .order_by_desc(entity::device_token::Column::LastUsed)
            .all(self.db)
            .await
    }

    /// Active tokens belonging to any of `user_ids`
    pub async fn active_for_users(
        &self,
        user_ids: &[i32],
    ) -> Result<Vec<entity::device_token::Model>, DbErr> {
        entity::prelude::DeviceToken::find()
            .filter(entity::device_token::Column::UserId.is_in(user_ids.to_vec()))
            .filter(entity::device_token::Column::IsActive.eq(true))
            .all(self.db)
            .await
    }

    pub async fn deactivate(
        &self,
        token: entity::device_token::Model,
    ) -> Result<entity::device_token::Model, DbErr> {
        let mut token: entity::device_token::ActiveModel = token.into();
        token.is_active = ActiveValue::Set(false);

        token.update(self.db).await
    }

    pub async fn touch(
        &self,
        token: entity::device_token::Model,
    ) -> Result<entity::device_token::Model, DbErr> {
        let mut token: entity::device_token::ActiveModel = token.into();
        token.last_used = ActiveValue::Set(Utc::now().naive_utc());

        token.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use entity::sea_orm_active_enums::DeviceType;

    use super::DeviceTokenRepository;

    /// Expect subscribing the same endpoint twice to update one row and reactivate it
    #[tokio::test]
    async fn upsert_reuses_endpoint() -> Result<(), TestError> {
        let test = TestBuilder::new().with_notification_tables().build().await?;
        let repo = DeviceTokenRepository::new(&test.db);

        let first = repo
            .upsert(
                1,
                "https://push.example.com/a".to_string(),
                "key".to_string(),
                "auth".to_string(),
                DeviceType::Web,
            )
            .await?;
        repo.deactivate(first.clone()).await?;

        let second = repo
            .upsert(
                2,
                "https://push.example.com/a".to_string(),
                "key2".to_string(),
                "auth2".to_string(),
                DeviceType::Android,
            )
            .await?;

        assert_eq!(first.id, second.id);
        assert!(second.is_active);
        assert_eq!(second.user_id, Some(2));
        assert_eq!(repo.active_for_users(&[2]).await?.len(), 1);
        assert!(repo.active_for_users(&[1]).await?.is_empty());

        Ok(())
    }
}
