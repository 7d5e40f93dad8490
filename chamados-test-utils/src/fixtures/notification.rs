use chrono::Utc;
use entity::sea_orm_active_enums::DeviceType;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn notification<'a>(&'a mut self) -> NotificationFixtures<'a> {
        NotificationFixtures { context: self }
    }
}

pub struct NotificationFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> NotificationFixtures<'a> {
    /// Inserts an active web device token with placeholder keys.
    pub async fn insert_device_token(
        &self,
        user_id: i32,
        endpoint: &str,
    ) -> Result<entity::device_token::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::DeviceToken::insert(entity::device_token::ActiveModel {
                user_id: ActiveValue::Set(Some(user_id)),
                endpoint: ActiveValue::Set(endpoint.to_string()),
                p256dh: ActiveValue::Set("p256dh".to_string()),
                auth: ActiveValue::Set("auth".to_string()),
                device_type: ActiveValue::Set(DeviceType::Web),
                is_active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(now),
                last_used: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
