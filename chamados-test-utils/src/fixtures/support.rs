use chrono::Utc;
use entity::sea_orm_active_enums::{SupportPriority, SupportStatus};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn support<'a>(&'a mut self) -> SupportFixtures<'a> {
        SupportFixtures { context: self }
    }
}

pub struct SupportFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> SupportFixtures<'a> {
    pub async fn insert_agent(
        &self,
        user_id: i32,
        is_active: bool,
    ) -> Result<entity::support_agent::Model, TestError> {
        Ok(
            entity::prelude::SupportAgent::insert(entity::support_agent::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                is_active: ActiveValue::Set(is_active),
                can_assign_tickets: ActiveValue::Set(false),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    /// Inserts an open, unassigned chat.
    pub async fn insert_chat(
        &self,
        user_id: i32,
        sector_id: i32,
    ) -> Result<entity::support_chat::Model, TestError> {
        self.insert_chat_with_status(user_id, sector_id, SupportStatus::Aberto)
            .await
    }

    pub async fn insert_chat_with_status(
        &self,
        user_id: i32,
        sector_id: i32,
        status: SupportStatus,
    ) -> Result<entity::support_chat::Model, TestError> {
        let now = Utc::now().naive_utc();
        let closed_at = (status == SupportStatus::Fechado).then_some(now);

        Ok(
            entity::prelude::SupportChat::insert(entity::support_chat::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                sector_id: ActiveValue::Set(sector_id),
                title: ActiveValue::Set("Cannot access e-mail".to_string()),
                status: ActiveValue::Set(status),
                priority: ActiveValue::Set(SupportPriority::Media),
                assigned_to: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                closed_at: ActiveValue::Set(closed_at),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
