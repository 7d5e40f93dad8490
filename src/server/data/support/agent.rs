use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct SupportAgentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SupportAgentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Registers the user as an active agent, reactivating a previous registration
    pub async fn register(
        &self,
        user_id: i32,
        can_assign_tickets: bool,
    ) -> Result<entity::support_agent::Model, DbErr> {
        let existing = entity::prelude::SupportAgent::find()
            .filter(entity::support_agent::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        if let Some(agent) = existing {
            let mut agent: entity::support_agent::ActiveModel = agent.into();
            agent.is_active = ActiveValue::Set(true);
            agent.can_assign_tickets = ActiveValue::Set(can_assign_tickets);

            return agent.update(self.db).await;
        }

        entity::support_agent::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            is_active: ActiveValue::Set(true),
            can_assign_tickets: ActiveValue::Set(can_assign_tickets),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn is_active_agent(&self, user_id: i32) -> Result<bool, DbErr> {
        let agent = entity::prelude::SupportAgent::find()
            .filter(entity::support_agent::Column::UserId.eq(user_id))
            .filter(entity::support_agent::Column::IsActive.eq(true))
            .one(self.db)
            .await?;

        Ok(agent.is_some())
    }
}
