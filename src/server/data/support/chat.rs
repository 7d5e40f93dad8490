use chrono::Utc;
use entity::sea_orm_active_enums::{SupportPriority, SupportStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct SupportChatRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SupportChatRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Opens an unassigned chat
    pub async fn create(
        &self,
        user_id: i32,
        sector_id: i32,
        title: String,
        priority: SupportPriority,
    ) -> Result<entity::support_chat::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let chat = entity::support_chat::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            sector_id: ActiveValue::Set(sector_id),
            title: ActiveValue::Set(title),
            status: ActiveValue::Set(SupportStatus::Aberto),
            priority: ActiveValue::Set(priority),
            assigned_to: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            closed_at: ActiveValue::Set(None),
            ..Default::default()
        };

        chat.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        chat_id: i32,
    ) -> Result<Option<entity::support_chat::Model>, DbErr> {
        entity::prelude::SupportChat::find_by_id(chat_id)
            .one(self.db)
            .await
    }

    /// Most recently updated first, optionally restricted to one sector
    pub async fn list(
        &self,
        sector_id: Option<i32>,
    ) -> Result<Vec<entity::support_chat::Model>, DbErr> {
        let mut query = entity::prelude::SupportChat::find();

        if let Some(sector_id) = sector_id {
            query = query.filter(entity::support_chat::Column::SectorId.eq(sector_id));
        }

        query
            .order_by_desc(entity::support_chat::Column::UpdatedAt)
            .order_by_desc(entity::support_chat::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<entity::support_chat::Model>, DbErr> {
        entity::prelude::SupportChat::find()
            .filter(entity::support_chat::Column::UserId.eq(user_id))
            .order_by_desc(entity::support_chat::Column::UpdatedAt)
            .all(self.db)
            .await
    }

    pub async fn assign(
        &self,
        chat: entity::support_chat::Model,
        agent_id: i32,
    ) -> Result<entity::support_chat::Model, DbErr> {
        let mut chat: entity::support_chat::ActiveModel = chat.into();
        chat.assigned_to = ActiveValue::Set(Some(agent_id));
        chat.status = ActiveValue::Set(SupportStatus::EmAndamento);
        chat.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        chat.update(self.db).await
    }

    /// Sets the status, `closed_at` follows whether the chat is closed
    pub async fn update_status(
        &self,
        chat: entity::support_chat::Model,
        status: SupportStatus,
    ) -> Result<entity::support_chat::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let closed_at = chat.closed_at;

        let mut chat: entity::support_chat::ActiveModel = chat.into();
        chat.status = ActiveValue::Set(status);
        chat.updated_at = ActiveValue::Set(now);
        chat.closed_at = ActiveValue::Set(match status {
            SupportStatus::Fechado => closed_at.or(Some(now)),
            _ => None,
        });

        chat.update(self.db).await
    }

    pub async fn touch(
        &self,
        chat: entity::support_chat::Model,
    ) -> Result<entity::support_chat::Model, DbErr> {
        let mut chat: entity::support_chat::ActiveModel = chat.into();
        chat.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        chat.update(self.db).await
    }
}
