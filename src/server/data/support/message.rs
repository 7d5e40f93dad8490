use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct SupportMessageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SupportMessageRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        chat_id: i32,
        user_id: i32,
        message: String,
        is_internal: bool,
    ) -> Result<entity::support_chat_message::Model, DbErr> {
        let message = entity::support_chat_message::ActiveModel {
            chat_id: ActiveValue::Set(chat_id),
            user_id: ActiveValue::Set(user_id),
            message: ActiveValue::Set(message),
            is_internal: ActiveValue::Set(is_internal),
            is_read: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        message.insert(self.db).await
    }

    /// Oldest first, internal notes only when `include_internal` is set
    pub async fn list_for_chat(
        &self,
        chat_id: i32,
        include_internal: bool,
    ) -> Result<Vec<entity::support_chat_message::Model>, DbErr> {
        let mut query = entity::prelude::SupportChatMessage::find()
            .filter(entity::support_chat_message::Column::ChatId.eq(chat_id));

        if !include_internal {
            query = query.filter(entity::support_chat_message::Column::IsInternal.eq(false));
        }

        query
            .order_by_asc(entity::support_chat_message::Column::CreatedAt)
            .order_by_asc(entity::support_chat_message::Column::Id)
            .all(self.db)
            .await
    }
}
