use chrono::Utc;
use entity::sea_orm_active_enums::CommentType;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct CommentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        ticket_id: i32,
        user_id: i32,
        comment: String,
        comment_type: CommentType,
        assigned_to: Option<i32>,
    ) -> Result<entity::ticket_comment::Model, DbErr> {
        let comment = entity::ticket_comment::ActiveModel {
            ticket_id: ActiveValue::Set(ticket_id),
            user_id: ActiveValue::Set(user_id),
            comment: ActiveValue::Set(comment),
            comment_type: ActiveValue::Set(comment_type),
            assigned_to: ActiveValue::Set(assigned_to),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        comment.insert(self.db).await
    }

    /// Oldest first
    pub async fn list_for_ticket(
        &self,
        ticket_id: i32,
    ) -> Result<Vec<entity::ticket_comment::Model>, DbErr> {
        entity::prelude::TicketComment::find()
            .filter(entity::ticket_comment::Column::TicketId.eq(ticket_id))
            .order_by_asc(entity::ticket_comment::Column::CreatedAt)
            .order_by_asc(entity::ticket_comment::Column::Id)
            .all(self.db)
            .await
    }
}
