use chrono::Utc;
use entity::sea_orm_active_enums::TicketStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Status history of tickets.
pub struct TicketLogRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TicketLogRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        ticket_id: i32,
        user_id: i32,
        old_status: Option<TicketStatus>,
        new_status: TicketStatus,
        observation: String,
    ) -> Result<entity::ticket_log::Model, DbErr> {
        let log = entity::ticket_log::ActiveModel {
            ticket_id: ActiveValue::Set(ticket_id),
            user_id: ActiveValue::Set(user_id),
            old_status: ActiveValue::Set(old_status),
            new_status: ActiveValue::Set(new_status),
            observation: ActiveValue::Set(observation),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        log.insert(self.db).await
    }

    pub async fn list_for_ticket(
        &self,
        ticket_id: i32,
    ) -> Result<Vec<entity::ticket_log::Model>, DbErr> {
        entity::prelude::TicketLog::find()
            .filter(entity::ticket_log::Column::TicketId.eq(ticket_id))
            .order_by_asc(entity::ticket_log::Column::CreatedAt)
            .order_by_asc(entity::ticket_log::Column::Id)
            .all(self.db)
            .await
    }
}
