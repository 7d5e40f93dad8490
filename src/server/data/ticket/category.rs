use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct CategoryRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CategoryRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        sector_id: i32,
        name: String,
        webhook_url: Option<String>,
        requires_approval: bool,
        default_solution_time_hours: i32,
    ) -> Result<entity::ticket_category::Model, DbErr> {
        let category = entity::ticket_category::ActiveModel {
            sector_id: ActiveValue::Set(sector_id),
            name: ActiveValue::Set(name),
            webhook_url: ActiveValue::Set(webhook_url),
            requires_approval: ActiveValue::Set(requires_approval),
            default_solution_time_hours: ActiveValue::Set(default_solution_time_hours),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        category.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        category_id: i32,
    ) -> Result<Option<entity::ticket_category::Model>, DbErr> {
        entity::prelude::TicketCategory::find_by_id(category_id)
            .one(self.db)
            .await
    }

    /// Active categories ordered by name, optionally for one sector
    pub async fn list_active(
        &self,
        sector_id: Option<i32>,
    ) -> Result<Vec<entity::ticket_category::Model>, DbErr> {
        let mut query = entity::prelude::TicketCategory::find()
            .filter(entity::ticket_category::Column::IsActive.eq(true));

        if let Some(sector_id) = sector_id {
            query = query.filter(entity::ticket_category::Column::SectorId.eq(sector_id));
        }

        query
            .order_by_asc(entity::ticket_category::Column::Name)
            .all(self.db)
            .await
    }
}
