use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct PrizeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PrizeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: String,
        description: String,
        value_cents: i64,
        stock: i32,
        unlimited_stock: bool,
    ) -> Result<entity::prize::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let prize = entity::prize::ActiveModel {
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(description),
            value_cents: ActiveValue::Set(value_cents),
            stock: ActiveValue::Set(stock),
            unlimited_stock: ActiveValue::Set(unlimited_stock),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        prize.insert(self.db).await
    }

    pub async fn get_by_id(&self, prize_id: i32) -> Result<Option<entity::prize::Model>, DbErr> {
        entity::prelude::Prize::find_by_id(prize_id)
            .one(self.db)
            .await
    }

    /// Prizes ordered by value, optionally filtered by the active flag
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<entity::prize::Model>, DbErr> {
        let mut query = entity::prelude::Prize::find();

        if let Some(active) = active {
            query = query.filter(entity::prize::Column::IsActive.eq(active));
        }

        query
            .order_by_asc(entity::prize::Column::ValueCents)
            .order_by_asc(entity::prize::Column::Name)
            .all(self.db)
            .await
    }

    /// Adds `delta` to the stock of a limited prize, unlimited prizes are returned unchanged
    pub async fn adjust_stock(
        &self,
        prize: entity::prize::Model,
        delta: i32,
    ) -> Result<entity::prize::Model, DbErr> {
        if prize.unlimited_stock {
            return Ok(prize);
        }

        let stock = prize.stock + delta;
        let mut prize: entity::prize::ActiveModel = prize.into();
        prize.stock = ActiveValue::Set(stock);
        prize.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        prize.update(self.db).await
    }
}
