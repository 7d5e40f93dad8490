use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn prize<'a>(&'a mut self) -> PrizeFixtures<'a> {
        PrizeFixtures { context: self }
    }
}

pub struct PrizeFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> PrizeFixtures<'a> {
    pub async fn insert_prize(
        &self,
        name: &str,
        value_cents: i64,
        stock: i32,
        unlimited_stock: bool,
    ) -> Result<entity::prize::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Prize::insert(entity::prize::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            description: ActiveValue::Set(String::new()),
            value_cents: ActiveValue::Set(value_cents),
            stock: ActiveValue::Set(stock),
            unlimited_stock: ActiveValue::Set(unlimited_stock),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }
}
