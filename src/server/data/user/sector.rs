use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct SectorRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SectorRepository<'a, C> {
    /// Creates a new instance of [`SectorRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: String,
        description: String,
    ) -> Result<entity::sector::Model, DbErr> {
        let sector = entity::sector::ActiveModel {
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        sector.insert(self.db).await
    }

    pub async fn get_by_id(&self, sector_id: i32) -> Result<Option<entity::sector::Model>, DbErr> {
        entity::prelude::Sector::find_by_id(sector_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<entity::sector::Model>, DbErr> {
        entity::prelude::Sector::find()
            .filter(entity::sector::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    /// Lists every sector ordered by name
    pub async fn list(&self) -> Result<Vec<entity::sector::Model>, DbErr> {
        entity::prelude::Sector::find()
            .order_by_asc(entity::sector::Column::Name)
            .all(self.db)
            .await
    }
}
