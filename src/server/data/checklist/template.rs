use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct TemplateRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TemplateRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: String,
        description: String,
        sector_id: i32,
        created_by: i32,
    ) -> Result<entity::checklist_template::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let template = entity::checklist_template::ActiveModel {
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(description),
            sector_id: ActiveValue::Set(sector_id),
            created_by: ActiveValue::Set(created_by),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        template.insert(self.db).await
    }

    pub async fn add_task(
        &self,
        template_id: i32,
        title: String,
        description: String,
        sort_order: i32,
        is_required: bool,
    ) -> Result<entity::checklist_task::Model, DbErr> {
        let task = entity::checklist_task::ActiveModel {
            template_id: ActiveValue::Set(template_id),
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            sort_order: ActiveValue::Set(sort_order),
            is_required: ActiveValue::Set(is_required),
            ..Default::default()
        };

        task.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        template_id: i32,
    ) -> Result<Option<entity::checklist_template::Model>, DbErr> {
        entity::prelude::ChecklistTemplate::find_by_id(template_id)
            .one(self.db)
            .await
    }

    pub async fn get_many(
        &self,
        template_ids: Vec<i32>,
    ) -> Result<Vec<entity::checklist_template::Model>, DbErr> {
        entity::prelude::ChecklistTemplate::find()
            .filter(entity::checklist_template::Column::Id.is_in(template_ids))
            .all(self.db)
            .await
    }

    /// Tasks of a template in display order
    pub async fn tasks(&self, template_id: i32) -> Result<Vec<entity::checklist_task::Model>, DbErr> {
        entity::prelude::ChecklistTask::find()
            .filter(entity::checklist_task::Column::TemplateId.eq(template_id))
            .order_by_asc(entity::checklist_task::Column::SortOrder)
            .order_by_asc(entity::checklist_task::Column::Id)
            .all(self.db)
            .await
    }

    /// Active templates ordered by name, optionally for one sector
    pub async fn list_active(
        &self,
        sector_id: Option<i32>,
    ) -> Result<Vec<entity::checklist_template::Model>, DbErr> {
        let mut query = entity::prelude::ChecklistTemplate::find()
            .filter(entity::checklist_template::Column::IsActive.eq(true));

        if let Some(sector_id) = sector_id {
            query = query.filter(entity::checklist_template::Column::SectorId.eq(sector_id));
        }

        query
            .order_by_asc(entity::checklist_template::Column::Name)
            .all(self.db)
            .await
    }

    pub async fn deactivate(
        &self,
        template: entity::checklist_template::Model,
    ) -> Result<entity::checklist_template::Model, DbErr> {
        let mut template: entity::checklist_template::ActiveModel = template.into();
        template.is_active = ActiveValue::Set(false);
        template.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        template.update(self.db).await
    }
}
