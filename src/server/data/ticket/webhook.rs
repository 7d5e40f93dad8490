use chrono::Utc;
use entity::sea_orm_active_enums::WebhookEvent;
use sea_orm::{
    sea_query::Condition, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    DeleteResult, EntityTrait, QueryFilter, QueryOrder,
};

pub struct NewWebhook {
    pub name: String,
    pub url: String,
    pub event: WebhookEvent,
    pub category_id: Option<i32>,
    pub sector_id: Option<i32>,
    /// JSON object of extra request headers
    pub headers: String,
}

pub struct WebhookRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WebhookRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, webhook: NewWebhook) -> Result<entity::webhook::Model, DbErr> {
        let webhook = entity::webhook::ActiveModel {
            name: ActiveValue::Set(webhook.name),
            url: ActiveValue::Set(webhook.url),
            event: ActiveValue::Set(webhook.event),
            category_id: ActiveValue::Set(webhook.category_id),
            sector_id: ActiveValue::Set(webhook.sector_id),
            headers: ActiveValue::Set(webhook.headers),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        webhook.insert(self.db).await
    }

    pub async fn list(&self) -> Result<Vec<entity::webhook::Model>, DbErr> {
        entity::prelude::Webhook::find()
            .order_by_asc(entity::webhook::Column::Name)
            .all(self.db)
            .await
    }

    /// Returns OK regardless of the webhook existing, check [`DeleteResult::rows_affected`].
    pub async fn delete(&self, webhook_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Webhook::delete_by_id(webhook_id)
            .exec(self.db)
            .await
    }

    /// Active webhooks for `event` whose category and sector filters are unset or match
    pub async fn find_matching(
        &self,
        event: WebhookEvent,
        category_id: i32,
        sector_id: i32,
    ) -> Result<Vec<entity::webhook::Model>, DbErr> {
        use entity::webhook::Column;

        entity::prelude::Webhook::find()
            .filter(Column::IsActive.eq(true))
            .filter(Column::Event.eq(event))
            .filter(
                Condition::any()
                    .add(Column::CategoryId.is_null())
                    .add(Column::CategoryId.eq(category_id)),
            )
            .filter(
                Condition::any()
                    .add(Column::SectorId.is_null())
                    .add(Column::SectorId.eq(sector_id)),
            )
            .all(self.db)
            .await
    }
}
