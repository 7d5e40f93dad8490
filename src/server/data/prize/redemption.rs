use chrono::Utc;
use entity::sea_orm_active_enums::RedemptionStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct RedemptionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RedemptionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a pending redemption
    pub async fn create(
        &self,
        user_id: i32,
        prize_id: i32,
    ) -> Result<entity::redemption::Model, DbErr> {
        let redemption = entity::redemption::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            prize_id: ActiveValue::Set(prize_id),
            status: ActiveValue::Set(RedemptionStatus::Pendente),
            redeemed_at: ActiveValue::Set(Utc::now().naive_utc()),
            approved_at: ActiveValue::Set(None),
            delivered_at: ActiveValue::Set(None),
            approved_by: ActiveValue::Set(None),
            notes: ActiveValue::Set(String::new()),
            ..Default::default()
        };

        redemption.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        redemption_id: i32,
    ) -> Result<Option<entity::redemption::Model>, DbErr> {
        entity::prelude::Redemption::find_by_id(redemption_id)
            .one(self.db)
            .await
    }

    /// Newest first, optionally for one user
    pub async fn list(&self, user_id: Option<i32>) -> Result<Vec<entity::redemption::Model>, DbErr> {
        let mut query = entity::prelude::Redemption::find();

        if let Some(user_id) = user_id {
            query = query.filter(entity::redemption::Column::UserId.eq(user_id));
        }

        query
            .order_by_desc(entity::redemption::Column::RedeemedAt)
            .order_by_desc(entity::redemption::Column::Id)
            .all(self.db)
            .await
    }

    /// Sets the status, stamping the approval and delivery fields on the way
    pub async fn update_status(
        &self,
        redemption: entity::redemption::Model,
        status: RedemptionStatus,
        actor_id: i32,
        notes: Option<String>,
    ) -> Result<entity::redemption::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let approved_at = redemption.approved_at;

        let mut redemption: entity::redemption::ActiveModel = redemption.into();
        redemption.status = ActiveValue::Set(status);

        match status {
            RedemptionStatus::Aprovado => {
                redemption.approved_at = ActiveValue::Set(Some(now));
                redemption.approved_by = ActiveValue::Set(Some(actor_id));
            }
            RedemptionStatus::Entregue => {
                if approved_at.is_none() {
                    redemption.approved_at = ActiveValue::Set(Some(now));
                    redemption.approved_by = ActiveValue::Set(Some(actor_id));
                }
                redemption.delivered_at = ActiveValue::Set(Some(now));
            }
            RedemptionStatus::Pendente | RedemptionStatus::Cancelado => {}
        }

        if let Some(notes) = notes {
            redemption.notes = ActiveValue::Set(notes);
        }

        redemption.update(self.db).await
    }
}
