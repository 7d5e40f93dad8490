use chrono::Utc;
use entity::sea_orm_active_enums::TransactionType;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Append-only ledger of balance changes, amounts are signed cents.
pub struct CreditTransactionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CreditTransactionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        amount_cents: i64,
        transaction_type: TransactionType,
        description: String,
        redemption_id: Option<i32>,
        created_by: Option<i32>,
    ) -> Result<entity::credit_transaction::Model, DbErr> {
        let transaction = entity::credit_transaction::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            amount_cents: ActiveValue::Set(amount_cents),
            transaction_type: ActiveValue::Set(transaction_type),
            description: ActiveValue::Set(description),
            redemption_id: ActiveValue::Set(redemption_id),
            created_by: ActiveValue::Set(created_by),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        transaction.insert(self.db).await
    }

    /// Newest first
    pub async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<entity::credit_transaction::Model>, DbErr> {
        entity::prelude::CreditTransaction::find()
            .filter(entity::credit_transaction::Column::UserId.eq(user_id))
            .order_by_desc(entity::credit_transaction::Column::CreatedAt)
            .order_by_desc(entity::credit_transaction::Column::Id)
            .all(self.db)
            .await
    }
}
