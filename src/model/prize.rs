use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{RedemptionStatus, TransactionType};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PrizeDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub value_cents: i64,
    pub stock: i32,
    pub unlimited_stock: bool,
    pub is_active: bool,
    pub is_available: bool,
}

impl From<entity::prize::Model> for PrizeDto {
    fn from(prize: entity::prize::Model) -> Self {
        let is_available = prize.is_available();
        Self {
            id: prize.id,
            name: prize.name,
            description: prize.description,
            value_cents: prize.value_cents,
            stock: prize.stock,
            unlimited_stock: prize.unlimited_stock,
            is_active: prize.is_active,
            is_available,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePrizeDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub value_cents: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub unlimited_stock: bool,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PrizeQuery {
    /// Only list active prizes, defaults to true
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RedemptionDto {
    pub id: i32,
    pub user_id: i32,
    pub prize_id: i32,
    #[schema(value_type = String)]
    pub status: RedemptionStatus,
    pub redeemed_at: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub approved_by: Option<i32>,
    pub notes: String,
}

impl From<entity::redemption::Model> for RedemptionDto {
    fn from(redemption: entity::redemption::Model) -> Self {
        Self {
            id: redemption.id,
            user_id: redemption.user_id,
            prize_id: redemption.prize_id,
            status: redemption.status,
            redeemed_at: redemption.redeemed_at,
            approved_at: redemption.approved_at,
            delivered_at: redemption.delivered_at,
            approved_by: redemption.approved_by,
            notes: redemption.notes,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRedemptionStatusDto {
    #[schema(value_type = String)]
    pub status: RedemptionStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AdjustCreditsDto {
    pub user_id: i32,
    /// Signed amount in cents; negative values debit the user
    pub amount_cents: i64,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditTransactionDto {
    pub id: i32,
    pub user_id: i32,
    pub amount_cents: i64,
    #[schema(value_type = String)]
    pub transaction_type: TransactionType,
    pub description: String,
    pub redemption_id: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl From<entity::credit_transaction::Model> for CreditTransactionDto {
    fn from(transaction: entity::credit_transaction::Model) -> Self {
        Self {
            id: transaction.id,
            user_id: transaction.user_id,
            amount_cents: transaction.amount_cents,
            transaction_type: transaction.transaction_type,
            description: transaction.description,
            redemption_id: transaction.redemption_id,
            created_by: transaction.created_by,
            created_at: transaction.created_at,
        }
    }
}
