//! Prize catalogue, redemptions and the C$ credit ledger.
//!
//! Every balance change writes the new balance and its ledger row in the same transaction.

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::{
    ActionType, Hierarchy, NotificationType, RedemptionStatus, TransactionType,
};
use sea_orm::{ActiveEnum, ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::prize::{
        AdjustCreditsDto, CreatePrizeDto, CreditTransactionDto, PrizeDto, RedemptionDto,
        UpdateRedemptionStatusDto,
    },
    server::{
        data::{
            audit::AuditRepository,
            prize::{CreditTransactionRepository, PrizeRepository, RedemptionRepository},
            user::UserRepository,
        },
        error::{auth::AuthError, prize::PrizeError, user::UserError, Error},
        model::{
            db::{PrizeModel, RedemptionModel, UserModel},
            permission::UserPermissions,
        },
        service::notification::dispatcher::{Audience, NotificationMessage, Notifier},
    },
};

/// Formats cents as `C$ 12,50`
pub fn format_credits(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    format!("{}C$ {},{:02}", sign, cents / 100, cents % 100)
}

/// Status changes a manager may make; cancelling is allowed until delivery
pub fn can_change_redemption(from: RedemptionStatus, to: RedemptionStatus) -> bool {
    use RedemptionStatus::*;

    matches!(
        (from, to),
        (Pendente, Aprovado)
            | (Pendente, Entregue)
            | (Aprovado, Entregue)
            | (Pendente, Cancelado)
            | (Aprovado, Cancelado)
    )
}

/// Gives the prize value back to the redeemer and returns the item to stock
async fn refund<C: ConnectionTrait>(
    db: &C,
    redemption: &RedemptionModel,
    prize: PrizeModel,
    actor_id: i32,
) -> Result<(), Error> {
    let user_repo = UserRepository::new(db);

    let user = user_repo
        .get_by_id(redemption.user_id)
        .await?
        .ok_or(UserError::UserNotFound(redemption.user_id))?;
    let balance = user
        .balance_cents
        .checked_add(prize.value_cents)
        .ok_or_else(|| PrizeError::InvalidAmount("refund would overflow the balance".to_string()))?;
    user_repo.set_balance(user, balance).await?;

    CreditTransactionRepository::new(db)
        .create(
            redemption.user_id,
            prize.value_cents,
            TransactionType::Refund,
            format!("Estorno do resgate #{}: {}", redemption.id, prize.name),
            Some(redemption.id),
            Some(actor_id),
        )
        .await?;

    PrizeRepository::new(db).adjust_stock(prize, 1).await?;

    Ok(())
}

pub struct PrizeService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a Notifier,
}

impl<'a> PrizeService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a Notifier) -> Self {
        Self { db, notifier }
    }

    pub async fn create_prize(
        &self,
        actor: &UserModel,
        request: CreatePrizeDto,
    ) -> Result<PrizeDto, Error> {
        if !actor.can_manage_prizes() {
            return Err(AuthError::denied("Managing prizes requires SUPERVISOR or above").into());
        }

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation("Prize name must not be empty".to_string()));
        }
        if request.value_cents <= 0 {
            return Err(PrizeError::InvalidAmount("prize value must be positive".to_string()).into());
        }
        if request.stock < 0 {
            return Err(PrizeError::InvalidAmount("stock must not be negative".to_string()).into());
        }

        let prize = PrizeRepository::new(self.db)
            .create(
                name,
                request.description.trim().to_string(),
                request.value_cents,
                request.stock,
                request.unlimited_stock,
            )
            .await?;

        Ok(prize.into())
    }

    pub async fn list_prizes(&self, active: Option<bool>) -> Result<Vec<PrizeDto>, Error> {
        let prizes = PrizeRepository::new(self.db)
            .list(Some(active.unwrap_or(true)))
            .await?;

        Ok(prizes.into_iter().map(PrizeDto::from).collect())
    }

    /// Exchanges credits for a prize, leaving a pending redemption for a manager to handle
    pub async fn redeem(&self, actor: &UserModel, prize_id: i32) -> Result<RedemptionDto, Error> {
        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);
        let prize_repo = PrizeRepository::new(&txn);

        let prize = prize_repo
            .get_by_id(prize_id)
            .await?
            .ok_or(PrizeError::PrizeNotFound(prize_id))?;
        if !prize.is_available() {
            return Err(PrizeError::Unavailable(prize_id).into());
        }

        // Balance is re-read inside the transaction, the session copy may be stale
        let user = user_repo
            .get_by_id(actor.id)
            .await?
            .ok_or(UserError::UserNotFound(actor.id))?;
        if user.balance_cents < prize.value_cents {
            return Err(PrizeError::InsufficientBalance {
                balance: user.balance_cents,
                required: prize.value_cents,
            }
            .into());
        }

        let redemption = RedemptionRepository::new(&txn).create(user.id, prize.id).await?;

        let balance = user.balance_cents - prize.value_cents;
        user_repo.set_balance(user, balance).await?;

        CreditTransactionRepository::new(&txn)
            .create(
                actor.id,
                -prize.value_cents,
                TransactionType::Redemption,
                format!("Resgate #{}: {}", redemption.id, prize.name),
                Some(redemption.id),
                Some(actor.id),
            )
            .await?;

        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::PrizeRedeem,
                format!(
                    "Redeemed prize #{} ({}) for {}",
                    prize.id,
                    prize.name,
                    format_credits(prize.value_cents)
                ),
            )
            .await?;

        prize_repo.adjust_stock(prize, -1).await?;

        txn.commit().await?;

        tracing::info!(redemption_id = redemption.id, user_id = actor.id, prize_id, "Prize redeemed");

        Ok(redemption.into())
    }

    /// Managers see every redemption, everyone else only their own
    pub async fn list_redemptions(&self, actor: &UserModel) -> Result<Vec<RedemptionDto>, Error> {
        let user_filter = (!actor.can_manage_prizes()).then_some(actor.id);

        let redemptions = RedemptionRepository::new(self.db).list(user_filter).await?;

        Ok(redemptions.into_iter().map(RedemptionDto::from).collect())
    }

    pub async fn update_redemption_status(
        &self,
        actor: &UserModel,
        redemption_id: i32,
        request: UpdateRedemptionStatusDto,
    ) -> Result<RedemptionDto, Error> {
        if !actor.can_manage_prizes() {
            return Err(AuthError::denied("Managing redemptions requires SUPERVISOR or above").into());
        }

        let notes = Some(request.notes.trim().to_string()).filter(|notes| !notes.is_empty());
        let redemption = self
            .change_status(actor, redemption_id, request.status, notes)
            .await?;

        self.notifier
            .dispatch(
                self.db,
                NotificationMessage::new(
                    NotificationType::System,
                    "Resgate atualizado",
                    format!(
                        "Seu resgate #{} agora está {}",
                        redemption.id,
                        redemption.status.to_value()
                    ),
                )
                .with_url("/prizes/")
                .created_by(actor.id),
                Audience::Users(vec![redemption.user_id]),
            )
            .await;

        Ok(redemption.into())
    }

    /// Cancels a redemption that has not been delivered yet, as its owner or a manager
    pub async fn cancel_redemption(
        &self,
        actor: &UserModel,
        redemption_id: i32,
    ) -> Result<RedemptionDto, Error> {
        let redemption = RedemptionRepository::new(self.db)
            .get_by_id(redemption_id)
            .await?
            .ok_or(PrizeError::RedemptionNotFound(redemption_id))?;

        if redemption.user_id != actor.id && !actor.can_manage_prizes() {
            return Err(PrizeError::NotOwner.into());
        }

        let redemption = self
            .change_status(actor, redemption_id, RedemptionStatus::Cancelado, None)
            .await?;

        Ok(redemption.into())
    }

    async fn change_status(
        &self,
        actor: &UserModel,
        redemption_id: i32,
        status: RedemptionStatus,
        notes: Option<String>,
    ) -> Result<RedemptionModel, Error> {
        let txn = self.db.begin().await?;
        let redemption_repo = RedemptionRepository::new(&txn);

        let redemption = redemption_repo
            .get_by_id(redemption_id)
            .await?
            .ok_or(PrizeError::RedemptionNotFound(redemption_id))?;
        if !can_change_redemption(redemption.status, status) {
            return Err(PrizeError::InvalidStatusChange {
                from: redemption.status,
                to: status,
            }
            .into());
        }

        if status == RedemptionStatus::Cancelado {
            let prize = PrizeRepository::new(&txn)
                .get_by_id(redemption.prize_id)
                .await?
                .ok_or(PrizeError::PrizeNotFound(redemption.prize_id))?;

            refund(&txn, &redemption, prize, actor.id).await?;
        }

        let previous = redemption.status;
        let redemption = redemption_repo
            .update_status(redemption, status, actor.id, notes)
            .await?;

        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::RedemptionStatusUpdate,
                format!(
                    "Redemption #{} {:?} -> {:?}",
                    redemption.id, previous, redemption.status
                ),
            )
            .await?;

        txn.commit().await?;

        Ok(redemption)
    }

    /// Credits or debits a user by hand.
    ///
    /// SUPERVISOR can only adjust users of their own sector. The resulting balance can never be
    /// negative.
    pub async fn adjust_credits(
        &self,
        actor: &UserModel,
        request: AdjustCreditsDto,
    ) -> Result<CreditTransactionDto, Error> {
        if !actor.can_manage_credits() {
            return Err(AuthError::denied("Adjusting credits requires SUPERVISOR or above").into());
        }
        if request.amount_cents == 0 {
            return Err(PrizeError::InvalidAmount("amount must not be zero".to_string()).into());
        }
        let description = request.description.trim().to_string();
        if description.is_empty() {
            return Err(Error::Validation("A description is required".to_string()));
        }

        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);

        let user = user_repo
            .get_by_id(request.user_id)
            .await?
            .ok_or(UserError::UserNotFound(request.user_id))?;
        if !actor.is_at_least(Hierarchy::Administrativo) && user.sector_id != actor.sector_id {
            return Err(AuthError::denied("Supervisors can only adjust credits of their own sector").into());
        }

        let balance = user
            .balance_cents
            .checked_add(request.amount_cents)
            .ok_or_else(|| PrizeError::InvalidAmount("resulting balance is out of range".to_string()))?;
        if balance < 0 {
            return Err(PrizeError::NegativeBalance { user_id: user.id }.into());
        }
        let previous = user.balance_cents;
        let user = user_repo.set_balance(user, balance).await?;

        let transaction_type = if request.amount_cents > 0 {
            TransactionType::Credit
        } else {
            TransactionType::Debit
        };
        let transaction = CreditTransactionRepository::new(&txn)
            .create(
                user.id,
                request.amount_cents,
                transaction_type,
                description.clone(),
                None,
                Some(actor.id),
            )
            .await?;

        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::CsChange,
                format!(
                    "Balance of {} changed from {} to {}: {}",
                    user.email,
                    format_credits(previous),
                    format_credits(balance),
                    description
                ),
            )
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, actor_id = actor.id, amount_cents = request.amount_cents, "Adjusted credits");

        Ok(transaction.into())
    }

    pub async fn list_transactions(&self, actor: &UserModel) -> Result<Vec<CreditTransactionDto>, Error> {
        let transactions = CreditTransactionRepository::new(self.db)
            .list_for_user(actor.id)
            .await?;

        Ok(transactions.into_iter().map(CreditTransactionDto::from).collect())
    }
}
