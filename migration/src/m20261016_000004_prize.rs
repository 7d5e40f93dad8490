use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261016_000001_sector_user::AppUser;

static IDX_CREDIT_TRANSACTION_USER_ID: &str = "idx-credit_transaction-user_id";
static FK_REDEMPTION_USER_ID: &str = "fk-redemption-user_id";
static FK_REDEMPTION_PRIZE_ID: &str = "fk-redemption-prize_id";
static FK_REDEMPTION_APPROVED_BY: &str = "fk-redemption-approved_by";
static FK_CREDIT_TRANSACTION_USER_ID: &str = "fk-credit_transaction-user_id";
static FK_CREDIT_TRANSACTION_REDEMPTION_ID: &str = "fk-credit_transaction-redemption_id";
static FK_CREDIT_TRANSACTION_CREATED_BY: &str = "fk-credit_transaction-created_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prize::Table)
                    .if_not_exists()
                    .col(pk_auto(Prize::Id))
                    .col(string(Prize::Name))
                    .col(text(Prize::Description))
                    .col(big_integer(Prize::ValueCents))
                    .col(integer(Prize::Stock).default(0))
                    .col(boolean(Prize::UnlimitedStock).default(false))
                    .col(boolean(Prize::IsActive).default(true))
                    .col(timestamp(Prize::CreatedAt))
                    .col(timestamp(Prize::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Redemption::Table)
                    .if_not_exists()
                    .col(pk_auto(Redemption::Id))
                    .col(integer(Redemption::UserId))
                    .col(integer(Redemption::PrizeId))
                    .col(string_len(Redemption::Status, 10))
                    .col(timestamp(Redemption::RedeemedAt))
                    .col(timestamp_null(Redemption::ApprovedAt))
                    .col(timestamp_null(Redemption::DeliveredAt))
                    .col(integer_null(Redemption::ApprovedBy))
                    .col(text(Redemption::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REDEMPTION_USER_ID)
                            .from(Redemption::Table, Redemption::UserId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REDEMPTION_PRIZE_ID)
                            .from(Redemption::Table, Redemption::PrizeId)
                            .to(Prize::Table, Prize::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REDEMPTION_APPROVED_BY)
                            .from(Redemption::Table, Redemption::ApprovedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditTransaction::Table)
                    .if_not_exists()
                    .col(pk_auto(CreditTransaction::Id))
                    .col(integer(CreditTransaction::UserId))
                    .col(big_integer(CreditTransaction::AmountCents))
                    .col(string_len(CreditTransaction::TransactionType, 15))
                    .col(string(CreditTransaction::Description))
                    .col(integer_null(CreditTransaction::RedemptionId))
                    .col(integer_null(CreditTransaction::CreatedBy))
                    .col(timestamp(CreditTransaction::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CREDIT_TRANSACTION_USER_ID)
                            .from(CreditTransaction::Table, CreditTransaction::UserId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CREDIT_TRANSACTION_REDEMPTION_ID)
                            .from(CreditTransaction::Table, CreditTransaction::RedemptionId)
                            .to(Redemption::Table, Redemption::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CREDIT_TRANSACTION_CREATED_BY)
                            .from(CreditTransaction::Table, CreditTransaction::CreatedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CREDIT_TRANSACTION_USER_ID)
                    .table(CreditTransaction::Table)
                    .col(CreditTransaction::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditTransaction::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Redemption::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Prize::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Prize {
    Table,
    Id,
    Name,
    Description,
    ValueCents,
    Stock,
    UnlimitedStock,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Redemption {
    Table,
    Id,
    UserId,
    PrizeId,
    Status,
    RedeemedAt,
    ApprovedAt,
    DeliveredAt,
    ApprovedBy,
    Notes,
}

#[derive(DeriveIden)]
enum CreditTransaction {
    Table,
    Id,
    UserId,
    AmountCents,
    TransactionType,
    Description,
    RedemptionId,
    CreatedBy,
    CreatedAt,
}
