use sea_orm_migration::{prelude::*, schema::*};

static IDX_APP_USER_SECTOR_ID: &str = "idx-app_user-sector_id";
static IDX_SYSTEM_LOG_CREATED_AT: &str = "idx-system_log-created_at";
static FK_APP_USER_SECTOR_ID: &str = "fk-app_user-sector_id";
static FK_SYSTEM_LOG_USER_ID: &str = "fk-system_log-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sector::Table)
                    .if_not_exists()
                    .col(pk_auto(Sector::Id))
                    .col(string_uniq(Sector::Name))
                    .col(text(Sector::Description))
                    .col(timestamp(Sector::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string_uniq(AppUser::Email))
                    .col(string(AppUser::FirstName))
                    .col(string(AppUser::LastName))
                    .col(string(AppUser::PasswordHash))
                    .col(string_len(AppUser::Hierarchy, 20))
                    .col(integer_null(AppUser::SectorId))
                    .col(big_integer(AppUser::BalanceCents).default(0))
                    .col(boolean(AppUser::IsActive).default(true))
                    .col(timestamp(AppUser::CreatedAt))
                    .col(timestamp(AppUser::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_APP_USER_SECTOR_ID)
                            .from(AppUser::Table, AppUser::SectorId)
                            .to(Sector::Table, Sector::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_APP_USER_SECTOR_ID)
                    .table(AppUser::Table)
                    .col(AppUser::SectorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemLog::Table)
                    .if_not_exists()
                    .col(pk_auto(SystemLog::Id))
                    .col(integer_null(SystemLog::UserId))
                    .col(string_len(SystemLog::ActionType, 50))
                    .col(text(SystemLog::Description))
                    .col(string_null(SystemLog::IpAddress))
                    .col(timestamp(SystemLog::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SYSTEM_LOG_USER_ID)
                            .from(SystemLog::Table, SystemLog::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SYSTEM_LOG_CREATED_AT)
                    .table(SystemLog::Table)
                    .col(SystemLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sector::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Sector {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AppUser {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    Hierarchy,
    SectorId,
    BalanceCents,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SystemLog {
    Table,
    Id,
    UserId,
    ActionType,
    Description,
    IpAddress,
    CreatedAt,
}
