use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261016_000001_sector_user::{AppUser, Sector};

static IDX_TICKET_STATUS: &str = "idx-ticket-status";
static IDX_TICKET_SECTOR_ID: &str = "idx-ticket-sector_id";
static IDX_TICKET_COMMENT_TICKET_ID: &str = "idx-ticket_comment-ticket_id";
static IDX_TICKET_LOG_TICKET_ID: &str = "idx-ticket_log-ticket_id";
static FK_TICKET_CATEGORY_SECTOR_ID: &str = "fk-ticket_category-sector_id";
static FK_TICKET_SECTOR_ID: &str = "fk-ticket-sector_id";
static FK_TICKET_CATEGORY_ID: &str = "fk-ticket-category_id";
static FK_TICKET_CREATED_BY: &str = "fk-ticket-created_by";
static FK_TICKET_ASSIGNED_TO: &str = "fk-ticket-assigned_to";
static FK_TICKET_COMMENT_TICKET_ID: &str = "fk-ticket_comment-ticket_id";
static FK_TICKET_COMMENT_USER_ID: &str = "fk-ticket_comment-user_id";
static FK_TICKET_LOG_TICKET_ID: &str = "fk-ticket_log-ticket_id";
static FK_TICKET_LOG_USER_ID: &str = "fk-ticket_log-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketCategory::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketCategory::Id))
                    .col(integer(TicketCategory::SectorId))
                    .col(string(TicketCategory::Name))
                    .col(string_null(TicketCategory::WebhookUrl))
                    .col(boolean(TicketCategory::RequiresApproval).default(false))
                    .col(integer(TicketCategory::DefaultSolutionTimeHours).default(24))
                    .col(boolean(TicketCategory::IsActive).default(true))
                    .col(timestamp(TicketCategory::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_CATEGORY_SECTOR_ID)
                            .from(TicketCategory::Table, TicketCategory::SectorId)
                            .to(Sector::Table, Sector::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(pk_auto(Ticket::Id))
                    .col(string(Ticket::Title))
                    .col(text(Ticket::Description))
                    .col(integer(Ticket::SectorId))
                    .col(integer(Ticket::CategoryId))
                    .col(string_len(Ticket::Status, 25))
                    .col(string_len(Ticket::Priority, 15))
                    .col(text(Ticket::Solution))
                    .col(integer(Ticket::SolutionTimeHours))
                    .col(timestamp_null(Ticket::DueDate))
                    .col(integer(Ticket::CreatedBy))
                    .col(integer_null(Ticket::AssignedTo))
                    .col(timestamp(Ticket::CreatedAt))
                    .col(timestamp(Ticket::UpdatedAt))
                    .col(timestamp_null(Ticket::ResolvedAt))
                    .col(timestamp_null(Ticket::ClosedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_SECTOR_ID)
                            .from(Ticket::Table, Ticket::SectorId)
                            .to(Sector::Table, Sector::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_CATEGORY_ID)
                            .from(Ticket::Table, Ticket::CategoryId)
                            .to(TicketCategory::Table, TicketCategory::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_CREATED_BY)
                            .from(Ticket::Table, Ticket::CreatedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_ASSIGNED_TO)
                            .from(Ticket::Table, Ticket::AssignedTo)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TICKET_STATUS)
                    .table(Ticket::Table)
                    .col(Ticket::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TICKET_SECTOR_ID)
                    .table(Ticket::Table)
                    .col(Ticket::SectorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TicketComment::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketComment::Id))
                    .col(integer(TicketComment::TicketId))
                    .col(integer(TicketComment::UserId))
                    .col(text(TicketComment::Comment))
                    .col(string_len(TicketComment::CommentType, 15))
                    .col(integer_null(TicketComment::AssignedTo))
                    .col(timestamp(TicketComment::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_COMMENT_TICKET_ID)
                            .from(TicketComment::Table, TicketComment::TicketId)
                            .to(Ticket::Table, Ticket::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_COMMENT_USER_ID)
                            .from(TicketComment::Table, TicketComment::UserId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TICKET_COMMENT_TICKET_ID)
                    .table(TicketComment::Table)
                    .col(TicketComment::TicketId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TicketLog::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketLog::Id))
                    .col(integer(TicketLog::TicketId))
                    .col(integer(TicketLog::UserId))
                    .col(string_len_null(TicketLog::OldStatus, 25))
                    .col(string_len(TicketLog::NewStatus, 25))
                    .col(text(TicketLog::Observation))
                    .col(timestamp(TicketLog::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_LOG_TICKET_ID)
                            .from(TicketLog::Table, TicketLog::TicketId)
                            .to(Ticket::Table, Ticket::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TICKET_LOG_USER_ID)
                            .from(TicketLog::Table, TicketLog::UserId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TICKET_LOG_TICKET_ID)
                    .table(TicketLog::Table)
                    .col(TicketLog::TicketId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Webhook::Table)
                    .if_not_exists()
                    .col(pk_auto(Webhook::Id))
                    .col(string(Webhook::Name))
                    .col(string(Webhook::Url))
                    .col(string_len(Webhook::Event, 20))
                    .col(integer_null(Webhook::CategoryId))
                    .col(integer_null(Webhook::SectorId))
                    .col(text(Webhook::Headers))
                    .col(boolean(Webhook::IsActive).default(true))
                    .col(timestamp(Webhook::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Webhook::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TicketLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TicketComment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TicketCategory::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TicketCategory {
    Table,
    Id,
    SectorId,
    Name,
    WebhookUrl,
    RequiresApproval,
    DefaultSolutionTimeHours,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Ticket {
    Table,
    Id,
    Title,
    Description,
    SectorId,
    CategoryId,
    Status,
    Priority,
    Solution,
    SolutionTimeHours,
    DueDate,
    CreatedBy,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
    ClosedAt,
}

#[derive(DeriveIden)]
enum TicketComment {
    Table,
    Id,
    TicketId,
    UserId,
    Comment,
    CommentType,
    AssignedTo,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TicketLog {
    Table,
    Id,
    TicketId,
    UserId,
    OldStatus,
    NewStatus,
    Observation,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Webhook {
    Table,
    Id,
    Name,
    Url,
    Event,
    CategoryId,
    SectorId,
    Headers,
    IsActive,
    CreatedAt,
}
