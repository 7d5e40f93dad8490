use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261016_000001_sector_user::{AppUser, Sector};

static IDX_SUPPORT_CHAT_STATUS: &str = "idx-support_chat-status";
static IDX_SUPPORT_CHAT_MESSAGE_CHAT_ID: &str = "idx-support_chat_message-chat_id";
static FK_SUPPORT_CHAT_USER_ID: &str = "fk-support_chat-user_id";
static FK_SUPPORT_CHAT_SECTOR_ID: &str = "fk-support_chat-sector_id";
static FK_SUPPORT_CHAT_ASSIGNED_TO: &str = "fk-support_chat-assigned_to";
static FK_SUPPORT_CHAT_MESSAGE_CHAT_ID: &str = "fk-support_chat_message-chat_id";
static FK_SUPPORT_CHAT_MESSAGE_USER_ID: &str = "fk-support_chat_message-user_id";
static FK_SUPPORT_AGENT_USER_ID: &str = "fk-support_agent-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SupportChat::Table)
                    .if_not_exists()
                    .col(pk_auto(SupportChat::Id))
                    .col(integer(SupportChat::UserId))
                    .col(integer(SupportChat::SectorId))
                    .col(string(SupportChat::Title))
                    .col(string_len(SupportChat::Status, 20))
                    .col(string_len(SupportChat::Priority, 20))
                    .col(integer_null(SupportChat::AssignedTo))
                    .col(timestamp(SupportChat::CreatedAt))
                    .col(timestamp(SupportChat::UpdatedAt))
                    .col(timestamp_null(SupportChat::ClosedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUPPORT_CHAT_USER_ID)
                            .from(SupportChat::Table, SupportChat::UserId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUPPORT_CHAT_SECTOR_ID)
                            .from(SupportChat::Table, SupportChat::SectorId)
                            .to(Sector::Table, Sector::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUPPORT_CHAT_ASSIGNED_TO)
                            .from(SupportChat::Table, SupportChat::AssignedTo)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SUPPORT_CHAT_STATUS)
                    .table(SupportChat::Table)
                    .col(SupportChat::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SupportChatMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(SupportChatMessage::Id))
                    .col(integer(SupportChatMessage::ChatId))
                    .col(integer(SupportChatMessage::UserId))
                    .col(text(SupportChatMessage::Message))
                    .col(boolean(SupportChatMessage::IsInternal).default(false))
                    .col(boolean(SupportChatMessage::IsRead).default(false))
                    .col(timestamp(SupportChatMessage::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUPPORT_CHAT_MESSAGE_CHAT_ID)
                            .from(SupportChatMessage::Table, SupportChatMessage::ChatId)
                            .to(SupportChat::Table, SupportChat::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUPPORT_CHAT_MESSAGE_USER_ID)
                            .from(SupportChatMessage::Table, SupportChatMessage::UserId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SUPPORT_CHAT_MESSAGE_CHAT_ID)
                    .table(SupportChatMessage::Table)
                    .col(SupportChatMessage::ChatId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SupportAgent::Table)
                    .if_not_exists()
                    .col(pk_auto(SupportAgent::Id))
                    .col(integer_uniq(SupportAgent::UserId))
                    .col(boolean(SupportAgent::IsActive).default(true))
                    .col(boolean(SupportAgent::CanAssignTickets).default(false))
                    .col(timestamp(SupportAgent::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUPPORT_AGENT_USER_ID)
                            .from(SupportAgent::Table, SupportAgent::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SupportAgent::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SupportChatMessage::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SupportChat::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SupportChat {
    Table,
    Id,
    UserId,
    SectorId,
    Title,
    Status,
    Priority,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
    ClosedAt,
}

#[derive(DeriveIden)]
enum SupportChatMessage {
    Table,
    Id,
    ChatId,
    UserId,
    Message,
    IsInternal,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SupportAgent {
    Table,
    Id,
    UserId,
    IsActive,
    CanAssignTickets,
    CreatedAt,
}
