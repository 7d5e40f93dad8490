use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261016_000001_sector_user::AppUser;

static IDX_USER_NOTIFICATION_UNIQUE: &str = "idx-user_notification-notification_user";
static FK_NOTIFICATION_CREATED_BY: &str = "fk-notification-created_by";
static FK_USER_NOTIFICATION_NOTIFICATION_ID: &str = "fk-user_notification-notification_id";
static FK_USER_NOTIFICATION_USER_ID: &str = "fk-user_notification-user_id";
static FK_DEVICE_TOKEN_USER_ID: &str = "fk-device_token-user_id";
static FK_ONESIGNAL_PLAYER_USER_ID: &str = "fk-onesignal_player-user_id";
static FK_TRUEPUSH_SUBSCRIBER_USER_ID: &str = "fk-truepush_subscriber-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(pk_auto(Notification::Id))
                    .col(string(Notification::Title))
                    .col(text(Notification::Message))
                    .col(string_len(Notification::NotificationType, 20))
                    .col(string_len(Notification::Priority, 10))
                    .col(string_null(Notification::ActionUrl))
                    .col(integer_null(Notification::CreatedBy))
                    .col(timestamp(Notification::CreatedAt))
                    .col(timestamp_null(Notification::SentAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_NOTIFICATION_CREATED_BY)
                            .from(Notification::Table, Notification::CreatedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserNotification::Table)
                    .if_not_exists()
                    .col(pk_auto(UserNotification::Id))
                    .col(integer(UserNotification::NotificationId))
                    .col(integer(UserNotification::UserId))
                    .col(boolean(UserNotification::IsRead).default(false))
                    .col(timestamp_null(UserNotification::ReadAt))
                    .col(timestamp(UserNotification::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_NOTIFICATION_NOTIFICATION_ID)
                            .from(UserNotification::Table, UserNotification::NotificationId)
                            .to(Notification::Table, Notification::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_NOTIFICATION_USER_ID)
                            .from(UserNotification::Table, UserNotification::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USER_NOTIFICATION_UNIQUE)
                    .table(UserNotification::Table)
                    .col(UserNotification::NotificationId)
                    .col(UserNotification::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeviceToken::Table)
                    .if_not_exists()
                    .col(pk_auto(DeviceToken::Id))
                    .col(integer_null(DeviceToken::UserId))
                    .col(text_uniq(DeviceToken::Endpoint))
                    .col(string(DeviceToken::P256dh))
                    .col(string(DeviceToken::Auth))
                    .col(string_len(DeviceToken::DeviceType, 10))
                    .col(boolean(DeviceToken::IsActive).default(true))
                    .col(timestamp(DeviceToken::CreatedAt))
                    .col(timestamp(DeviceToken::LastUsed))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_DEVICE_TOKEN_USER_ID)
                            .from(DeviceToken::Table, DeviceToken::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OnesignalPlayer::Table)
                    .if_not_exists()
                    .col(pk_auto(OnesignalPlayer::Id))
                    .col(integer_null(OnesignalPlayer::UserId))
                    .col(string_uniq(OnesignalPlayer::PlayerId))
                    .col(boolean(OnesignalPlayer::IsActive).default(true))
                    .col(timestamp(OnesignalPlayer::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ONESIGNAL_PLAYER_USER_ID)
                            .from(OnesignalPlayer::Table, OnesignalPlayer::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TruepushSubscriber::Table)
                    .if_not_exists()
                    .col(pk_auto(TruepushSubscriber::Id))
                    .col(integer_null(TruepushSubscriber::UserId))
                    .col(string_uniq(TruepushSubscriber::SubscriberId))
                    .col(boolean(TruepushSubscriber::IsActive).default(true))
                    .col(timestamp(TruepushSubscriber::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TRUEPUSH_SUBSCRIBER_USER_ID)
                            .from(TruepushSubscriber::Table, TruepushSubscriber::UserId)
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
            .drop_table(Table::drop().table(TruepushSubscriber::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OnesignalPlayer::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DeviceToken::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserNotification::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    Id,
    Title,
    Message,
    NotificationType,
    Priority,
    ActionUrl,
    CreatedBy,
    CreatedAt,
    SentAt,
}

#[derive(DeriveIden)]
enum UserNotification {
    Table,
    Id,
    NotificationId,
    UserId,
    IsRead,
    ReadAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeviceToken {
    Table,
    Id,
    UserId,
    Endpoint,
    P256dh,
    Auth,
    DeviceType,
    IsActive,
    CreatedAt,
    LastUsed,
}

#[derive(DeriveIden)]
enum OnesignalPlayer {
    Table,
    Id,
    UserId,
    PlayerId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TruepushSubscriber {
    Table,
    Id,
    UserId,
    SubscriberId,
    IsActive,
    CreatedAt,
}
