use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};

pub struct OneSignalPlayerRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OneSignalPlayerRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Registers a player ID for a user, rebinding it when another user registered it before
    pub async fn upsert(
        &self,
        user_id: i32,
        player_id: String,
    ) -> Result<entity::onesignal_player::Model, DbErr> {
        let existing = entity::prelude::OnesignalPlayer::find()
            .filter(entity::onesignal_player::Column::PlayerId.eq(&player_id))
            .one(self.db)
            .await?;

        match existing {
            Some(player) => {
                let mut player: entity::onesignal_player::ActiveModel = player.into();
                player.user_id = ActiveValue::Set(Some(user_id));
                player.is_active = ActiveValue::Set(true);

                player.update(self.db).await
            }
            None => {
                entity::onesignal_player::ActiveModel {
                    user_id: ActiveValue::Set(Some(user_id)),
                    player_id: ActiveValue::Set(player_id),
                    is_active: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }

    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::OnesignalPlayer::find()
            .filter(entity::onesignal_player::Column::IsActive.eq(true))
            .count(self.db)
            .await
    }
}
