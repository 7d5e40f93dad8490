//! System audit log repository.

use chrono::Utc;
use entity::sea_orm_active_enums::ActionType;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Appends and reads [`entity::system_log`] rows.
///
/// Runs on whatever connection it is given, so recording inside a transaction commits or
/// rolls back together with the audited change.
pub struct AuditRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AuditRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn record(
        &self,
        user_id: Option<i32>,
        action_type: ActionType,
        description: impl Into<String>,
    ) -> Result<entity::system_log::Model, DbErr> {
        self.record_from(user_id, action_type, description, None).await
    }

    /// Records an action along with the client address it came from
    pub async fn record_from(
        &self,
        user_id: Option<i32>,
        action_type: ActionType,
        description: impl Into<String>,
        ip_address: Option<&str>,
    ) -> Result<entity::system_log::Model, DbErr> {
        let log = entity::system_log::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            action_type: ActiveValue::Set(action_type),
            description: ActiveValue::Set(description.into()),
            ip_address: ActiveValue::Set(ip_address.map(str::to_string)),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        log.insert(self.db).await
    }

    /// Newest entries first, optionally filtered by action
    pub async fn list(
        &self,
        action_type: Option<ActionType>,
        limit: u64,
    ) -> Result<Vec<entity::system_log::Model>, DbErr> {
        let mut query = entity::prelude::SystemLog::find();

        if let Some(action_type) = action_type {
            query = query.filter(entity::system_log::Column::ActionType.eq(action_type));
        }

        query
            .order_by_desc(entity::system_log::Column::CreatedAt)
            .order_by_desc(entity::system_log::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use entity::sea_orm_active_enums::ActionType;
    use sea_orm::{ActiveEnum, Iterable};

    use super::AuditRepository;

    /// Expect every action type name to fit the 50 character column
    #[test]
    fn action_types_fit_column() {
        for action in ActionType::iter() {
            assert!(action.to_value().len() <= 50, "{:?} is too long", action);
        }
    }

    /// Expect the newest entry first and the filter to apply
    #[tokio::test]
    async fn lists_newest_first_with_filter() -> Result<(), TestError> {
        let test = TestBuilder::new().with_user_tables().build().await?;
        let repo = AuditRepository::new(&test.db);

        repo.record(Some(1), ActionType::UserLogin, "login").await?;
        repo.record(Some(1), ActionType::TicketCreate, "ticket").await?;
        repo.record(Some(1), ActionType::UserLogout, "logout").await?;

        let all = repo.list(None, 10).await?;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].action_type, ActionType::UserLogout);

        let logins = repo.list(Some(ActionType::UserLogin), 10).await?;
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0].description, "login");
        assert!(logins[0].ip_address.is_none());

        let from = repo
            .record_from(Some(1), ActionType::UserLogin, "again", Some("203.0.113.7"))
            .await?;
        assert_eq!(from.ip_address.as_deref(), Some("203.0.113.7"));

        Ok(())
    }
}
