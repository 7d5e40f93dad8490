//! Read access to the system audit log.

use sea_orm::DatabaseConnection;

use crate::{
    model::audit::{SystemLogDto, SystemLogQuery},
    server::{
        data::audit::AuditRepository,
        error::{auth::AuthError, Error},
        model::{db::UserModel, permission::UserPermissions},
    },
};

const DEFAULT_LIMIT: u64 = 100;
const MAX_LIMIT: u64 = 500;

pub struct AuditService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuditService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest entries first, SUPERADMIN only
    pub async fn list(
        &self,
        actor: &UserModel,
        query: SystemLogQuery,
    ) -> Result<Vec<SystemLogDto>, Error> {
        if !actor.is_superadmin() {
            return Err(AuthError::denied("The audit log is restricted to SUPERADMIN").into());
        }

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let logs = AuditRepository::new(self.db)
            .list(query.action, limit)
            .await?;

        Ok(logs.into_iter().map(SystemLogDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use entity::sea_orm_active_enums::{ActionType, Hierarchy};

    use super::*;

    /// Expect SUPERADMIN to read filtered entries and everyone else to be refused
    #[tokio::test]
    async fn lists_for_superadmin_only() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_user_tables().build().await?;
        let root = test
            .user()
            .insert_user("root@example.com", Hierarchy::Superadmin, None)
            .await?;
        let admin = test
            .user()
            .insert_user("adm@example.com", Hierarchy::Administrativo, None)
            .await?;

        let audit_repo = AuditRepository::new(&test.db);
        audit_repo
            .record(Some(root.id), ActionType::UserLogin, "login")
            .await?;
        audit_repo
            .record(Some(root.id), ActionType::AdminAction, "sector")
            .await?;

        let audit_service = AuditService::new(&test.db);

        let logins = audit_service
            .list(
                &root,
                SystemLogQuery {
                    action: Some(ActionType::UserLogin),
                    limit: None,
                },
            )
            .await;
        assert!(logins.is_ok_and(|logs| logs.len() == 1));

        let denied = audit_service.list(&admin, SystemLogQuery::default()).await;
        assert!(matches!(
            denied,
            Err(Error::AuthError(AuthError::PermissionDenied(_)))
        ));

        Ok(())
    }
}
