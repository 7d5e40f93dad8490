use chrono::Utc;
use entity::sea_orm_active_enums::Hierarchy;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Fields required to insert a user; the password is already hashed.
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub hierarchy: Hierarchy,
    pub sector_id: Option<i32>,
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new active user with a zero balance
    pub async fn create(&self, new_user: NewUser) -> Result<entity::app_user::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let user = entity::app_user::ActiveModel {
            email: ActiveValue::Set(new_user.email),
            first_name: ActiveValue::Set(new_user.first_name),
            last_name: ActiveValue::Set(new_user.last_name),
            password_hash: ActiveValue::Set(new_user.password_hash),
            hierarchy: ActiveValue::Set(new_user.hierarchy),
            sector_id: ActiveValue::Set(new_user.sector_id),
            balance_cents: ActiveValue::Set(0),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn get_by_id(&self, user_id: i32) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(entity::app_user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    /// Lists users ordered by name, optionally restricted to one sector
    pub async fn list(&self, sector_id: Option<i32>) -> Result<Vec<entity::app_user::Model>, DbErr> {
        let mut query = entity::prelude::AppUser::find();

        if let Some(sector_id) = sector_id {
            query = query.filter(entity::app_user::Column::SectorId.eq(sector_id));
        }

        query
            .order_by_asc(entity::app_user::Column::FirstName)
            .order_by_asc(entity::app_user::Column::LastName)
            .all(self.db)
            .await
    }

    /// Returns the subset of `user_ids` belonging to active users
    pub async fn filter_active_ids(&self, user_ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::AppUser::find()
            .select_only()
            .column(entity::app_user::Column::Id)
            .filter(entity::app_user::Column::Id.is_in(user_ids.to_vec()))
            .filter(entity::app_user::Column::IsActive.eq(true))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn all_active_ids(&self) -> Result<Vec<i32>, DbErr> {
        entity::prelude::AppUser::find()
            .select_only()
            .column(entity::app_user::Column::Id)
            .filter(entity::app_user::Column::IsActive.eq(true))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Active users of `sector_id` whose hierarchy is one of `tiers`
    pub async fn active_ids_in_sector_with_tiers(
        &self,
        sector_id: i32,
        tiers: Vec<Hierarchy>,
    ) -> Result<Vec<i32>, DbErr> {
        entity::prelude::AppUser::find()
            .select_only()
            .column(entity::app_user::Column::Id)
            .filter(entity::app_user::Column::SectorId.eq(sector_id))
            .filter(entity::app_user::Column::Hierarchy.is_in(tiers))
            .filter(entity::app_user::Column::IsActive.eq(true))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn active_ids_with_tier(&self, tier: Hierarchy) -> Result<Vec<i32>, DbErr> {
        entity::prelude::AppUser::find()
            .select_only()
            .column(entity::app_user::Column::Id)
            .filter(entity::app_user::Column::Hierarchy.eq(tier))
            .filter(entity::app_user::Column::IsActive.eq(true))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Overwrites the stored balance, callers keep it in step with the ledger
    pub async fn set_balance(
        &self,
        user: entity::app_user::Model,
        balance_cents: i64,
    ) -> Result<entity::app_user::Model, DbErr> {
        let mut user: entity::app_user::ActiveModel = user.into();
        user.balance_cents = ActiveValue::Set(balance_cents);
        user.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        user.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use entity::sea_orm_active_enums::Hierarchy;

    use super::{NewUser, UserRepository};

    fn new_user(email: &str, hierarchy: Hierarchy, sector_id: Option<i32>) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            password_hash: "hash".to_string(),
            hierarchy,
            sector_id,
        }
    }

    /// Expect a created user to start active with a zero balance
    #[tokio::test]
    async fn creates_active_user() -> Result<(), TestError> {
        let test = TestBuilder::new().with_user_tables().build().await?;
        let repo = UserRepository::new(&test.db);

        let user = repo
            .create(new_user("ana@example.com", Hierarchy::Padrao, None))
            .await?;

        assert!(user.is_active);
        assert_eq!(user.balance_cents, 0);
        assert!(repo.get_by_email("ana@example.com").await?.is_some());

        Ok(())
    }

    /// Expect inactive and unknown IDs to be dropped
    #[tokio::test]
    async fn filters_active_ids() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_user_tables().build().await?;
        let active = test
            .user()
            .insert_user("a@example.com", Hierarchy::Padrao, None)
            .await?;
        let inactive = test.user().insert_inactive_user("b@example.com", None).await?;

        let repo = UserRepository::new(&test.db);
        let ids = repo
            .filter_active_ids(&[active.id, inactive.id, 999])
            .await?;

        assert_eq!(ids, vec![active.id]);

        Ok(())
    }

    /// Expect only users of the sector with a matching tier to be returned
    #[tokio::test]
    async fn finds_sector_supervisors() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_user_tables().build().await?;
        let ti = test.user().insert_sector("TI").await?;
        let rh = test.user().insert_sector("RH").await?;
        let supervisor = test
            .user()
            .insert_user("sup@example.com", Hierarchy::Supervisor, Some(ti.id))
            .await?;
        test.user()
            .insert_user("padrao@example.com", Hierarchy::Padrao, Some(ti.id))
            .await?;
        test.user()
            .insert_user("other@example.com", Hierarchy::Supervisor, Some(rh.id))
            .await?;

        let repo = UserRepository::new(&test.db);
        let ids = repo
            .active_ids_in_sector_with_tiers(ti.id, vec![Hierarchy::Supervisor])
            .await?;

        assert_eq!(ids, vec![supervisor.id]);

        Ok(())
    }
}
