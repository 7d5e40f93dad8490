use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use entity::sea_orm_active_enums::Hierarchy;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{constant::TEST_PASSWORD, error::TestError, TestContext};

impl TestContext {
    pub fn user<'a>(&'a mut self) -> UserFixtures<'a> {
        UserFixtures { context: self }
    }
}

pub struct UserFixtures<'a> {
    context: &'a mut TestContext,
}

/// Hashes [`TEST_PASSWORD`] into a PHC string.
pub fn hash_test_password() -> Result<String, TestError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(TEST_PASSWORD.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TestError::PasswordHash(e.to_string()))
}

impl<'a> UserFixtures<'a> {
    pub async fn insert_sector(&self, name: &str) -> Result<entity::sector::Model, TestError> {
        Ok(entity::prelude::Sector::insert(entity::sector::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            description: ActiveValue::Set(format!("{} sector", name)),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    /// Inserts an active user with zero balance whose password is [`TEST_PASSWORD`].
    pub async fn insert_user(
        &self,
        email: &str,
        hierarchy: Hierarchy,
        sector_id: Option<i32>,
    ) -> Result<entity::app_user::Model, TestError> {
        self.insert_user_with_balance(email, hierarchy, sector_id, 0)
            .await
    }

    pub async fn insert_user_with_balance(
        &self,
        email: &str,
        hierarchy: Hierarchy,
        sector_id: Option<i32>,
        balance_cents: i64,
    ) -> Result<entity::app_user::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::AppUser::insert(entity::app_user::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            first_name: ActiveValue::Set("Test".to_string()),
            last_name: ActiveValue::Set("User".to_string()),
            password_hash: ActiveValue::Set(hash_test_password()?),
            hierarchy: ActiveValue::Set(hierarchy),
            sector_id: ActiveValue::Set(sector_id),
            balance_cents: ActiveValue::Set(balance_cents),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_inactive_user(
        &self,
        email: &str,
        sector_id: Option<i32>,
    ) -> Result<entity::app_user::Model, TestError> {
        let user = self
            .insert_user(email, Hierarchy::Padrao, sector_id)
            .await?;

        let mut active: entity::app_user::ActiveModel = user.into();
        active.is_active = ActiveValue::Set(false);

        Ok(entity::prelude::AppUser::update(active)
            .exec(&self.context.db)
            .await?)
    }
}
