//! User and sector management.

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::{ActionType, Hierarchy};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::user::{CreateSectorDto, CreateUserDto, SectorDto, UserDto},
    server::{
        data::{
            audit::AuditRepository,
            user::{NewUser, SectorRepository, UserRepository},
        },
        error::{auth::AuthError, user::UserError, Error},
        model::{db::UserModel, permission::UserPermissions},
        service::auth::hash_password,
    },
};

/// Shortest password accepted when creating a user
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<UserDto>, Error> {
        let user = UserRepository::new(self.db).get_by_id(user_id).await?;

        Ok(user.map(UserDto::from))
    }

    /// Lists users visible to `actor`.
    ///
    /// ADMINISTRATIVO and above may list any sector; SUPERVISOR is pinned to their own sector.
    pub async fn list_users(
        &self,
        actor: &UserModel,
        sector_id: Option<i32>,
    ) -> Result<Vec<UserDto>, Error> {
        if !actor.can_manage_users() {
            return Err(AuthError::denied("Listing users requires SUPERVISOR or above").into());
        }

        let sector_id = if actor.is_at_least(Hierarchy::Administrativo) {
            sector_id
        } else {
            actor.sector_id
        };

        let users = UserRepository::new(self.db).list(sector_id).await?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Creates a user with a hashed password.
    ///
    /// Requires SUPERVISOR or above; only SUPERADMIN may create another SUPERADMIN.
    pub async fn create_user(
        &self,
        actor: &UserModel,
        request: CreateUserDto,
    ) -> Result<UserDto, Error> {
        if !actor.can_manage_users() {
            return Err(AuthError::denied("Creating users requires SUPERVISOR or above").into());
        }
        if request.hierarchy == Hierarchy::Superadmin && !actor.is_superadmin() {
            return Err(AuthError::denied("Only SUPERADMIN can create SUPERADMIN users").into());
        }

        let email = request.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::InvalidInput("a valid email is required".to_string()).into());
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserError::InvalidInput(format!(
                "password must have at least {} characters",
                MIN_PASSWORD_LENGTH
            ))
            .into());
        }

        let user_repo = UserRepository::new(self.db);
        if user_repo.get_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken(email).into());
        }

        if let Some(sector_id) = request.sector_id {
            SectorRepository::new(self.db)
                .get_by_id(sector_id)
                .await?
                .ok_or(UserError::SectorNotFound(sector_id))?;
        }

        let password_hash = hash_password(&request.password)?;

        let txn = self.db.begin().await?;

        let user = UserRepository::new(&txn)
            .create(NewUser {
                email,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                password_hash,
                hierarchy: request.hierarchy,
                sector_id: request.sector_id,
            })
            .await?;

        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::UserCreate,
                format!("Created user {} ({:?})", user.email, user.hierarchy),
            )
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, created_by = actor.id, "Created user");

        Ok(user.into())
    }

    pub async fn list_sectors(&self) -> Result<Vec<SectorDto>, Error> {
        let sectors = SectorRepository::new(self.db).list().await?;

        Ok(sectors.into_iter().map(SectorDto::from).collect())
    }

    /// Requires ADMINISTRATIVO or above; names are unique
    pub async fn create_sector(
        &self,
        actor: &UserModel,
        request: CreateSectorDto,
    ) -> Result<SectorDto, Error> {
        if !actor.is_at_least(Hierarchy::Administrativo) {
            return Err(AuthError::denied("Creating sectors requires ADMINISTRATIVO or above").into());
        }

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(UserError::InvalidInput("sector name is required".to_string()).into());
        }

        let sector_repo = SectorRepository::new(self.db);
        if sector_repo.get_by_name(&name).await?.is_some() {
            return Err(UserError::SectorNameTaken(name).into());
        }

        let sector = sector_repo
            .create(name, request.description.trim().to_string())
            .await?;

        AuditRepository::new(self.db)
            .record(
                Some(actor.id),
                ActionType::AdminAction,
                format!("Created sector {}", sector.name),
            )
            .await?;

        Ok(sector.into())
    }
}
