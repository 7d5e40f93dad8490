//! Authentication service layer.
//!
//! Password login against Argon2id hashes stored in PHC string format. Session handling stays
//! in the controller; this layer only verifies credentials and writes the audit trail.

#[cfg(test)]
mod tests;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use entity::sea_orm_active_enums::ActionType;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{audit::AuditRepository, user::UserRepository},
    error::{auth::AuthError, Error},
    model::db::UserModel,
};

/// Hashes a plain text password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Returns false for a wrong password and for a malformed stored hash
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");

        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Checks credentials for an active user and records the login with the client address.
    ///
    /// Unknown emails, inactive accounts and wrong passwords all return
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_ip: Option<&str>,
    ) -> Result<UserModel, Error> {
        let user_repo = UserRepository::new(self.db);

        let user = user_repo
            .get_by_email(email.trim())
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            tracing::info!(user_id = user.id, "Rejected login with wrong password");

            return Err(AuthError::InvalidCredentials.into());
        }

        AuditRepository::new(self.db)
            .record_from(
                Some(user.id),
                ActionType::UserLogin,
                format!("{} logged in", user.email),
                client_ip,
            )
            .await?;

        Ok(user)
    }

    pub async fn logout(&self, user_id: i32, client_ip: Option<&str>) -> Result<(), Error> {
        AuditRepository::new(self.db)
            .record_from(Some(user_id), ActionType::UserLogout, "Logged out", client_ip)
            .await?;

        Ok(())
    }
}
