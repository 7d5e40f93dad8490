use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_USER_KEY: &str = "chamados:session:user";

/// The logged in user as kept in the session store
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i32,
    pub logged_in_at: DateTime<Utc>,
}

/// Accessors for the user ID stored at login.
///
/// A value that no longer deserializes (an older format, for instance) reads as a session
/// error, and handlers treat that like any other session failure.
pub struct SessionUserId;

impl SessionUserId {
    /// Stores `user_id` as logged in now, replacing any previous login
    pub async fn insert(session: &Session, user_id: i32) -> Result<(), Error> {
        let user = SessionUser {
            user_id,
            logged_in_at: Utc::now(),
        };
        session.insert(SESSION_USER_KEY, user).await?;

        Ok(())
    }

    pub async fn get(session: &Session) -> Result<Option<i32>, Error> {
        Ok(Self::get_record(session).await?.map(|user| user.user_id))
    }

    pub async fn get_record(session: &Session) -> Result<Option<SessionUser>, Error> {
        Ok(session.get::<SessionUser>(SESSION_USER_KEY).await?)
    }
}
