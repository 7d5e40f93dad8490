//! Construction of the long lived pieces the server runs with.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tower_sessions::{
    cookie::SameSite,
    Expiry, SessionManagerLayer,
};
use tower_sessions_redis_store::{fred::prelude::Pool, RedisStore};

use crate::server::{
    config::Config,
    error::{config::ConfigError, Error},
    model::app::AppState,
    service::notification::{
        dispatcher::Notifier,
        onesignal::{OneSignalChannel, OneSignalClient},
        webpush::WebPushChannel,
    },
    util::media::MediaStore,
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Connect to Valkey/Redis and configure signed session cookies
pub async fn connect_to_session(
    config: &Config,
) -> Result<SessionManagerLayer<RedisStore<Pool>, tower_sessions::service::SignedCookie>, Error> {
    use time::Duration;
    use tower_sessions_redis_store::fred::prelude::*;

    let redis_config = tower_sessions_redis_store::fred::prelude::Config::from_url(&config.valkey_url)?;
    let pool = Pool::new(redis_config, None, None, None, 6)?;

    pool.connect();
    pool.wait_for_connect().await?;

    let key = tower_sessions::cookie::Key::try_from(config.secret_key.as_bytes()).map_err(|e| {
        ConfigError::InvalidEnvValue {
            var: "SECRET_KEY".to_string(),
            reason: e.to_string(),
        }
    })?;

    // Plain HTTP in debug builds
    let secure_cookies = !cfg!(debug_assertions);

    let session = SessionManagerLayer::new(RedisStore::new(pool))
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
        .with_signed(key);

    Ok(session)
}

/// Builds the notifier from whichever push channels are configured.
///
/// Returns the OneSignal client as well for the stats and player endpoints.
pub fn build_notifier(config: &Config, http: &reqwest::Client) -> (Notifier, Option<OneSignalClient>) {
    let mut notifier = Notifier::new();

    match &config.vapid {
        Some(vapid) => notifier = notifier.with_channel(WebPushChannel::new(vapid, &config.base_url)),
        None => tracing::warn!("VAPID keys not configured, Web Push is disabled"),
    }

    let onesignal = config
        .onesignal
        .as_ref()
        .map(|onesignal| OneSignalClient::new(http.clone(), onesignal, &config.base_url));
    match &onesignal {
        Some(client) => notifier = notifier.with_channel(OneSignalChannel::new(client.clone())),
        None => tracing::warn!("OneSignal credentials not configured, OneSignal push is disabled"),
    }

    tracing::info!(channels = ?notifier.channel_names(), "Notification channels enabled");

    (notifier, onesignal)
}

pub fn build_state(config: &Config, db: DatabaseConnection) -> AppState {
    let http = reqwest::Client::new();
    let (notifier, onesignal) = build_notifier(config, &http);

    AppState {
        db,
        http,
        notifier,
        media: MediaStore::new(&config.media_root),
        onesignal,
        vapid_public_key: config.vapid.as_ref().map(|vapid| vapid.public_key.clone()),
        allowed_hosts: Arc::new(config.allowed_hosts.clone()),
        max_upload_bytes: config.max_upload_bytes,
    }
}
