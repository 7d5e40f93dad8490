use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::DEFAULT_MAX_UPLOAD_BYTES,
    service::notification::{dispatcher::Notifier, onesignal::OneSignalClient},
    util::media::MediaStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Shared client for outbound webhook calls
    pub http: reqwest::Client,
    pub notifier: Notifier,
    pub media: MediaStore,
    /// Set when OneSignal credentials are configured, used by the stats and player endpoints
    pub onesignal: Option<OneSignalClient>,
    /// Application server key handed to browsers subscribing to Web Push
    pub vapid_public_key: Option<String>,
    /// Accepted `Host` header values, empty accepts any host
    pub allowed_hosts: Arc<Vec<String>>,
    /// Body limit of the checklist submission route
    pub max_upload_bytes: usize,
}

impl AppState {
    /// State with only in-app notifications and no host restriction
    pub fn new(db: DatabaseConnection, media: MediaStore) -> Self {
        Self {
            db,
            http: reqwest::Client::new(),
            notifier: Notifier::new(),
            media,
            onesignal: None,
            vapid_public_key: None,
            allowed_hosts: Arc::new(Vec::new()),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
