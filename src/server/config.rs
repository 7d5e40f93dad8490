//! Environment based configuration.

use crate::server::error::config::ConfigError;

pub static DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub static DEFAULT_MEDIA_ROOT: &str = "media";
pub static DEFAULT_ONESIGNAL_API_URL: &str = "https://onesignal.com/api/v1";
/// Every day at 03:00 (seconds, minutes, hours, day of month, month, day of week).
pub static DEFAULT_CHECKLIST_GENERATION_CRON: &str = "0 0 3 * * *";
/// Request body cap for evidence uploads, large enough for phone videos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// VAPID credentials for the Web Push channel.
#[derive(Clone, Debug)]
pub struct VapidConfig {
    pub private_key_pem: String,
    pub public_key: String,
    /// `mailto:` or `https:` contact sent as the `sub` claim.
    pub subject: String,
}

/// OneSignal REST credentials.
#[derive(Clone, Debug)]
pub struct OneSignalConfig {
    pub app_id: String,
    pub rest_api_key: String,
    pub api_url: String,
}

pub struct Config {
    pub database_url: String,
    pub valkey_url: String,
    pub secret_key: String,
    pub allowed_hosts: Vec<String>,
    pub bind_address: String,
    pub media_root: String,
    pub base_url: String,
    pub checklist_generation_cron: String,
    /// Largest accepted checklist submission body in bytes.
    pub max_upload_bytes: usize,
    /// `None` when any VAPID variable is missing, which disables Web Push.
    pub vapid: Option<VapidConfig>,
    /// `None` when the app ID or REST key is missing, which disables OneSignal.
    pub onesignal: Option<OneSignalConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = required("SECRET_KEY")?;
        if secret_key.len() < 64 {
            return Err(ConfigError::InvalidEnvValue {
                var: "SECRET_KEY".to_string(),
                reason: "must be at least 64 bytes long".to_string(),
            });
        }

        let vapid = match (
            optional("VAPID_PRIVATE_KEY_PEM"),
            optional("VAPID_PUBLIC_KEY"),
            optional("VAPID_SUBJECT"),
        ) {
            (Some(private_key_pem), Some(public_key), Some(subject)) => Some(VapidConfig {
                private_key_pem,
                public_key,
                subject,
            }),
            _ => None,
        };

        let onesignal = match (optional("ONESIGNAL_APP_ID"), optional("ONESIGNAL_REST_API_KEY")) {
            (Some(app_id), Some(rest_api_key)) => Some(OneSignalConfig {
                app_id,
                rest_api_key,
                api_url: optional("ONESIGNAL_API_URL")
                    .unwrap_or_else(|| DEFAULT_ONESIGNAL_API_URL.to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            valkey_url: required("VALKEY_URL")?,
            secret_key,
            allowed_hosts: parse_list(&optional("ALLOWED_HOSTS").unwrap_or_default()),
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            media_root: optional("MEDIA_ROOT").unwrap_or_else(|| DEFAULT_MEDIA_ROOT.to_string()),
            base_url: required("BASE_URL")?.trim_end_matches('/').to_string(),
            checklist_generation_cron: optional("CHECKLIST_GENERATION_CRON")
                .unwrap_or_else(|| DEFAULT_CHECKLIST_GENERATION_CRON.to_string()),
            max_upload_bytes: parse_max_upload_bytes(optional("MAX_UPLOAD_BYTES"))?,
            vapid,
            onesignal,
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

/// Reads a variable, treating empty values as unset.
fn optional(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_max_upload_bytes(value: Option<String>) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(DEFAULT_MAX_UPLOAD_BYTES);
    };

    match value.parse::<usize>() {
        Ok(bytes) if bytes > 0 => Ok(bytes),
        _ => Err(ConfigError::InvalidEnvValue {
            var: "MAX_UPLOAD_BYTES".to_string(),
            reason: "must be a positive number of bytes".to_string(),
        }),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}
