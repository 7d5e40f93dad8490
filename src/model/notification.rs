use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{DeviceType, NotificationPriority, NotificationType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Browser push subscription keys as produced by `PushSubscription.toJSON()`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionKeysDto {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeDto {
    pub endpoint: String,
    pub keys: SubscriptionKeysDto,
    #[schema(value_type = Option<String>)]
    pub device_type: Option<DeviceType>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceTokenDto {
    pub id: i32,
    pub endpoint: String,
    #[schema(value_type = String)]
    pub device_type: DeviceType,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub last_used: NaiveDateTime,
}

impl From<entity::device_token::Model> for DeviceTokenDto {
    fn from(token: entity::device_token::Model) -> Self {
        Self {
            id: token.id,
            endpoint: token.endpoint,
            device_type: token.device_type,
            is_active: token.is_active,
            created_at: token.created_at,
            last_used: token.last_used,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationDto {
    pub id: i32,
    pub title: String,
    pub message: String,
    #[schema(value_type = String)]
    pub notification_type: NotificationType,
    #[schema(value_type = String)]
    pub priority: NotificationPriority,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendNotificationDto {
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    #[schema(value_type = Option<String>)]
    pub priority: Option<NotificationPriority>,
    /// Recipient user IDs, every active user when omitted
    pub user_ids: Option<Vec<i32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChannelFailureDto {
    pub channel: String,
    pub error: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DispatchReportDto {
    pub notification_id: Option<i32>,
    pub recipients: usize,
    pub delivered: usize,
    pub failed: Vec<ChannelFailureDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VapidPublicKeyDto {
    pub public_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterPlayerDto {
    /// Legacy Truepush clients post the same body with `subscriber_id`
    #[serde(alias = "subscriber_id")]
    pub player_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OneSignalStatsDto {
    pub players: u64,
    pub messageable_players: u64,
    pub registered_players: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SegmentDto {
    pub id: String,
    pub name: String,
    pub description: String,
}
