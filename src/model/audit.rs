use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::ActionType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemLogDto {
    pub id: i32,
    pub user_id: Option<i32>,
    #[schema(value_type = String)]
    pub action_type: ActionType,
    pub description: String,
    pub ip_address: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<entity::system_log::Model> for SystemLogDto {
    fn from(log: entity::system_log::Model) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            action_type: log.action_type,
            description: log.description,
            ip_address: log.ip_address,
            created_at: log.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SystemLogQuery {
    /// Only return entries of this action type
    #[param(value_type = Option<String>)]
    pub action: Option<ActionType>,
    /// Maximum number of entries, newest first
    pub limit: Option<u64>,
}
