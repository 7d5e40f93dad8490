use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{SupportPriority, SupportStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateChatDto {
    pub title: String,
    pub sector_id: i32,
    #[schema(value_type = Option<String>)]
    pub priority: Option<SupportPriority>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatDto {
    pub id: i32,
    pub user_id: i32,
    pub sector_id: i32,
    pub title: String,
    #[schema(value_type = String)]
    pub status: SupportStatus,
    #[schema(value_type = String)]
    pub priority: SupportPriority,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

impl From<entity::support_chat::Model> for ChatDto {
    fn from(chat: entity::support_chat::Model) -> Self {
        Self {
            id: chat.id,
            user_id: chat.user_id,
            sector_id: chat.sector_id,
            title: chat.title,
            status: chat.status,
            priority: chat.priority,
            assigned_to: chat.assigned_to,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
            closed_at: chat.closed_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageDto {
    pub id: i32,
    pub chat_id: i32,
    pub user_id: i32,
    pub message: String,
    pub is_internal: bool,
    pub created_at: NaiveDateTime,
}

impl From<entity::support_chat_message::Model> for ChatMessageDto {
    fn from(message: entity::support_chat_message::Model) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            user_id: message.user_id,
            message: message.message,
            is_internal: message.is_internal,
            created_at: message.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatDetailDto {
    pub chat: ChatDto,
    pub messages: Vec<ChatMessageDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendChatMessageDto {
    pub message: String,
    #[serde(default)]
    pub is_internal: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateChatStatusDto {
    #[schema(value_type = String)]
    pub status: SupportStatus,
}

/// Kanban view of the support queue
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SupportDashboardDto {
    pub open: Vec<ChatDto>,
    pub in_progress: Vec<ChatDto>,
    pub resolved: Vec<ChatDto>,
    pub closed: Vec<ChatDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterAgentDto {
    pub user_id: i32,
    #[serde(default)]
    pub can_assign_tickets: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentDto {
    pub id: i32,
    pub user_id: i32,
    pub is_active: bool,
    pub can_assign_tickets: bool,
}

impl From<entity::support_agent::Model> for AgentDto {
    fn from(agent: entity::support_agent::Model) -> Self {
        Self {
            id: agent.id,
            user_id: agent.user_id,
            is_active: agent.is_active,
            can_assign_tickets: agent.can_assign_tickets,
        }
    }
}
