use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::{CommentType, TicketPriority, TicketStatus, WebhookEvent};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: i32,
    pub sector_id: i32,
    pub name: String,
    pub webhook_url: Option<String>,
    pub requires_approval: bool,
    pub default_solution_time_hours: i32,
    pub is_active: bool,
}

impl From<entity::ticket_category::Model> for CategoryDto {
    fn from(category: entity::ticket_category::Model) -> Self {
        Self {
            id: category.id,
            sector_id: category.sector_id,
            name: category.name,
            webhook_url: category.webhook_url,
            requires_approval: category.requires_approval,
            default_solution_time_hours: category.default_solution_time_hours,
            is_active: category.is_active,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryDto {
    pub sector_id: i32,
    pub name: String,
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub requires_approval: bool,
    /// Defaults to 24 hours when omitted
    pub default_solution_time_hours: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub sector_id: i32,
    pub category_id: i32,
    #[schema(value_type = String)]
    pub status: TicketStatus,
    #[schema(value_type = String)]
    pub priority: TicketPriority,
    pub solution: String,
    pub solution_time_hours: i32,
    pub due_date: Option<NaiveDateTime>,
    pub created_by: i32,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
    pub closed_at: Option<NaiveDateTime>,
    pub is_overdue: bool,
}

impl From<entity::ticket::Model> for TicketDto {
    fn from(ticket: entity::ticket::Model) -> Self {
        let is_overdue = match (ticket.due_date, ticket.status) {
            (_, TicketStatus::Fechado | TicketStatus::Resolvido) | (None, _) => false,
            (Some(due_date), _) => Utc::now().naive_utc() > due_date,
        };

        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            sector_id: ticket.sector_id,
            category_id: ticket.category_id,
            status: ticket.status,
            priority: ticket.priority,
            solution: ticket.solution,
            solution_time_hours: ticket.solution_time_hours,
            due_date: ticket.due_date,
            created_by: ticket.created_by,
            assigned_to: ticket.assigned_to,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            resolved_at: ticket.resolved_at,
            closed_at: ticket.closed_at,
            is_overdue,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTicketDto {
    pub title: String,
    pub description: String,
    pub sector_id: i32,
    pub category_id: i32,
    #[schema(value_type = Option<String>)]
    pub priority: Option<TicketPriority>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateTicketStatusDto {
    #[schema(value_type = String)]
    pub status: TicketStatus,
    #[serde(default)]
    pub observation: String,
    /// Replaces the ticket solution text when present
    pub solution: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: i32,
    pub ticket_id: i32,
    pub user_id: i32,
    pub comment: String,
    #[schema(value_type = String)]
    pub comment_type: CommentType,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl From<entity::ticket_comment::Model> for CommentDto {
    fn from(comment: entity::ticket_comment::Model) -> Self {
        Self {
            id: comment.id,
            ticket_id: comment.ticket_id,
            user_id: comment.user_id,
            comment: comment.comment,
            comment_type: comment.comment_type,
            assigned_to: comment.assigned_to,
            created_at: comment.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentDto {
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketLogDto {
    pub id: i32,
    pub user_id: i32,
    #[schema(value_type = Option<String>)]
    pub old_status: Option<TicketStatus>,
    #[schema(value_type = String)]
    pub new_status: TicketStatus,
    pub observation: String,
    pub created_at: NaiveDateTime,
}

impl From<entity::ticket_log::Model> for TicketLogDto {
    fn from(log: entity::ticket_log::Model) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            old_status: log.old_status,
            new_status: log.new_status,
            observation: log.observation,
            created_at: log.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketDetailDto {
    pub ticket: TicketDto,
    pub comments: Vec<CommentDto>,
    pub logs: Vec<TicketLogDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookDto {
    pub id: i32,
    pub name: String,
    pub url: String,
    #[schema(value_type = String)]
    pub event: WebhookEvent,
    pub category_id: Option<i32>,
    pub sector_id: Option<i32>,
    pub headers: HashMap<String, String>,
    pub is_active: bool,
}

impl From<entity::webhook::Model> for WebhookDto {
    fn from(webhook: entity::webhook::Model) -> Self {
        Self {
            headers: serde_json::from_str(&webhook.headers).unwrap_or_default(),
            id: webhook.id,
            name: webhook.name,
            url: webhook.url,
            event: webhook.event,
            category_id: webhook.category_id,
            sector_id: webhook.sector_id,
            is_active: webhook.is_active,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateWebhookDto {
    pub name: String,
    pub url: String,
    #[schema(value_type = String)]
    pub event: WebhookEvent,
    pub category_id: Option<i32>,
    pub sector_id: Option<i32>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    pub sector_id: Option<i32>,
}
