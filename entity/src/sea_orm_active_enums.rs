use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role tier, declared from least to most privileged so `Ord` follows the hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Hierarchy {
    #[sea_orm(string_value = "PADRAO")]
    Padrao,
    #[sea_orm(string_value = "SUPERVISOR")]
    Supervisor,
    #[sea_orm(string_value = "ADMINISTRATIVO")]
    Administrativo,
    #[sea_orm(string_value = "SUPERADMIN")]
    Superadmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[sea_orm(string_value = "ABERTO")]
    Aberto,
    #[sea_orm(string_value = "EM_ANDAMENTO")]
    EmAndamento,
    #[sea_orm(string_value = "RESOLVIDO")]
    Resolvido,
    #[sea_orm(string_value = "AGUARDANDO_APROVACAO")]
    AguardandoAprovacao,
    #[sea_orm(string_value = "FECHADO")]
    Fechado,
    #[sea_orm(string_value = "REABERTO")]
    Reaberto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    #[sea_orm(string_value = "BAIXA")]
    Baixa,
    #[sea_orm(string_value = "MEDIA")]
    Media,
    #[sea_orm(string_value = "ALTA")]
    Alta,
    #[sea_orm(string_value = "CRITICA")]
    Critica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentType {
    #[sea_orm(string_value = "COMMENT")]
    Comment,
    #[sea_orm(string_value = "FOLLOW_UP")]
    FollowUp,
    #[sea_orm(string_value = "ASSIGNMENT")]
    Assignment,
    #[sea_orm(string_value = "STATUS_CHANGE")]
    StatusChange,
    #[sea_orm(string_value = "ASSUMPTION")]
    Assumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookEvent {
    #[sea_orm(string_value = "TICKET_CREATED")]
    TicketCreated,
    #[sea_orm(string_value = "TICKET_UPDATED")]
    TicketUpdated,
    #[sea_orm(string_value = "TICKET_RESOLVED")]
    TicketResolved,
    #[sea_orm(string_value = "TICKET_CLOSED")]
    TicketClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    #[sea_orm(string_value = "this_week")]
    ThisWeek,
    #[sea_orm(string_value = "weekdays_month")]
    WeekdaysMonth,
    #[sea_orm(string_value = "weekends_month")]
    WeekendsMonth,
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "custom")]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPeriod {
    #[sea_orm(string_value = "morning")]
    Morning,
    #[sea_orm(string_value = "afternoon")]
    Afternoon,
    #[sea_orm(string_value = "both")]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPeriod {
    #[sea_orm(string_value = "morning")]
    Morning,
    #[sea_orm(string_value = "afternoon")]
    Afternoon,
}

/// Lifecycle of a checklist execution.
///
/// A rejected execution is written back as `Pending` together with its rejection note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "awaiting_approval")]
    AwaitingApproval,
    #[sea_orm(string_value = "approved")]
    Approved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedemptionStatus {
    #[sea_orm(string_value = "PENDENTE")]
    Pendente,
    #[sea_orm(string_value = "APROVADO")]
    Aprovado,
    #[sea_orm(string_value = "ENTREGUE")]
    Entregue,
    #[sea_orm(string_value = "CANCELADO")]
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    #[sea_orm(string_value = "REDEMPTION")]
    Redemption,
    #[sea_orm(string_value = "REFUND")]
    Refund,
    #[sea_orm(string_value = "ADJUSTMENT")]
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    #[sea_orm(string_value = "SYSTEM")]
    System,
    #[sea_orm(string_value = "TICKET")]
    Ticket,
    #[sea_orm(string_value = "COMMUNICATION")]
    Communication,
    #[sea_orm(string_value = "TASK")]
    Task,
    #[sea_orm(string_value = "CUSTOM")]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "NORMAL")]
    Normal,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    #[sea_orm(string_value = "WEB")]
    Web,
    #[sea_orm(string_value = "ANDROID")]
    Android,
    #[sea_orm(string_value = "IOS")]
    Ios,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportStatus {
    #[sea_orm(string_value = "ABERTO")]
    Aberto,
    #[sea_orm(string_value = "EM_ANDAMENTO")]
    EmAndamento,
    #[sea_orm(string_value = "RESOLVIDO")]
    Resolvido,
    #[sea_orm(string_value = "FECHADO")]
    Fechado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportPriority {
    #[sea_orm(string_value = "BAIXA")]
    Baixa,
    #[sea_orm(string_value = "MEDIA")]
    Media,
    #[sea_orm(string_value = "ALTA")]
    Alta,
    #[sea_orm(string_value = "URGENTE")]
    Urgente,
}

/// Audit trail action, stored in a column capped at 50 characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    #[sea_orm(string_value = "USER_LOGIN")]
    UserLogin,
    #[sea_orm(string_value = "USER_LOGOUT")]
    UserLogout,
    #[sea_orm(string_value = "USER_CREATE")]
    UserCreate,
    #[sea_orm(string_value = "TICKET_CREATE")]
    TicketCreate,
    #[sea_orm(string_value = "TICKET_UPDATE")]
    TicketUpdate,
    #[sea_orm(string_value = "CS_CHANGE")]
    CsChange,
    #[sea_orm(string_value = "PRIZE_REDEEM")]
    PrizeRedeem,
    #[sea_orm(string_value = "REDEMPTION_STATUS_UPDATE")]
    RedemptionStatusUpdate,
    #[sea_orm(string_value = "CHECKLIST_APPROVE")]
    ChecklistApprove,
    #[sea_orm(string_value = "CHECKLIST_REJECT")]
    ChecklistReject,
    #[sea_orm(string_value = "COMMUNICATION_SEND")]
    CommunicationSend,
    #[sea_orm(string_value = "ADMIN_ACTION")]
    AdminAction,
}
