//! Database model type aliases.
//!
//! Short names for the SeaORM models of the `entity` crate that cross module boundaries.

/// Account with a hierarchy tier, an optional sector and a credit balance in cents.
pub type UserModel = entity::app_user::Model;

pub type SectorModel = entity::sector::Model;

pub type TicketModel = entity::ticket::Model;

pub type CategoryModel = entity::ticket_category::Model;

pub type TemplateModel = entity::checklist_template::Model;

pub type TaskModel = entity::checklist_task::Model;

pub type AssignmentModel = entity::checklist_assignment::Model;

/// One scheduled run of an assignment for a date and period.
pub type ExecutionModel = entity::checklist_execution::Model;

pub type TaskExecutionModel = entity::checklist_task_execution::Model;

pub type PrizeModel = entity::prize::Model;

pub type RedemptionModel = entity::redemption::Model;

pub type ChatModel = entity::support_chat::Model;
