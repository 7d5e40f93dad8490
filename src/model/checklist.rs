use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::{
    AssignmentPeriod, ExecutionPeriod, ExecutionStatus, ScheduleType,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskDto {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_required")]
    pub is_required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTemplateDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sector_id: i32,
    /// Tasks in display order
    pub tasks: Vec<CreateTaskDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub order: i32,
    pub is_required: bool,
}

impl From<entity::checklist_task::Model> for TaskDto {
    fn from(task: entity::checklist_task::Model) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            order: task.sort_order,
            is_required: task.is_required,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub sector_id: i32,
    pub created_by: i32,
    pub is_active: bool,
    pub tasks: Vec<TaskDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentDto {
    pub template_id: i32,
    pub assigned_to: i32,
    #[schema(value_type = String)]
    pub schedule_type: ScheduleType,
    /// Only used by the `custom` schedule
    #[serde(default)]
    pub custom_dates: Vec<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = String)]
    pub period: AssignmentPeriod,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentDto {
    pub id: i32,
    pub template_id: i32,
    pub assigned_to: i32,
    pub assigned_by: i32,
    #[schema(value_type = String)]
    pub schedule_type: ScheduleType,
    pub custom_dates: Vec<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = String)]
    pub period: AssignmentPeriod,
    pub is_active: bool,
    /// Number of executions created for the assignment's active dates
    pub generated_executions: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskExecutionDto {
    pub id: i32,
    pub task_id: i32,
    pub title: String,
    pub is_required: bool,
    pub is_completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub notes: String,
    pub evidence_image: Option<String>,
    pub evidence_video: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExecutionDto {
    pub id: i32,
    pub assignment_id: i32,
    pub template_id: i32,
    pub template_name: String,
    pub assigned_to: i32,
    pub execution_date: NaiveDate,
    #[schema(value_type = String)]
    pub period: ExecutionPeriod,
    #[schema(value_type = String)]
    pub status: ExecutionStatus,
    pub submitted_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub approved_by: Option<i32>,
    pub approved_at: Option<NaiveDateTime>,
    pub rejection_note: Option<String>,
    pub tasks: Vec<TaskExecutionDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RejectExecutionDto {
    /// Optional explanation shown to the executor
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PendingApprovalsQuery {
    pub sector_id: Option<i32>,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApprovalStatsDto {
    pub pending_total: usize,
    pub pending_today: usize,
    pub approved_today: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingApprovalsDto {
    pub executions: Vec<ExecutionDto>,
    pub stats: ApprovalStatsDto,
}
