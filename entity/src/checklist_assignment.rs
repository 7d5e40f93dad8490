use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AssignmentPeriod, ScheduleType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checklist_assignment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: i32,
    pub assigned_to: i32,
    pub assigned_by: i32,
    pub schedule_type: ScheduleType,
    /// JSON array of `YYYY-MM-DD` dates, only meaningful for custom schedules.
    #[sea_orm(column_type = "Text")]
    pub custom_dates: String,
    pub start_date: Date,
    pub end_date: Date,
    pub period: AssignmentPeriod,
    pub is_active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::checklist_template::Entity",
        from = "Column::TemplateId",
        to = "super::checklist_template::Column::Id"
    )]
    ChecklistTemplate,
}

impl Related<super::checklist_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
