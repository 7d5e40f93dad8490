use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ExecutionPeriod, ExecutionStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checklist_execution")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub assignment_id: i32,
    pub execution_date: Date,
    pub period: ExecutionPeriod,
    pub status: ExecutionStatus,
    pub started_at: Option<DateTime>,
    pub submitted_at: Option<DateTime>,
    pub completed_at: Option<DateTime>,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::checklist_assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::checklist_assignment::Column::Id"
    )]
    ChecklistAssignment,
}

impl Related<super::checklist_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
