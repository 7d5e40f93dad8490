use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checklist_task_execution")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub execution_id: i32,
    pub task_id: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime>,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub evidence_image: Option<String>,
    pub evidence_video: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::checklist_execution::Entity",
        from = "Column::ExecutionId",
        to = "super::checklist_execution::Column::Id"
    )]
    ChecklistExecution,
    #[sea_orm(
        belongs_to = "super::checklist_task::Entity",
        from = "Column::TaskId",
        to = "super::checklist_task::Column::Id"
    )]
    ChecklistTask,
}

impl Related<super::checklist_execution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistExecution.def()
    }
}

impl Related<super::checklist_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistTask.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
