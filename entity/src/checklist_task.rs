use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checklist_task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub sort_order: i32,
    pub is_required: bool,
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
