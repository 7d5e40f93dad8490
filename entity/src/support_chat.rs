use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{SupportPriority, SupportStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "support_chat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub sector_id: i32,
    pub title: String,
    pub status: SupportStatus,
    pub priority: SupportPriority,
    pub assigned_to: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub closed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::support_chat_message::Entity")]
    SupportChatMessage,
}

impl Related<super::support_chat_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupportChatMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
