use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{TicketPriority, TicketStatus};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn ticket<'a>(&'a mut self) -> TicketFixtures<'a> {
        TicketFixtures { context: self }
    }
}

pub struct TicketFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> TicketFixtures<'a> {
    /// Inserts an active category with a 24 hour solution time and no webhook URL.
    pub async fn insert_category(
        &self,
        sector_id: i32,
        name: &str,
    ) -> Result<entity::ticket_category::Model, TestError> {
        self.insert_category_with_webhook(sector_id, name, None)
            .await
    }

    pub async fn insert_category_with_webhook(
        &self,
        sector_id: i32,
        name: &str,
        webhook_url: Option<String>,
    ) -> Result<entity::ticket_category::Model, TestError> {
        Ok(
            entity::prelude::TicketCategory::insert(entity::ticket_category::ActiveModel {
                sector_id: ActiveValue::Set(sector_id),
                name: ActiveValue::Set(name.to_string()),
                webhook_url: ActiveValue::Set(webhook_url),
                requires_approval: ActiveValue::Set(false),
                default_solution_time_hours: ActiveValue::Set(24),
                is_active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    /// Inserts an open ticket in the category's sector.
    pub async fn insert_ticket(
        &self,
        created_by: i32,
        category: &entity::ticket_category::Model,
    ) -> Result<entity::ticket::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Ticket::insert(entity::ticket::ActiveModel {
            title: ActiveValue::Set("Printer offline".to_string()),
            description: ActiveValue::Set("The second floor printer stopped".to_string()),
            sector_id: ActiveValue::Set(category.sector_id),
            category_id: ActiveValue::Set(category.id),
            status: ActiveValue::Set(TicketStatus::Aberto),
            priority: ActiveValue::Set(TicketPriority::Media),
            solution: ActiveValue::Set(String::new()),
            solution_time_hours: ActiveValue::Set(category.default_solution_time_hours),
            due_date: ActiveValue::Set(Some(
                now + Duration::hours(category.default_solution_time_hours as i64),
            )),
            created_by: ActiveValue::Set(created_by),
            assigned_to: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            resolved_at: ActiveValue::Set(None),
            closed_at: ActiveValue::Set(None),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }
}
