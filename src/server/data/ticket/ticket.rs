use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{TicketPriority, TicketStatus};
use sea_orm::{
    sea_query::Condition, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub sector_id: i32,
    pub category_id: i32,
    pub priority: TicketPriority,
    pub solution_time_hours: i32,
    pub created_by: i32,
}

/// Which tickets a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    All,
    /// Tickets of the sector plus those the user created or is assigned to.
    SectorOrOwn { sector_id: Option<i32>, user_id: i32 },
    /// Tickets the user created or is assigned to.
    Own { user_id: i32 },
}

pub struct TicketRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TicketRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts an open ticket due `solution_time_hours` from now
    pub async fn create(&self, new_ticket: NewTicket) -> Result<entity::ticket::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let due_date = now + Duration::hours(new_ticket.solution_time_hours as i64);

        let ticket = entity::ticket::ActiveModel {
            title: ActiveValue::Set(new_ticket.title),
            description: ActiveValue::Set(new_ticket.description),
            sector_id: ActiveValue::Set(new_ticket.sector_id),
            category_id: ActiveValue::Set(new_ticket.category_id),
            status: ActiveValue::Set(TicketStatus::Aberto),
            priority: ActiveValue::Set(new_ticket.priority),
            solution: ActiveValue::Set(String::new()),
            solution_time_hours: ActiveValue::Set(new_ticket.solution_time_hours),
            due_date: ActiveValue::Set(Some(due_date)),
            created_by: ActiveValue::Set(new_ticket.created_by),
            assigned_to: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            resolved_at: ActiveValue::Set(None),
            closed_at: ActiveValue::Set(None),
            ..Default::default()
        };

        ticket.insert(self.db).await
    }

    pub async fn get_by_id(&self, ticket_id: i32) -> Result<Option<entity::ticket::Model>, DbErr> {
        entity::prelude::Ticket::find_by_id(ticket_id)
            .one(self.db)
            .await
    }

    /// Newest first
    pub async fn list(&self, scope: TicketScope) -> Result<Vec<entity::ticket::Model>, DbErr> {
        use entity::ticket::Column;

        let own = |user_id: i32| {
            Condition::any()
                .add(Column::CreatedBy.eq(user_id))
                .add(Column::AssignedTo.eq(user_id))
        };

        let condition = match scope {
            TicketScope::All => Condition::all(),
            TicketScope::SectorOrOwn { sector_id, user_id } => {
                let mut condition = own(user_id);
                if let Some(sector_id) = sector_id {
                    condition = condition.add(Column::SectorId.eq(sector_id));
                }
                condition
            }
            TicketScope::Own { user_id } => own(user_id),
        };

        entity::prelude::Ticket::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(self.db)
            .await
    }

    /// Sets the status, stamping `resolved_at`/`closed_at` on the first transition into them
    pub async fn update_status(
        &self,
        ticket: entity::ticket::Model,
        status: TicketStatus,
        solution: Option<String>,
    ) -> Result<entity::ticket::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let resolved_at = ticket.resolved_at;
        let closed_at = ticket.closed_at;

        let mut ticket: entity::ticket::ActiveModel = ticket.into();
        ticket.status = ActiveValue::Set(status);
        ticket.updated_at = ActiveValue::Set(now);

        match status {
            TicketStatus::Resolvido if resolved_at.is_none() => {
                ticket.resolved_at = ActiveValue::Set(Some(now));
            }
            TicketStatus::Fechado if closed_at.is_none() => {
                ticket.closed_at = ActiveValue::Set(Some(now));
            }
            TicketStatus::Reaberto => {
                ticket.resolved_at = ActiveValue::Set(None);
                ticket.closed_at = ActiveValue::Set(None);
            }
            _ => {}
        }

        if let Some(solution) = solution {
            ticket.solution = ActiveValue::Set(solution);
        }

        ticket.update(self.db).await
    }

    pub async fn assign(
        &self,
        ticket: entity::ticket::Model,
        assignee_id: i32,
        status: TicketStatus,
    ) -> Result<entity::ticket::Model, DbErr> {
        let mut ticket: entity::ticket::ActiveModel = ticket.into();
        ticket.assigned_to = ActiveValue::Set(Some(assignee_id));
        ticket.status = ActiveValue::Set(status);
        ticket.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        ticket.update(self.db).await
    }
}
