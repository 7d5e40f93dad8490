//! Ticket service layer.
//!
//! Ticket writes (the ticket row, its history log, comments and the audit entry) are committed
//! in one transaction. Webhooks and notifications run after the commit and can only log their
//! failures.

pub mod webhook;

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::{
    ActionType, CommentType, Hierarchy, NotificationType, TicketPriority, TicketStatus,
    WebhookEvent,
};
use sea_orm::{ActiveEnum, DatabaseConnection, TransactionTrait};

use crate::{
    model::ticket::{
        CategoryDto, CommentDto, CreateCategoryDto, CreateTicketDto, TicketDetailDto, TicketDto,
        TicketLogDto, UpdateTicketStatusDto,
    },
    server::{
        data::{
            audit::AuditRepository,
            ticket::{
                CategoryRepository, CommentRepository, NewTicket, TicketLogRepository,
                TicketRepository, TicketScope,
            },
            user::{SectorRepository, UserRepository},
        },
        error::{auth::AuthError, ticket::TicketError, user::UserError, Error},
        model::{
            db::{TicketModel, UserModel},
            permission::UserPermissions,
        },
        service::{
            notification::dispatcher::{Audience, NotificationMessage, Notifier},
            ticket::webhook::{event_for_status, WebhookService},
        },
    },
};

/// Solution time used when a category is created without one
pub const DEFAULT_SOLUTION_TIME_HOURS: i32 = 24;

/// Whether `user` may see `ticket`.
///
/// ADMINISTRATIVO and above see everything, SUPERVISOR sees their sector, everyone sees the
/// tickets they created or are assigned to.
pub fn can_view(user: &UserModel, ticket: &TicketModel) -> bool {
    user.can_view_all_tickets()
        || ticket.created_by == user.id
        || ticket.assigned_to == Some(user.id)
        || (user.can_view_sector_tickets() && user.sector_id == Some(ticket.sector_id))
}

/// Reason `user` cannot assume `ticket`, if any
pub fn assume_blocker(user: &UserModel, ticket: &TicketModel) -> Option<&'static str> {
    if ticket.created_by == user.id {
        return Some("you created this ticket");
    }
    if ticket.assigned_to == Some(user.id) {
        return Some("the ticket is already assigned to you");
    }
    if ticket.status == TicketStatus::Fechado {
        return Some("the ticket is closed");
    }
    if !(user.can_view_all_tickets() || user.can_view_sector_tickets()) {
        return Some("requires SUPERVISOR or above");
    }

    None
}

fn full_name(user: &UserModel) -> String {
    format!("{} {}", user.first_name, user.last_name)
}

fn ticket_url(ticket_id: i32) -> String {
    format!("/tickets/{}/", ticket_id)
}

pub struct TicketService<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
    notifier: &'a Notifier,
}

impl<'a> TicketService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http: &'a reqwest::Client,
        notifier: &'a Notifier,
    ) -> Self {
        Self { db, http, notifier }
    }

    pub async fn create_category(
        &self,
        actor: &UserModel,
        request: CreateCategoryDto,
    ) -> Result<CategoryDto, Error> {
        if !actor.is_at_least(Hierarchy::Administrativo) {
            return Err(AuthError::denied("Managing categories requires ADMINISTRATIVO or above").into());
        }

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(TicketError::EmptyField("name").into());
        }

        let hours = request
            .default_solution_time_hours
            .unwrap_or(DEFAULT_SOLUTION_TIME_HOURS);
        if hours <= 0 {
            return Err(Error::Validation("Solution time must be at least one hour".to_string()));
        }

        SectorRepository::new(self.db)
            .get_by_id(request.sector_id)
            .await?
            .ok_or(UserError::SectorNotFound(request.sector_id))?;

        let category = CategoryRepository::new(self.db)
            .create(
                request.sector_id,
                name,
                request.webhook_url.filter(|url| !url.trim().is_empty()),
                request.requires_approval,
                hours,
            )
            .await?;

        Ok(category.into())
    }

    pub async fn list_categories(&self, sector_id: Option<i32>) -> Result<Vec<CategoryDto>, Error> {
        let categories = CategoryRepository::new(self.db)
            .list_active(sector_id)
            .await?;

        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    /// Opens a ticket, then fires the creation webhooks and notifies the sector's staff
    pub async fn create_ticket(
        &self,
        actor: &UserModel,
        request: CreateTicketDto,
    ) -> Result<TicketDto, Error> {
        let title = request.title.trim().to_string();
        let description = request.description.trim().to_string();
        if title.is_empty() {
            return Err(TicketError::EmptyField("title").into());
        }
        if description.is_empty() {
            return Err(TicketError::EmptyField("description").into());
        }

        let category = CategoryRepository::new(self.db)
            .get_by_id(request.category_id)
            .await?
            .ok_or(TicketError::CategoryNotFound(request.category_id))?;
        if category.sector_id != request.sector_id {
            return Err(TicketError::CategorySectorMismatch {
                category_id: category.id,
                sector_id: request.sector_id,
            }
            .into());
        }
        if !category.is_active {
            return Err(TicketError::CategoryInactive(category.id).into());
        }

        let txn = self.db.begin().await?;

        let ticket = TicketRepository::new(&txn)
            .create(NewTicket {
                title,
                description,
                sector_id: request.sector_id,
                category_id: category.id,
                priority: request.priority.unwrap_or(TicketPriority::Media),
                solution_time_hours: category.default_solution_time_hours,
                created_by: actor.id,
            })
            .await?;

        TicketLogRepository::new(&txn)
            .create(
                ticket.id,
                actor.id,
                None,
                TicketStatus::Aberto,
                "Chamado criado".to_string(),
            )
            .await?;

        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::TicketCreate,
                format!("Created ticket #{}: {}", ticket.id, ticket.title),
            )
            .await?;

        txn.commit().await?;

        tracing::info!(ticket_id = ticket.id, user_id = actor.id, "Created ticket");

        let webhook_service = WebhookService::new(self.db, self.http);
        webhook_service.trigger_category_hook(&ticket, &category).await;
        webhook_service
            .trigger(WebhookEvent::TicketCreated, &ticket, Some(actor))
            .await;

        self.notify_ticket_created(actor, &ticket).await;

        Ok(ticket.into())
    }

    /// Supervisors and above of the ticket's sector plus every SUPERADMIN, minus the creator
    async fn notify_ticket_created(&self, actor: &UserModel, ticket: &TicketModel) {
        let user_repo = UserRepository::new(self.db);

        let recipients = async {
            let mut ids = user_repo
                .active_ids_in_sector_with_tiers(
                    ticket.sector_id,
                    vec![
                        Hierarchy::Supervisor,
                        Hierarchy::Administrativo,
                        Hierarchy::Superadmin,
                    ],
                )
                .await?;
            ids.extend(user_repo.active_ids_with_tier(Hierarchy::Superadmin).await?);

            Ok::<_, sea_orm::DbErr>(ids)
        }
        .await;

        let recipients: Vec<i32> = match recipients {
            Ok(ids) => ids.into_iter().filter(|id| *id != actor.id).collect(),
            Err(e) => {
                tracing::error!(ticket_id = ticket.id, "Failed to resolve ticket recipients: {}", e);

                return;
            }
        };

        let message = NotificationMessage::new(
            NotificationType::Ticket,
            format!("Novo Chamado #{}", ticket.id),
            format!("{} abriu: {}", full_name(actor), ticket.title),
        )
        .with_url(ticket_url(ticket.id))
        .created_by(actor.id);

        self.notifier
            .dispatch(self.db, message, Audience::Users(recipients))
            .await;
    }

    /// Creator and assignee, minus whoever acted
    async fn notify_participants(
        &self,
        actor: &UserModel,
        ticket: &TicketModel,
        title: String,
        body: String,
    ) {
        let recipients: Vec<i32> = [Some(ticket.created_by), ticket.assigned_to]
            .into_iter()
            .flatten()
            .filter(|id| *id != actor.id)
            .collect();

        let message = NotificationMessage::new(NotificationType::Ticket, title, body)
            .with_url(ticket_url(ticket.id))
            .created_by(actor.id);

        self.notifier
            .dispatch(self.db, message, Audience::Users(recipients))
            .await;
    }

    pub async fn list_tickets(&self, actor: &UserModel) -> Result<Vec<TicketDto>, Error> {
        let scope = if actor.can_view_all_tickets() {
            TicketScope::All
        } else if actor.can_view_sector_tickets() {
            TicketScope::SectorOrOwn {
                sector_id: actor.sector_id,
                user_id: actor.id,
            }
        } else {
            TicketScope::Own { user_id: actor.id }
        };

        let tickets = TicketRepository::new(self.db).list(scope).await?;

        Ok(tickets.into_iter().map(TicketDto::from).collect())
    }

    async fn get_visible(&self, actor: &UserModel, ticket_id: i32) -> Result<TicketModel, Error> {
        let ticket = TicketRepository::new(self.db)
            .get_by_id(ticket_id)
            .await?
            .ok_or(TicketError::NotFound(ticket_id))?;

        if !can_view(actor, &ticket) {
            return Err(TicketError::NotVisible(ticket_id).into());
        }

        Ok(ticket)
    }

    pub async fn get_ticket(&self, actor: &UserModel, ticket_id: i32) -> Result<TicketDetailDto, Error> {
        let ticket = self.get_visible(actor, ticket_id).await?;

        let comments = CommentRepository::new(self.db)
            .list_for_ticket(ticket.id)
            .await?;
        let logs = TicketLogRepository::new(self.db)
            .list_for_ticket(ticket.id)
            .await?;

        Ok(TicketDetailDto {
            ticket: ticket.into(),
            comments: comments.into_iter().map(CommentDto::from).collect(),
            logs: logs.into_iter().map(TicketLogDto::from).collect(),
        })
    }

    /// Changes the status as creator, assignee or SUPERVISOR and above with visibility
    pub async fn update_status(
        &self,
        actor: &UserModel,
        ticket_id: i32,
        request: UpdateTicketStatusDto,
    ) -> Result<TicketDto, Error> {
        let ticket = self.get_visible(actor, ticket_id).await?;

        let is_participant = ticket.created_by == actor.id || ticket.assigned_to == Some(actor.id);
        if !is_participant && !actor.can_view_sector_tickets() {
            return Err(AuthError::denied("Only participants or SUPERVISOR and above can change the status").into());
        }

        let old_status = ticket.status;
        let new_status = request.status;
        let observation = request.observation.trim().to_string();

        let txn = self.db.begin().await?;

        let ticket = TicketRepository::new(&txn)
            .update_status(ticket, new_status, request.solution)
            .await?;

        TicketLogRepository::new(&txn)
            .create(
                ticket.id,
                actor.id,
                Some(old_status),
                new_status,
                observation.clone(),
            )
            .await?;

        let mut comment = format!(
            "Status alterado de {} para {}",
            old_status.to_value(),
            new_status.to_value()
        );
        if !observation.is_empty() {
            comment = format!("{}: {}", comment, observation);
        }
        CommentRepository::new(&txn)
            .create(ticket.id, actor.id, comment, CommentType::StatusChange, None)
            .await?;

        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::TicketUpdate,
                format!(
                    "Ticket #{} status {} -> {}",
                    ticket.id,
                    old_status.to_value(),
                    new_status.to_value()
                ),
            )
            .await?;

        txn.commit().await?;

        WebhookService::new(self.db, self.http)
            .trigger(event_for_status(new_status), &ticket, Some(actor))
            .await;

        self.notify_participants(
            actor,
            &ticket,
            format!("Chamado #{} atualizado", ticket.id),
            format!("Status alterado para {}", new_status.to_value()),
        )
        .await;

        Ok(ticket.into())
    }

    /// Takes over a ticket, moving an open ticket to in progress
    pub async fn assume_ticket(&self, actor: &UserModel, ticket_id: i32) -> Result<TicketDto, Error> {
        let ticket = TicketRepository::new(self.db)
            .get_by_id(ticket_id)
            .await?
            .ok_or(TicketError::NotFound(ticket_id))?;

        if let Some(reason) = assume_blocker(actor, &ticket) {
            return Err(TicketError::CannotAssume(reason).into());
        }

        let old_status = ticket.status;
        let new_status = match old_status {
            TicketStatus::Aberto => TicketStatus::EmAndamento,
            status => status,
        };

        let previous = match ticket.assigned_to {
            Some(user_id) => UserRepository::new(self.db)
                .get_by_id(user_id)
                .await?
                .map(|user| full_name(&user)),
            None => None,
        };

        let txn = self.db.begin().await?;

        let ticket = TicketRepository::new(&txn)
            .assign(ticket, actor.id, new_status)
            .await?;

        CommentRepository::new(&txn)
            .create(
                ticket.id,
                actor.id,
                format!("Chamado assumido por {}", full_name(actor)),
                CommentType::Assumption,
                Some(actor.id),
            )
            .await?;

        TicketLogRepository::new(&txn)
            .create(
                ticket.id,
                actor.id,
                Some(old_status),
                new_status,
                format!(
                    "Chamado assumido. Responsável anterior: {}",
                    previous.as_deref().unwrap_or("Nenhum")
                ),
            )
            .await?;

        txn.commit().await?;

        self.notifier
            .dispatch(
                self.db,
                NotificationMessage::new(
                    NotificationType::Ticket,
                    format!("Chamado #{} assumido", ticket.id),
                    format!("{} assumiu o seu chamado", full_name(actor)),
                )
                .with_url(ticket_url(ticket.id))
                .created_by(actor.id),
                Audience::Users(vec![ticket.created_by]),
            )
            .await;

        Ok(ticket.into())
    }

    pub async fn add_comment(
        &self,
        actor: &UserModel,
        ticket_id: i32,
        text: String,
    ) -> Result<CommentDto, Error> {
        let ticket = self.get_visible(actor, ticket_id).await?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(TicketError::EmptyField("comment").into());
        }

        let comment = CommentRepository::new(self.db)
            .create(ticket.id, actor.id, text, CommentType::Comment, None)
            .await?;

        self.notify_participants(
            actor,
            &ticket,
            format!("Novo comentário no chamado #{}", ticket.id),
            format!("{} comentou: {}", full_name(actor), comment.comment),
        )
        .await;

        Ok(comment.into())
    }
}
