//! Support chat between users and support agents, with the agents' kanban dashboard.

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::{
    ActionType, Hierarchy, NotificationType, SupportPriority, SupportStatus,
};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::support::{
        AgentDto, ChatDetailDto, ChatDto, ChatMessageDto, CreateChatDto, RegisterAgentDto,
        SendChatMessageDto, SupportDashboardDto,
    },
    server::{
        data::{
            audit::AuditRepository,
            support::{SupportAgentRepository, SupportChatRepository, SupportMessageRepository},
            user::{SectorRepository, UserRepository},
        },
        error::{auth::AuthError, support::SupportError, user::UserError, Error},
        model::{
            db::{ChatModel, UserModel},
            permission::UserPermissions,
        },
        service::notification::dispatcher::{Audience, NotificationMessage, Notifier},
    },
};

fn chat_url(chat_id: i32) -> String {
    format!("/support/chats/{}/", chat_id)
}

pub struct SupportService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a Notifier,
}

impl<'a> SupportService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a Notifier) -> Self {
        Self { db, notifier }
    }

    /// SUPERADMIN or a registered, active support agent
    pub async fn is_agent(&self, user: &UserModel) -> Result<bool, Error> {
        if user.is_superadmin() {
            return Ok(true);
        }

        Ok(SupportAgentRepository::new(self.db)
            .is_active_agent(user.id)
            .await?)
    }

    async fn get_chat_model(&self, chat_id: i32) -> Result<ChatModel, Error> {
        Ok(SupportChatRepository::new(self.db)
            .get_by_id(chat_id)
            .await?
            .ok_or(SupportError::ChatNotFound(chat_id))?)
    }

    /// Opens a chat with its first message
    pub async fn create_chat(
        &self,
        actor: &UserModel,
        request: CreateChatDto,
    ) -> Result<ChatDetailDto, Error> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::Validation("Chat title must not be empty".to_string()));
        }
        let message = request.message.trim().to_string();
        if message.is_empty() {
            return Err(SupportError::EmptyMessage.into());
        }

        SectorRepository::new(self.db)
            .get_by_id(request.sector_id)
            .await?
            .ok_or(UserError::SectorNotFound(request.sector_id))?;

        let txn = self.db.begin().await?;

        let chat = SupportChatRepository::new(&txn)
            .create(
                actor.id,
                request.sector_id,
                title,
                request.priority.unwrap_or(SupportPriority::Media),
            )
            .await?;
        let message = SupportMessageRepository::new(&txn)
            .create(chat.id, actor.id, message, false)
            .await?;

        txn.commit().await?;

        tracing::info!(chat_id = chat.id, user_id = actor.id, "Opened support chat");

        Ok(ChatDetailDto {
            chat: chat.into(),
            messages: vec![message.into()],
        })
    }

    pub async fn my_chats(&self, actor: &UserModel) -> Result<Vec<ChatDto>, Error> {
        let chats = SupportChatRepository::new(self.db)
            .list_for_user(actor.id)
            .await?;

        Ok(chats.into_iter().map(ChatDto::from).collect())
    }

    /// Chats grouped by status for agents and SUPERVISOR and above.
    ///
    /// Everyone but SUPERADMIN only sees chats of their own sector.
    pub async fn dashboard(&self, actor: &UserModel) -> Result<SupportDashboardDto, Error> {
        if !actor.is_at_least(Hierarchy::Supervisor) && !self.is_agent(actor).await? {
            return Err(SupportError::NotAgent.into());
        }

        let sector_filter = if actor.is_superadmin() {
            None
        } else {
            match actor.sector_id {
                Some(sector_id) => Some(sector_id),
                None => return Ok(SupportDashboardDto::default()),
            }
        };

        let chats = SupportChatRepository::new(self.db)
            .list(sector_filter)
            .await?;

        let mut dashboard = SupportDashboardDto::default();
        for chat in chats {
            let column = match chat.status {
                SupportStatus::Aberto => &mut dashboard.open,
                SupportStatus::EmAndamento => &mut dashboard.in_progress,
                SupportStatus::Resolvido => &mut dashboard.resolved,
                SupportStatus::Fechado => &mut dashboard.closed,
            };
            column.push(chat.into());
        }

        Ok(dashboard)
    }

    /// Chat with its messages, internal notes are only shown to agents
    pub async fn get_chat(&self, actor: &UserModel, chat_id: i32) -> Result<ChatDetailDto, Error> {
        let chat = self.get_chat_model(chat_id).await?;

        let is_agent = self.is_agent(actor).await?;
        if chat.user_id != actor.id && !is_agent {
            return Err(SupportError::NotParticipant(chat_id).into());
        }

        let messages = SupportMessageRepository::new(self.db)
            .list_for_chat(chat.id, is_agent)
            .await?;

        Ok(ChatDetailDto {
            chat: chat.into(),
            messages: messages.into_iter().map(ChatMessageDto::from).collect(),
        })
    }

    /// Takes an unassigned chat that is not closed
    pub async fn assume(&self, actor: &UserModel, chat_id: i32) -> Result<ChatDto, Error> {
        if !self.is_agent(actor).await? {
            return Err(SupportError::NotAgent.into());
        }

        let chat = self.get_chat_model(chat_id).await?;
        if chat.status == SupportStatus::Fechado {
            return Err(SupportError::ChatClosed(chat_id).into());
        }
        if chat.assigned_to.is_some() {
            return Err(SupportError::AlreadyAssigned(chat_id).into());
        }

        let chat = SupportChatRepository::new(self.db)
            .assign(chat, actor.id)
            .await?;

        tracing::info!(chat_id = chat.id, agent_id = actor.id, "Support chat assumed");

        self.notifier
            .dispatch(
                self.db,
                NotificationMessage::new(
                    NotificationType::System,
                    "Atendimento iniciado",
                    format!("{} {} assumiu o seu chamado de suporte", actor.first_name, actor.last_name),
                )
                .with_url(chat_url(chat.id))
                .created_by(actor.id),
                Audience::Users(vec![chat.user_id]),
            )
            .await;

        Ok(chat.into())
    }

    /// Posts a message as the chat owner or an agent.
    ///
    /// The first public agent reply to an open chat takes it into progress, assigning the agent
    /// when nobody holds it yet.
    pub async fn send_message(
        &self,
        actor: &UserModel,
        chat_id: i32,
        request: SendChatMessageDto,
    ) -> Result<ChatMessageDto, Error> {
        let text = request.message.trim().to_string();
        if text.is_empty() {
            return Err(SupportError::EmptyMessage.into());
        }

        let chat = self.get_chat_model(chat_id).await?;
        if chat.status == SupportStatus::Fechado {
            return Err(SupportError::ChatClosed(chat_id).into());
        }

        let is_owner = chat.user_id == actor.id;
        let is_agent = self.is_agent(actor).await?;
        if !is_owner && !is_agent {
            return Err(SupportError::NotParticipant(chat_id).into());
        }
        if request.is_internal && !is_agent {
            return Err(SupportError::NotAgent.into());
        }

        let agent_reply = is_agent && !is_owner && !request.is_internal;

        let txn = self.db.begin().await?;
        let chat_repo = SupportChatRepository::new(&txn);

        let message = SupportMessageRepository::new(&txn)
            .create(chat.id, actor.id, text, request.is_internal)
            .await?;

        let chat = match (agent_reply, chat.status, chat.assigned_to) {
            (true, SupportStatus::Aberto, None) => chat_repo.assign(chat, actor.id).await?,
            (true, SupportStatus::Aberto, Some(_)) => {
                chat_repo.update_status(chat, SupportStatus::EmAndamento).await?
            }
            _ => chat_repo.touch(chat).await?,
        };

        txn.commit().await?;

        if !request.is_internal {
            let recipient = if agent_reply {
                Some(chat.user_id)
            } else {
                chat.assigned_to.filter(|agent_id| *agent_id != actor.id)
            };

            if let Some(recipient) = recipient {
                self.notifier
                    .dispatch(
                        self.db,
                        NotificationMessage::new(
                            NotificationType::System,
                            format!("Nova mensagem: {}", chat.title),
                            message.message.clone(),
                        )
                        .with_url(chat_url(chat.id))
                        .created_by(actor.id),
                        Audience::Users(vec![recipient]),
                    )
                    .await;
            }
        }

        Ok(message.into())
    }

    pub async fn update_status(
        &self,
        actor: &UserModel,
        chat_id: i32,
        status: SupportStatus,
    ) -> Result<ChatDto, Error> {
        if !self.is_agent(actor).await? {
            return Err(SupportError::NotAgent.into());
        }

        let chat = self.get_chat_model(chat_id).await?;
        let chat = SupportChatRepository::new(self.db)
            .update_status(chat, status)
            .await?;

        tracing::info!(chat_id = chat.id, agent_id = actor.id, status = ?chat.status, "Support chat status changed");

        Ok(chat.into())
    }

    /// Registers or reactivates a support agent
    pub async fn register_agent(
        &self,
        actor: &UserModel,
        request: RegisterAgentDto,
    ) -> Result<AgentDto, Error> {
        if !actor.is_at_least(Hierarchy::Administrativo) {
            return Err(AuthError::denied("Registering agents requires ADMINISTRATIVO or above").into());
        }

        let user = UserRepository::new(self.db)
            .get_by_id(request.user_id)
            .await?
            .ok_or(UserError::UserNotFound(request.user_id))?;

        let txn = self.db.begin().await?;

        let agent = SupportAgentRepository::new(&txn)
            .register(user.id, request.can_assign_tickets)
            .await?;
        AuditRepository::new(&txn)
            .record(
                Some(actor.id),
                ActionType::AdminAction,
                format!("Registered {} as support agent", user.email),
            )
            .await?;

        txn.commit().await?;

        Ok(agent.into())
    }
}
