pub use super::app_user::Entity as AppUser;
pub use super::checklist_assignment::Entity as ChecklistAssignment;
pub use super::checklist_execution::Entity as ChecklistExecution;
pub use super::checklist_task::Entity as ChecklistTask;
pub use super::checklist_task_execution::Entity as ChecklistTaskExecution;
pub use super::checklist_template::Entity as ChecklistTemplate;
pub use super::credit_transaction::Entity as CreditTransaction;
pub use super::device_token::Entity as DeviceToken;
pub use super::notification::Entity as Notification;
pub use super::onesignal_player::Entity as OnesignalPlayer;
pub use super::prize::Entity as Prize;
pub use super::redemption::Entity as Redemption;
pub use super::sector::Entity as Sector;
pub use super::support_agent::Entity as SupportAgent;
pub use super::support_chat::Entity as SupportChat;
pub use super::support_chat_message::Entity as SupportChatMessage;
pub use super::system_log::Entity as SystemLog;
pub use super::ticket::Entity as Ticket;
pub use super::ticket_category::Entity as TicketCategory;
pub use super::ticket_comment::Entity as TicketComment;
pub use super::ticket_log::Entity as TicketLog;
pub use super::truepush_subscriber::Entity as TruepushSubscriber;
pub use super::user_notification::Entity as UserNotification;
pub use super::webhook::Entity as Webhook;
