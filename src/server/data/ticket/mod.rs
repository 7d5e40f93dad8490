//! Ticket, category, comment, status log and webhook repositories.

pub mod category;
pub mod comment;
pub mod log;
pub mod ticket;
pub mod webhook;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use log::TicketLogRepository;
pub use ticket::{NewTicket, TicketRepository, TicketScope};
pub use webhook::{NewWebhook, WebhookRepository};
