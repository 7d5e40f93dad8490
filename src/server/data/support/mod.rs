//! Support chat, message and agent repositories.

pub mod agent;
pub mod chat;
pub mod message;

pub use agent::SupportAgentRepository;
pub use chat::SupportChatRepository;
pub use message::SupportMessageRepository;
