//! SeaORM entity definitions for every table of the helpdesk schema.

pub mod prelude;

pub mod app_user;
pub mod checklist_assignment;
pub mod checklist_execution;
pub mod checklist_task;
pub mod checklist_task_execution;
pub mod checklist_template;
pub mod credit_transaction;
pub mod device_token;
pub mod notification;
pub mod onesignal_player;
pub mod prize;
pub mod redemption;
pub mod sea_orm_active_enums;
pub mod sector;
pub mod support_agent;
pub mod support_chat;
pub mod support_chat_message;
pub mod system_log;
pub mod ticket;
pub mod ticket_category;
pub mod ticket_comment;
pub mod ticket_log;
pub mod truepush_subscriber;
pub mod user_notification;
pub mod webhook;
