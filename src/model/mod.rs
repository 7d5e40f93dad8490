//! Request and response DTOs shared by the HTTP layer.

pub mod api;
pub mod audit;
pub mod checklist;
pub mod notification;
pub mod prize;
pub mod support;
pub mod ticket;
pub mod user;
