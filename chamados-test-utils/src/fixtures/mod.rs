//! Test fixture modules for database record creation.
//!
//! Each submodule adds an accessor on [`TestContext`](crate::TestContext) returning a fixture
//! helper for one domain:
//!
//! - `user` - sectors and users with a known password
//! - `ticket` - categories and tickets
//! - `checklist` - templates, assignments and executions
//! - `prize` - prizes for the credits ledger
//! - `notification` - Web Push device tokens
//! - `support` - support agents and chats

pub mod checklist;
pub mod notification;
pub mod prize;
pub mod support;
pub mod ticket;
pub mod user;
