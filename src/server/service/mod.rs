//! Service layer for business logic and orchestration.
//!
//! Services enforce hierarchy permissions, validate requests and coordinate repositories inside
//! database transactions. Side effects that leave the process (webhooks, push notifications)
//! run after the commit so a delivery failure never undoes the action that triggered it.

pub mod audit;
pub mod auth;
pub mod checklist;
pub mod notification;
pub mod prize;
pub mod support;
pub mod ticket;
pub mod user;
