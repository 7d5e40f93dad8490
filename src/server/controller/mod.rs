//! HTTP handlers for the helpdesk API.
//!
//! Handlers load the session user, call the matching service and turn the result into a
//! response. Every route carries a utoipa annotation and is registered in
//! [`crate::server::router`].

pub mod admin;
pub mod audit;
pub mod auth;
pub mod checklist;
pub mod notification;
pub mod onesignal;
pub mod prize;
pub mod support;
pub mod ticket;
pub mod truepush;
pub mod user;
pub mod util;
