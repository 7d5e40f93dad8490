//! Server application core modules.
//!
//! This module contains all server-side functionality of the helpdesk: HTTP routing,
//! authentication, database access, business services for tickets, checklists, credits,
//! support chat and notifications, plus the cron scheduler that generates daily checklist
//! executions.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
