//! Server application models and type definitions.
//!
//! This module contains application state, database model type aliases, the capability
//! checks derived from a user's hierarchy and the session data wrappers.

pub mod app;
pub mod db;
pub mod permission;
pub mod session;
