//! Helpers shared by the HTTP handlers.

pub mod client_ip;
pub mod get_user;
pub mod multipart;
