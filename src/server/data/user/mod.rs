//! User and sector repositories.

pub mod sector;
pub mod user;

pub use sector::SectorRepository;
pub use user::{NewUser, UserRepository};
