//! Data access layer repositories.
//!
//! Repositories wrap SeaORM queries for one table or a small group of related tables. They
//! are generic over [`sea_orm::ConnectionTrait`] so services can run several of them inside a
//! single transaction.

pub mod audit;
pub mod checklist;
pub mod notification;
pub mod prize;
pub mod support;
pub mod ticket;
pub mod user;
