pub use sea_orm_migration::prelude::*;

mod m20261016_000001_sector_user;
mod m20261016_000002_ticket;
mod m20261016_000003_checklist;
mod m20261016_000004_prize;
mod m20261016_000005_notification;
mod m20261016_000006_support;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_sector_user::Migration),
            Box::new(m20261016_000002_ticket::Migration),
            Box::new(m20261016_000003_checklist::Migration),
            Box::new(m20261016_000004_prize::Migration),
            Box::new(m20261016_000005_notification::Migration),
            Box::new(m20261016_000006_support::Migration),
        ]
    }
}
