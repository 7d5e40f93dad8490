use chrono::Local;
use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    service::{checklist::ChecklistService, notification::dispatcher::Notifier},
};

/// Creates today's missing executions for every active assignment.
pub async fn generate_checklist_executions(
    db: DatabaseConnection,
    notifier: Notifier,
) -> Result<usize, Error> {
    let today = Local::now().date_naive();

    ChecklistService::new(&db, &notifier)
        .generate_daily_executions(today)
        .await
}
