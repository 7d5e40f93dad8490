//! Cron scheduler for recurring background jobs.
//!
//! Currently runs a single job that makes sure every active checklist assignment has its
//! executions for the current day.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, service::notification::dispatcher::Notifier};

pub mod checklist;

pub struct Scheduler {
    db: DatabaseConnection,
    notifier: Notifier,
    sched: JobScheduler,
}

impl Scheduler {
    pub async fn new(db: DatabaseConnection, notifier: Notifier) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self {
            db,
            notifier,
            sched,
        })
    }

    /// Registers all jobs and starts the scheduler.
    ///
    /// # Arguments
    /// - `checklist_cron` - Six field cron expression for daily checklist generation
    pub async fn start(mut self, checklist_cron: &str) -> Result<(), Error> {
        self.schedule_job(
            checklist_cron,
            "checklist execution",
            checklist::generate_checklist_executions,
        )
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job, logging the number of rows it produced or its error.
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, Notifier) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let notifier = self.notifier.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let notifier = notifier.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, notifier).await {
                        Ok(count) => tracing::info!("Created {} {} row(s)", count, name),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
