use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{
    AssignmentPeriod, ExecutionPeriod, ExecutionStatus, ScheduleType,
};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn checklist<'a>(&'a mut self) -> ChecklistFixtures<'a> {
        ChecklistFixtures { context: self }
    }
}

pub struct ChecklistFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> ChecklistFixtures<'a> {
    /// Inserts an active template with one required task per title, ordered as given.
    pub async fn insert_template(
        &self,
        sector_id: i32,
        created_by: i32,
        task_titles: &[&str],
    ) -> Result<
        (
            entity::checklist_template::Model,
            Vec<entity::checklist_task::Model>,
        ),
        TestError,
    > {
        let now = Utc::now().naive_utc();

        let template =
            entity::prelude::ChecklistTemplate::insert(entity::checklist_template::ActiveModel {
                name: ActiveValue::Set("Abertura da loja".to_string()),
                description: ActiveValue::Set("Daily opening routine".to_string()),
                sector_id: ActiveValue::Set(sector_id),
                created_by: ActiveValue::Set(created_by),
                is_active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?;

        let mut tasks = Vec::with_capacity(task_titles.len());

        for (order, title) in task_titles.iter().enumerate() {
            let task = entity::prelude::ChecklistTask::insert(entity::checklist_task::ActiveModel {
                template_id: ActiveValue::Set(template.id),
                title: ActiveValue::Set(title.to_string()),
                description: ActiveValue::Set(String::new()),
                sort_order: ActiveValue::Set(order as i32),
                is_required: ActiveValue::Set(true),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?;

            tasks.push(task);
        }

        Ok((template, tasks))
    }

    /// Inserts an active morning assignment scheduled for a single custom date.
    pub async fn insert_assignment(
        &self,
        template_id: i32,
        assigned_to: i32,
        assigned_by: i32,
        date: NaiveDate,
    ) -> Result<entity::checklist_assignment::Model, TestError> {
        let custom_dates = serde_json::json!([date.format("%Y-%m-%d").to_string()]).to_string();

        Ok(
            entity::prelude::ChecklistAssignment::insert(entity::checklist_assignment::ActiveModel {
                template_id: ActiveValue::Set(template_id),
                assigned_to: ActiveValue::Set(assigned_to),
                assigned_by: ActiveValue::Set(assigned_by),
                schedule_type: ActiveValue::Set(ScheduleType::Custom),
                custom_dates: ActiveValue::Set(custom_dates),
                start_date: ActiveValue::Set(date),
                end_date: ActiveValue::Set(date),
                period: ActiveValue::Set(AssignmentPeriod::Morning),
                is_active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    /// Inserts a morning execution in the given status with one incomplete row per task.
    pub async fn insert_execution(
        &self,
        assignment: &entity::checklist_assignment::Model,
        tasks: &[entity::checklist_task::Model],
        status: ExecutionStatus,
    ) -> Result<
        (
            entity::checklist_execution::Model,
            Vec<entity::checklist_task_execution::Model>,
        ),
        TestError,
    > {
        let now = Utc::now().naive_utc();
        let submitted_at = match status {
            ExecutionStatus::Pending => None,
            _ => Some(now),
        };

        let execution =
            entity::prelude::ChecklistExecution::insert(entity::checklist_execution::ActiveModel {
                assignment_id: ActiveValue::Set(assignment.id),
                execution_date: ActiveValue::Set(assignment.start_date),
                period: ActiveValue::Set(ExecutionPeriod::Morning),
                status: ActiveValue::Set(status),
                started_at: ActiveValue::Set(None),
                submitted_at: ActiveValue::Set(submitted_at),
                completed_at: ActiveValue::Set(None),
                approved_by: ActiveValue::Set(None),
                approved_at: ActiveValue::Set(None),
                rejection_note: ActiveValue::Set(None),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?;

        let mut task_executions = Vec::with_capacity(tasks.len());

        for task in tasks {
            let task_execution = entity::prelude::ChecklistTaskExecution::insert(
                entity::checklist_task_execution::ActiveModel {
                    execution_id: ActiveValue::Set(execution.id),
                    task_id: ActiveValue::Set(task.id),
                    is_completed: ActiveValue::Set(false),
                    completed_at: ActiveValue::Set(None),
                    notes: ActiveValue::Set(String::new()),
                    evidence_image: ActiveValue::Set(None),
                    evidence_video: ActiveValue::Set(None),
                    ..Default::default()
                },
            )
            .exec_with_returning(&self.context.db)
            .await?;

            task_executions.push(task_execution);
        }

        Ok((execution, task_executions))
    }

    /// Attaches an image evidence path to an existing task execution.
    pub async fn attach_image(
        &self,
        task_execution: entity::checklist_task_execution::Model,
        path: &str,
    ) -> Result<entity::checklist_task_execution::Model, TestError> {
        let mut active: entity::checklist_task_execution::ActiveModel = task_execution.into();
        active.evidence_image = ActiveValue::Set(Some(path.to_string()));

        Ok(entity::prelude::ChecklistTaskExecution::update(active)
            .exec(&self.context.db)
            .await?)
    }
}
