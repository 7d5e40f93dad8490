use chrono::{NaiveDate, NaiveDateTime, Utc};
use entity::sea_orm_active_enums::{ExecutionPeriod, ExecutionStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// New values for one task row of a submission.
pub struct TaskExecutionUpdate {
    pub is_completed: bool,
    pub notes: String,
    /// Replaces the stored image when set, keeps it otherwise
    pub evidence_image: Option<String>,
    /// Replaces the stored video when set, keeps it otherwise
    pub evidence_video: Option<String>,
}

pub struct ExecutionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ExecutionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_id(
        &self,
        execution_id: i32,
    ) -> Result<Option<entity::checklist_execution::Model>, DbErr> {
        entity::prelude::ChecklistExecution::find_by_id(execution_id)
            .one(self.db)
            .await
    }

    /// Execution with its assignment
    pub async fn get_with_assignment(
        &self,
        execution_id: i32,
    ) -> Result<
        Option<(
            entity::checklist_execution::Model,
            Option<entity::checklist_assignment::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::ChecklistExecution::find_by_id(execution_id)
            .find_also_related(entity::prelude::ChecklistAssignment)
            .one(self.db)
            .await
    }

    pub async fn find(
        &self,
        assignment_id: i32,
        date: NaiveDate,
        period: ExecutionPeriod,
    ) -> Result<Option<entity::checklist_execution::Model>, DbErr> {
        entity::prelude::ChecklistExecution::find()
            .filter(entity::checklist_execution::Column::AssignmentId.eq(assignment_id))
            .filter(entity::checklist_execution::Column::ExecutionDate.eq(date))
            .filter(entity::checklist_execution::Column::Period.eq(period))
            .one(self.db)
            .await
    }

    /// Inserts a pending execution with one incomplete task row per task ID
    pub async fn create_with_tasks(
        &self,
        assignment_id: i32,
        date: NaiveDate,
        period: ExecutionPeriod,
        task_ids: &[i32],
    ) -> Result<entity::checklist_execution::Model, DbErr> {
        let execution = entity::checklist_execution::ActiveModel {
            assignment_id: ActiveValue::Set(assignment_id),
            execution_date: ActiveValue::Set(date),
            period: ActiveValue::Set(period),
            status: ActiveValue::Set(ExecutionStatus::Pending),
            started_at: ActiveValue::Set(None),
            submitted_at: ActiveValue::Set(None),
            completed_at: ActiveValue::Set(None),
            approved_by: ActiveValue::Set(None),
            approved_at: ActiveValue::Set(None),
            rejection_note: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        if !task_ids.is_empty() {
            let rows = task_ids
                .iter()
                .map(|task_id| entity::checklist_task_execution::ActiveModel {
                    execution_id: ActiveValue::Set(execution.id),
                    task_id: ActiveValue::Set(*task_id),
                    is_completed: ActiveValue::Set(false),
                    completed_at: ActiveValue::Set(None),
                    notes: ActiveValue::Set(String::new()),
                    evidence_image: ActiveValue::Set(None),
                    evidence_video: ActiveValue::Set(None),
                    ..Default::default()
                });

            entity::prelude::ChecklistTaskExecution::insert_many(rows)
                .exec(self.db)
                .await?;
        }

        Ok(execution)
    }

    pub async fn task_executions(
        &self,
        execution_id: i32,
    ) -> Result<Vec<entity::checklist_task_execution::Model>, DbErr> {
        entity::prelude::ChecklistTaskExecution::find()
            .filter(entity::checklist_task_execution::Column::ExecutionId.eq(execution_id))
            .order_by_asc(entity::checklist_task_execution::Column::Id)
            .all(self.db)
            .await
    }

    /// Executions assigned to `user_id` on `date`, with their assignment
    pub async fn for_user_on(
        &self,
        user_id: i32,
        date: NaiveDate,
    ) -> Result<
        Vec<(
            entity::checklist_execution::Model,
            Option<entity::checklist_assignment::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::ChecklistExecution::find()
            .find_also_related(entity::prelude::ChecklistAssignment)
            .filter(entity::checklist_assignment::Column::AssignedTo.eq(user_id))
            .filter(entity::checklist_execution::Column::ExecutionDate.eq(date))
            .order_by_asc(entity::checklist_execution::Column::Period)
            .order_by_asc(entity::checklist_execution::Column::Id)
            .all(self.db)
            .await
    }

    /// Executions waiting for approval, optionally on one date, oldest first
    pub async fn awaiting_approval(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<
        Vec<(
            entity::checklist_execution::Model,
            Option<entity::checklist_assignment::Model>,
        )>,
        DbErr,
    > {
        let mut query = entity::prelude::ChecklistExecution::find()
            .find_also_related(entity::prelude::ChecklistAssignment)
            .filter(
                entity::checklist_execution::Column::Status.eq(ExecutionStatus::AwaitingApproval),
            );

        if let Some(date) = date {
            query = query.filter(entity::checklist_execution::Column::ExecutionDate.eq(date));
        }

        query
            .order_by_asc(entity::checklist_execution::Column::SubmittedAt)
            .order_by_asc(entity::checklist_execution::Column::Id)
            .all(self.db)
            .await
    }

    /// Number of executions approved within `[from, to)`
    pub async fn count_approved_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        entity::prelude::ChecklistExecution::find()
            .filter(entity::checklist_execution::Column::Status.eq(ExecutionStatus::Approved))
            .filter(entity::checklist_execution::Column::ApprovedAt.gte(from))
            .filter(entity::checklist_execution::Column::ApprovedAt.lt(to))
            .count(self.db)
            .await
    }

    pub async fn update_task_execution(
        &self,
        task_execution: entity::checklist_task_execution::Model,
        update: TaskExecutionUpdate,
    ) -> Result<entity::checklist_task_execution::Model, DbErr> {
        let was_completed = task_execution.is_completed;
        let completed_at = task_execution.completed_at;

        let mut task_execution: entity::checklist_task_execution::ActiveModel =
            task_execution.into();
        task_execution.is_completed = ActiveValue::Set(update.is_completed);
        task_execution.notes = ActiveValue::Set(update.notes);
        task_execution.completed_at = ActiveValue::Set(match (update.is_completed, was_completed) {
            (true, true) => completed_at,
            (true, false) => Some(Utc::now().naive_utc()),
            (false, _) => None,
        });

        if let Some(image) = update.evidence_image {
            task_execution.evidence_image = ActiveValue::Set(Some(image));
        }
        if let Some(video) = update.evidence_video {
            task_execution.evidence_video = ActiveValue::Set(Some(video));
        }

        task_execution.update(self.db).await
    }

    /// Records a submission, `completed_at` is only stamped when every required task is done
    pub async fn mark_submitted(
        &self,
        execution: entity::checklist_execution::Model,
        status: ExecutionStatus,
    ) -> Result<entity::checklist_execution::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let started_at = execution.started_at;

        let mut execution: entity::checklist_execution::ActiveModel = execution.into();
        execution.status = ActiveValue::Set(status);
        execution.started_at = ActiveValue::Set(started_at.or(Some(now)));
        execution.submitted_at = ActiveValue::Set(Some(now));
        execution.rejection_note = ActiveValue::Set(None);
        execution.completed_at = ActiveValue::Set(
            (status == ExecutionStatus::AwaitingApproval).then_some(now),
        );

        execution.update(self.db).await
    }

    pub async fn approve(
        &self,
        execution: entity::checklist_execution::Model,
        approver_id: i32,
    ) -> Result<entity::checklist_execution::Model, DbErr> {
        let mut execution: entity::checklist_execution::ActiveModel = execution.into();
        execution.status = ActiveValue::Set(ExecutionStatus::Approved);
        execution.approved_by = ActiveValue::Set(Some(approver_id));
        execution.approved_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        execution.update(self.db).await
    }

    /// Returns the execution to pending with the reviewer's note, replacing any earlier one
    pub async fn reject(
        &self,
        execution: entity::checklist_execution::Model,
        note: Option<String>,
    ) -> Result<entity::checklist_execution::Model, DbErr> {
        let mut execution: entity::checklist_execution::ActiveModel = execution.into();
        execution.status = ActiveValue::Set(ExecutionStatus::Pending);
        execution.submitted_at = ActiveValue::Set(None);
        execution.completed_at = ActiveValue::Set(None);
        execution.rejection_note = ActiveValue::Set(note);

        execution.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use chamados_test_utils::prelude::*;
    use chrono::NaiveDate;
    use entity::sea_orm_active_enums::{ExecutionPeriod, ExecutionStatus, Hierarchy};

    use super::ExecutionRepository;

    /// Expect one task row per task for a freshly created execution
    #[tokio::test]
    async fn creates_execution_with_task_rows() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_checklist_tables().build().await?;
        let sector = test.user().insert_sector("Loja").await?;
        let user = test
            .user()
            .insert_user("exec@example.com", Hierarchy::Padrao, Some(sector.id))
            .await?;
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let (template, tasks) = test
            .checklist()
            .insert_template(sector.id, user.id, &["Open doors", "Count cash"])
            .await?;
        let assignment = test
            .checklist()
            .insert_assignment(template.id, user.id, user.id, date)
            .await?;

        let repo = ExecutionRepository::new(&test.db);
        let task_ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
        let execution = repo
            .create_with_tasks(assignment.id, date, ExecutionPeriod::Morning, &task_ids)
            .await?;

        assert_eq!(execution.status, ExecutionStatus::Pending);
        assert_eq!(repo.task_executions(execution.id).await?.len(), 2);
        assert!(repo
            .find(assignment.id, date, ExecutionPeriod::Morning)
            .await?
            .is_some());
        assert_eq!(repo.for_user_on(user.id, date).await?.len(), 1);

        Ok(())
    }

    /// Expect rejection to clear submission timestamps and keep the note
    #[tokio::test]
    async fn reject_returns_to_pending() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_checklist_tables().build().await?;
        let sector = test.user().insert_sector("Loja").await?;
        let user = test
            .user()
            .insert_user("exec@example.com", Hierarchy::Padrao, Some(sector.id))
            .await?;
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let (template, tasks) = test
            .checklist()
            .insert_template(sector.id, user.id, &["Open doors"])
            .await?;
        let assignment = test
            .checklist()
            .insert_assignment(template.id, user.id, user.id, date)
            .await?;
        let (execution, _) = test
            .checklist()
            .insert_execution(&assignment, &tasks, ExecutionStatus::AwaitingApproval)
            .await?;

        let repo = ExecutionRepository::new(&test.db);
        let rejected = repo.reject(execution, Some("Photo is blurry".to_string())).await?;

        assert_eq!(rejected.status, ExecutionStatus::Pending);
        assert!(rejected.submitted_at.is_none());
        assert_eq!(rejected.rejection_note.as_deref(), Some("Photo is blurry"));

        Ok(())
    }
}
