//! Checklist templates, scheduled executions and the submit/approve workflow.

pub mod approval;
pub mod schedule;
pub mod submission;
pub mod workflow;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use chrono::NaiveDate;
use entity::sea_orm_active_enums::{Hierarchy, ScheduleType};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};

use crate::{
    model::checklist::{
        AssignmentDto, CreateAssignmentDto, CreateTemplateDto, ExecutionDto, TaskDto,
        TaskExecutionDto, TemplateDto,
    },
    server::{
        data::{
            checklist::{AssignmentRepository, ExecutionRepository, NewAssignment, TemplateRepository},
            user::{SectorRepository, UserRepository},
        },
        error::{auth::AuthError, checklist::ChecklistError, user::UserError, Error},
        model::{
            db::{AssignmentModel, ExecutionModel, TaskModel, TemplateModel, UserModel},
            permission::UserPermissions,
        },
        service::{
            checklist::{
                schedule::{active_dates, encode_custom_dates, parse_custom_dates, periods},
                workflow::can_review_sector,
            },
            notification::dispatcher::Notifier,
        },
        util::media::MediaStore,
    },
};

/// Longest assignment range, and most custom dates, accepted in one request
pub const MAX_ASSIGNMENT_DAYS: i64 = 366;

/// Ensures the executions of `assignment` exist for each of `dates`.
///
/// Existing executions are left alone so generation can run repeatedly. Returns how many
/// executions were created.
pub async fn ensure_executions<C: ConnectionTrait>(
    db: &C,
    assignment: &AssignmentModel,
    task_ids: &[i32],
    dates: &[NaiveDate],
) -> Result<usize, DbErr> {
    let execution_repo = ExecutionRepository::new(db);
    let mut created = 0;

    for date in dates {
        for period in periods(assignment.period) {
            if execution_repo
                .find(assignment.id, *date, *period)
                .await?
                .is_some()
            {
                continue;
            }

            execution_repo
                .create_with_tasks(assignment.id, *date, *period, task_ids)
                .await?;
            created += 1;
        }
    }

    Ok(created)
}

fn template_dto(template: TemplateModel, tasks: Vec<TaskModel>) -> TemplateDto {
    TemplateDto {
        id: template.id,
        name: template.name,
        description: template.description,
        sector_id: template.sector_id,
        created_by: template.created_by,
        is_active: template.is_active,
        tasks: tasks.into_iter().map(TaskDto::from).collect(),
    }
}

pub struct ChecklistService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a Notifier,
}

impl<'a> ChecklistService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a Notifier) -> Self {
        Self { db, notifier }
    }

    /// Templates may be managed by SUPERVISOR and above, supervisors only in their own sector
    fn require_template_manager(actor: &UserModel, sector_id: i32) -> Result<(), Error> {
        if !actor.is_at_least(Hierarchy::Supervisor) {
            return Err(AuthError::denied("Managing checklists requires SUPERVISOR or above").into());
        }
        if !can_review_sector(actor, sector_id) {
            return Err(AuthError::denied("Supervisors can only manage checklists of their own sector").into());
        }

        Ok(())
    }

    pub async fn create_template(
        &self,
        actor: &UserModel,
        request: CreateTemplateDto,
    ) -> Result<TemplateDto, Error> {
        Self::require_template_manager(actor, request.sector_id)?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation("Template name must not be empty".to_string()));
        }
        let tasks: Vec<_> = request
            .tasks
            .into_iter()
            .filter(|task| !task.title.trim().is_empty())
            .collect();
        if tasks.is_empty() {
            return Err(ChecklistError::NoTasks.into());
        }

        SectorRepository::new(self.db)
            .get_by_id(request.sector_id)
            .await?
            .ok_or(UserError::SectorNotFound(request.sector_id))?;

        let txn = self.db.begin().await?;
        let template_repo = TemplateRepository::new(&txn);

        let template = template_repo
            .create(name, request.description.trim().to_string(), request.sector_id, actor.id)
            .await?;

        let mut created = Vec::with_capacity(tasks.len());
        for (order, task) in tasks.into_iter().enumerate() {
            created.push(
                template_repo
                    .add_task(
                        template.id,
                        task.title.trim().to_string(),
                        task.description.trim().to_string(),
                        order as i32,
                        task.is_required,
                    )
                    .await?,
            );
        }

        txn.commit().await?;

        tracing::info!(template_id = template.id, user_id = actor.id, "Created checklist template");

        Ok(template_dto(template, created))
    }

    /// Active templates, ADMINISTRATIVO and above see every sector
    pub async fn list_templates(&self, actor: &UserModel) -> Result<Vec<TemplateDto>, Error> {
        let sector_filter = if actor.is_at_least(Hierarchy::Administrativo) {
            None
        } else {
            match actor.sector_id {
                Some(sector_id) => Some(sector_id),
                None => return Ok(Vec::new()),
            }
        };

        let template_repo = TemplateRepository::new(self.db);
        let templates = template_repo.list_active(sector_filter).await?;

        let mut dtos = Vec::with_capacity(templates.len());
        for template in templates {
            let tasks = template_repo.tasks(template.id).await?;
            dtos.push(template_dto(template, tasks));
        }

        Ok(dtos)
    }

    pub async fn get_template(&self, template_id: i32) -> Result<TemplateDto, Error> {
        let template_repo = TemplateRepository::new(self.db);

        let template = template_repo
            .get_by_id(template_id)
            .await?
            .ok_or(ChecklistError::TemplateNotFound(template_id))?;
        let tasks = template_repo.tasks(template.id).await?;

        Ok(template_dto(template, tasks))
    }

    pub async fn deactivate_template(&self, actor: &UserModel, template_id: i32) -> Result<(), Error> {
        let template_repo = TemplateRepository::new(self.db);

        let template = template_repo
            .get_by_id(template_id)
            .await?
            .ok_or(ChecklistError::TemplateNotFound(template_id))?;
        Self::require_template_manager(actor, template.sector_id)?;

        template_repo.deactivate(template).await?;

        Ok(())
    }

    /// Assigns a template and creates the executions for every active date of the schedule
    pub async fn create_assignment(
        &self,
        actor: &UserModel,
        request: CreateAssignmentDto,
        today: NaiveDate,
    ) -> Result<AssignmentDto, Error> {
        let template_repo = TemplateRepository::new(self.db);

        let template = template_repo
            .get_by_id(request.template_id)
            .await?
            .filter(|template| template.is_active)
            .ok_or(ChecklistError::TemplateNotFound(request.template_id))?;
        Self::require_template_manager(actor, template.sector_id)?;

        if request.start_date > request.end_date {
            return Err(ChecklistError::InvalidSchedule(
                "start date must not be after end date".to_string(),
            )
            .into());
        }
        if (request.end_date - request.start_date).num_days() >= MAX_ASSIGNMENT_DAYS
            || request.custom_dates.len() as i64 > MAX_ASSIGNMENT_DAYS
        {
            return Err(ChecklistError::InvalidSchedule(format!(
                "an assignment may cover at most {} days",
                MAX_ASSIGNMENT_DAYS
            ))
            .into());
        }
        if request.schedule_type == ScheduleType::Custom && request.custom_dates.is_empty() {
            return Err(ChecklistError::InvalidSchedule(
                "custom schedules need at least one date".to_string(),
            )
            .into());
        }

        UserRepository::new(self.db)
            .get_by_id(request.assigned_to)
            .await?
            .filter(|user| user.is_active)
            .ok_or(UserError::UserNotFound(request.assigned_to))?;

        let task_ids: Vec<i32> = template_repo
            .tasks(template.id)
            .await?
            .into_iter()
            .map(|task| task.id)
            .collect();

        let txn = self.db.begin().await?;

        let assignment = AssignmentRepository::new(&txn)
            .create(NewAssignment {
                template_id: template.id,
                assigned_to: request.assigned_to,
                assigned_by: actor.id,
                schedule_type: request.schedule_type,
                custom_dates: encode_custom_dates(&request.custom_dates),
                start_date: request.start_date,
                end_date: request.end_date,
                period: request.period,
            })
            .await?;

        let dates = active_dates(&assignment, today)?;
        let generated = ensure_executions(&txn, &assignment, &task_ids, &dates).await?;

        txn.commit().await?;

        tracing::info!(
            assignment_id = assignment.id,
            assigned_to = assignment.assigned_to,
            generated,
            "Created checklist assignment"
        );

        Ok(AssignmentDto {
            custom_dates: parse_custom_dates(&assignment.custom_dates)?,
            id: assignment.id,
            template_id: assignment.template_id,
            assigned_to: assignment.assigned_to,
            assigned_by: assignment.assigned_by,
            schedule_type: assignment.schedule_type,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            period: assignment.period,
            is_active: assignment.is_active,
            generated_executions: generated,
        })
    }

    /// Makes sure every active assignment due on `today` has its executions for the day
    pub async fn generate_daily_executions(&self, today: NaiveDate) -> Result<usize, Error> {
        let assignments = AssignmentRepository::new(self.db)
            .list_active_on(today)
            .await?;
        let template_repo = TemplateRepository::new(self.db);

        let mut created = 0;
        for assignment in assignments {
            let dates = match active_dates(&assignment, today) {
                Ok(dates) => dates,
                Err(e) => {
                    tracing::warn!(assignment_id = assignment.id, "Skipping assignment: {}", e);

                    continue;
                }
            };
            if !dates.contains(&today) {
                continue;
            }

            let task_ids: Vec<i32> = template_repo
                .tasks(assignment.template_id)
                .await?
                .into_iter()
                .map(|task| task.id)
                .collect();

            created += ensure_executions(self.db, &assignment, &task_ids, &[today]).await?;
        }

        tracing::info!(%today, created, "Generated daily checklist executions");

        Ok(created)
    }

    pub async fn today_executions(
        &self,
        actor: &UserModel,
        today: NaiveDate,
    ) -> Result<Vec<ExecutionDto>, Error> {
        let rows = ExecutionRepository::new(self.db)
            .for_user_on(actor.id, today)
            .await?;

        self.execution_dtos(rows).await
    }

    /// Execution detail for its executor or anyone allowed to review it
    pub async fn get_execution(&self, actor: &UserModel, execution_id: i32) -> Result<ExecutionDto, Error> {
        let (execution, assignment) = self.load_execution(execution_id).await?;
        let template = self.template_of(&assignment).await?;

        if assignment.assigned_to != actor.id && !can_review_sector(actor, template.sector_id) {
            return Err(AuthError::denied("You cannot view this checklist execution").into());
        }

        self.execution_dto(execution, &assignment, &template).await
    }

    async fn load_execution(
        &self,
        execution_id: i32,
    ) -> Result<(ExecutionModel, AssignmentModel), Error> {
        let (execution, assignment) = ExecutionRepository::new(self.db)
            .get_with_assignment(execution_id)
            .await?
            .ok_or(ChecklistError::ExecutionNotFound(execution_id))?;

        let assignment = assignment.ok_or_else(|| {
            Error::InternalError(format!(
                "Assignment ID {} of execution ID {} not found",
                execution.assignment_id, execution.id
            ))
        })?;

        Ok((execution, assignment))
    }

    async fn template_of(&self, assignment: &AssignmentModel) -> Result<TemplateModel, Error> {
        TemplateRepository::new(self.db)
            .get_by_id(assignment.template_id)
            .await?
            .ok_or_else(|| {
                Error::InternalError(format!(
                    "Template ID {} of assignment ID {} not found",
                    assignment.template_id, assignment.id
                ))
            })
    }

    async fn execution_dto(
        &self,
        execution: ExecutionModel,
        assignment: &AssignmentModel,
        template: &TemplateModel,
    ) -> Result<ExecutionDto, Error> {
        let tasks: HashMap<i32, TaskModel> = TemplateRepository::new(self.db)
            .tasks(template.id)
            .await?
            .into_iter()
            .map(|task| (task.id, task))
            .collect();
        let task_executions = ExecutionRepository::new(self.db)
            .task_executions(execution.id)
            .await?;

        let mut task_dtos: Vec<(i32, TaskExecutionDto)> = task_executions
            .into_iter()
            .map(|te| {
                let task = tasks.get(&te.task_id);

                (
                    task.map(|task| task.sort_order).unwrap_or(i32::MAX),
                    TaskExecutionDto {
                        id: te.id,
                        task_id: te.task_id,
                        title: task.map(|task| task.title.clone()).unwrap_or_default(),
                        is_required: task.map(|task| task.is_required).unwrap_or(false),
                        is_completed: te.is_completed,
                        completed_at: te.completed_at,
                        notes: te.notes,
                        evidence_image: te.evidence_image.as_deref().map(MediaStore::url),
                        evidence_video: te.evidence_video.as_deref().map(MediaStore::url),
                    },
                )
            })
            .collect();
        task_dtos.sort_by_key(|(order, _)| *order);

        Ok(ExecutionDto {
            id: execution.id,
            assignment_id: assignment.id,
            template_id: template.id,
            template_name: template.name.clone(),
            assigned_to: assignment.assigned_to,
            execution_date: execution.execution_date,
            period: execution.period,
            status: execution.status,
            submitted_at: execution.submitted_at,
            completed_at: execution.completed_at,
            approved_by: execution.approved_by,
            approved_at: execution.approved_at,
            rejection_note: execution.rejection_note,
            tasks: task_dtos.into_iter().map(|(_, dto)| dto).collect(),
        })
    }

    async fn execution_dtos(
        &self,
        rows: Vec<(ExecutionModel, Option<AssignmentModel>)>,
    ) -> Result<Vec<ExecutionDto>, Error> {
        let template_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, assignment)| assignment.as_ref().map(|a| a.template_id))
            .collect();
        let templates: HashMap<i32, TemplateModel> = TemplateRepository::new(self.db)
            .get_many(template_ids)
            .await?
            .into_iter()
            .map(|template| (template.id, template))
            .collect();

        let mut dtos = Vec::with_capacity(rows.len());
        for (execution, assignment) in rows {
            let Some(assignment) = assignment else {
                continue;
            };
            let Some(template) = templates.get(&assignment.template_id) else {
                continue;
            };

            dtos.push(self.execution_dto(execution, &assignment, template).await?);
        }

        Ok(dtos)
    }
}
