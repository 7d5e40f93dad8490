use chrono::{Days, NaiveDate, NaiveTime};
use entity::sea_orm_active_enums::{ActionType, ExecutionStatus, Hierarchy, NotificationType};
use sea_orm::TransactionTrait;

use crate::{
    model::checklist::{ApprovalStatsDto, ExecutionDto, PendingApprovalsDto, PendingApprovalsQuery},
    server::{
        data::{audit::AuditRepository, checklist::ExecutionRepository},
        error::{auth::AuthError, checklist::ChecklistError, Error},
        model::{
            db::{AssignmentModel, ExecutionModel, TemplateModel, UserModel},
            permission::UserPermissions,
        },
        service::{
            checklist::{
                workflow::{can_review_sector, ExecutionTransitions},
                ChecklistService,
            },
            notification::dispatcher::{Audience, NotificationMessage},
        },
    },
};

enum Decision {
    Approve,
    Reject(Option<String>),
}

impl<'a> ChecklistService<'a> {
    pub async fn approve_execution(&self, actor: &UserModel, execution_id: i32) -> Result<ExecutionDto, Error> {
        self.review(actor, execution_id, Decision::Approve).await
    }

    /// Sends an execution back to its executor as pending, keeping `note` for them to read.
    ///
    /// A blank note is stored as no note.
    pub async fn reject_execution(
        &self,
        actor: &UserModel,
        execution_id: i32,
        note: Option<String>,
    ) -> Result<ExecutionDto, Error> {
        let note = note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        self.review(actor, execution_id, Decision::Reject(note)).await
    }

    async fn review(
        &self,
        actor: &UserModel,
        execution_id: i32,
        decision: Decision,
    ) -> Result<ExecutionDto, Error> {
        let (execution, assignment) = self.load_execution(execution_id).await?;
        let template = self.template_of(&assignment).await?;

        if assignment.assigned_to == actor.id {
            return Err(ChecklistError::SelfApproval.into());
        }
        if !can_review_sector(actor, template.sector_id) {
            return Err(ChecklistError::NotApprover.into());
        }

        let next_status = match decision {
            Decision::Approve => ExecutionStatus::Approved,
            Decision::Reject(_) => ExecutionStatus::Pending,
        };
        if !execution.status.can_transition_to(next_status) {
            return Err(ChecklistError::InvalidTransition {
                from: execution.status,
                to: next_status,
            }
            .into());
        }

        let txn = self.db.begin().await?;
        let execution_repo = ExecutionRepository::new(&txn);
        let audit_repo = AuditRepository::new(&txn);

        let (execution, title, body) = match decision {
            Decision::Approve => {
                let execution = execution_repo.approve(execution, actor.id).await?;
                audit_repo
                    .record(
                        Some(actor.id),
                        ActionType::ChecklistApprove,
                        format!(
                            "Approved checklist execution #{} ({} on {})",
                            execution.id, template.name, execution.execution_date
                        ),
                    )
                    .await?;

                (
                    execution,
                    "Checklist aprovado".to_string(),
                    format!("Seu checklist {} foi aprovado", template.name),
                )
            }
            Decision::Reject(note) => {
                let execution = execution_repo.reject(execution, note.clone()).await?;
                let summary = format!(
                    "Rejected checklist execution #{} ({} on {})",
                    execution.id, template.name, execution.execution_date
                );
                audit_repo
                    .record(
                        Some(actor.id),
                        ActionType::ChecklistReject,
                        match &note {
                            Some(note) => format!("{}: {}", summary, note),
                            None => summary,
                        },
                    )
                    .await?;

                let body = match &note {
                    Some(note) => format!("Seu checklist {} foi rejeitado: {}", template.name, note),
                    None => format!("Seu checklist {} foi rejeitado", template.name),
                };

                (execution, "Checklist rejeitado".to_string(), body)
            }
        };

        txn.commit().await?;

        tracing::info!(
            execution_id = execution.id,
            reviewer_id = actor.id,
            status = ?execution.status,
            "Reviewed checklist execution"
        );

        self.notifier
            .dispatch(
                self.db,
                NotificationMessage::new(NotificationType::Task, title, body)
                    .with_url("/checklists/")
                    .created_by(actor.id),
                Audience::Users(vec![assignment.assigned_to]),
            )
            .await;

        self.execution_dto(execution, &assignment, &template).await
    }

    /// Executions awaiting approval that `actor` may review, with counters for the dashboard
    pub async fn pending_approvals(
        &self,
        actor: &UserModel,
        query: PendingApprovalsQuery,
        today: NaiveDate,
    ) -> Result<PendingApprovalsDto, Error> {
        if !actor.is_at_least(Hierarchy::Supervisor) {
            return Err(AuthError::denied("Approving checklists requires SUPERVISOR or above").into());
        }

        let rows = ExecutionRepository::new(self.db)
            .awaiting_approval(query.date)
            .await?;

        let mut reviewable: Vec<(ExecutionModel, AssignmentModel, TemplateModel)> = Vec::new();
        for (execution, assignment) in rows {
            let Some(assignment) = assignment else {
                continue;
            };
            if assignment.assigned_to == actor.id {
                continue;
            }

            let template = self.template_of(&assignment).await?;
            if !can_review_sector(actor, template.sector_id) {
                continue;
            }
            if query.sector_id.is_some_and(|sector_id| sector_id != template.sector_id) {
                continue;
            }

            reviewable.push((execution, assignment, template));
        }

        let pending_today = reviewable
            .iter()
            .filter(|(execution, _, _)| execution.execution_date == today)
            .count();

        let day_start = today.and_time(NaiveTime::MIN);
        let day_end = (today + Days::new(1)).and_time(NaiveTime::MIN);
        let approved_today = ExecutionRepository::new(self.db)
            .count_approved_between(day_start, day_end)
            .await?;

        let mut executions = Vec::with_capacity(reviewable.len());
        for (execution, assignment, template) in reviewable {
            executions.push(self.execution_dto(execution, &assignment, &template).await?);
        }

        Ok(PendingApprovalsDto {
            stats: ApprovalStatsDto {
                pending_total: executions.len(),
                pending_today,
                approved_today,
            },
            executions,
        })
    }
}
