use std::collections::HashMap;

use entity::sea_orm_active_enums::{ExecutionStatus, Hierarchy, NotificationType};
use sea_orm::{DbErr, TransactionTrait};

use crate::{
    model::checklist::ExecutionDto,
    server::{
        data::{
            checklist::{ExecutionRepository, TaskExecutionUpdate, TemplateRepository},
            user::UserRepository,
        },
        error::{checklist::ChecklistError, Error},
        model::db::{TaskModel, UserModel},
        service::{
            checklist::{
                workflow::{validate_submission, EvidenceUpload, ExecutionTransitions, TaskSubmission},
                ChecklistService,
            },
            notification::dispatcher::{Audience, NotificationMessage},
        },
        util::media::MediaStore,
    },
};

const IMAGE_DIR: &str = "checklists/evidence/images";
const VIDEO_DIR: &str = "checklists/evidence/videos";

/// Files written for one submission, removed again if the submission does not commit
#[derive(Default)]
struct WrittenFiles(Vec<String>);

impl WrittenFiles {
    async fn save(
        &mut self,
        media: &MediaStore,
        dir: &str,
        upload: Option<EvidenceUpload>,
    ) -> Result<Option<String>, std::io::Error> {
        let Some(upload) = upload else {
            return Ok(None);
        };

        let path = media.save(dir, &upload.file_name, &upload.bytes).await?;
        self.0.push(path.clone());

        Ok(Some(path))
    }

    async fn discard(self, media: &MediaStore) {
        for path in self.0 {
            if let Err(e) = media.remove(&path).await {
                tracing::warn!(path = %path, "Failed to remove evidence file: {}", e);
            }
        }
    }
}

impl<'a> ChecklistService<'a> {
    /// Records the executor's answers for an execution.
    ///
    /// The evidence rule is checked for every completed task before anything is written. The
    /// execution moves to `AwaitingApproval` once every required task is complete, otherwise
    /// to `Submitted`. Task rows not present in `submissions` are stored as not completed.
    pub async fn submit_execution(
        &self,
        actor: &UserModel,
        execution_id: i32,
        submissions: Vec<TaskSubmission>,
        media: &MediaStore,
    ) -> Result<ExecutionDto, Error> {
        let (execution, assignment) = self.load_execution(execution_id).await?;
        if assignment.assigned_to != actor.id {
            return Err(ChecklistError::NotExecutor.into());
        }
        let template = self.template_of(&assignment).await?;

        let tasks: HashMap<i32, TaskModel> = TemplateRepository::new(self.db)
            .tasks(template.id)
            .await?
            .into_iter()
            .map(|task| (task.id, task))
            .collect();
        let task_executions = ExecutionRepository::new(self.db)
            .task_executions(execution.id)
            .await?;

        validate_submission(&task_executions, &tasks, &submissions)?;

        let all_required_done = task_executions.iter().all(|te| {
            let required = tasks.get(&te.task_id).map(|task| task.is_required).unwrap_or(false);
            let completed = submissions
                .iter()
                .any(|submission| submission.task_id == te.task_id && submission.is_completed);

            !required || completed
        });
        let next_status = if all_required_done {
            ExecutionStatus::AwaitingApproval
        } else {
            ExecutionStatus::Submitted
        };
        if !execution.status.can_transition_to(next_status) {
            return Err(ChecklistError::InvalidTransition {
                from: execution.status,
                to: next_status,
            }
            .into());
        }

        let mut by_task: HashMap<i32, TaskSubmission> = submissions
            .into_iter()
            .map(|submission| (submission.task_id, submission))
            .collect();

        let mut written = WrittenFiles::default();
        let mut updates = Vec::with_capacity(task_executions.len());
        let mut replaced = Vec::new();
        for task_execution in task_executions {
            let submission = by_task.remove(&task_execution.task_id).unwrap_or(TaskSubmission {
                task_id: task_execution.task_id,
                ..Default::default()
            });

            let TaskSubmission {
                is_completed,
                notes,
                image,
                video,
                ..
            } = submission;

            let saved = async {
                let image = written.save(media, IMAGE_DIR, image).await?;
                let video = written.save(media, VIDEO_DIR, video).await?;

                Ok::<_, std::io::Error>((image, video))
            }
            .await;
            let (image, video) = match saved {
                Ok(paths) => paths,
                Err(e) => {
                    written.discard(media).await;

                    return Err(e.into());
                }
            };

            if image.is_some() {
                replaced.extend(task_execution.evidence_image.clone());
            }
            if video.is_some() {
                replaced.extend(task_execution.evidence_video.clone());
            }

            updates.push((
                task_execution,
                TaskExecutionUpdate {
                    is_completed,
                    notes: notes.trim().to_string(),
                    evidence_image: image,
                    evidence_video: video,
                },
            ));
        }

        let committed = async {
            let txn = self.db.begin().await?;
            let execution_repo = ExecutionRepository::new(&txn);

            for (task_execution, update) in updates {
                execution_repo.update_task_execution(task_execution, update).await?;
            }
            let execution = execution_repo.mark_submitted(execution, next_status).await?;

            txn.commit().await?;

            Ok::<_, DbErr>(execution)
        }
        .await;

        let execution = match committed {
            Ok(execution) => execution,
            Err(e) => {
                written.discard(media).await;

                return Err(e.into());
            }
        };

        for path in replaced {
            if let Err(e) = media.remove(&path).await {
                tracing::warn!(path = %path, "Failed to remove replaced evidence file: {}", e);
            }
        }

        tracing::info!(
            execution_id = execution.id,
            user_id = actor.id,
            status = ?execution.status,
            "Submitted checklist execution"
        );

        if execution.status == ExecutionStatus::AwaitingApproval {
            self.notify_reviewers(actor, template.sector_id, &template.name, execution.id)
                .await;
        }

        self.execution_dto(execution, &assignment, &template).await
    }

    /// Tells the sector's reviewers that an execution waits for them
    async fn notify_reviewers(&self, actor: &UserModel, sector_id: i32, template_name: &str, execution_id: i32) {
        let reviewers = UserRepository::new(self.db)
            .active_ids_in_sector_with_tiers(
                sector_id,
                vec![Hierarchy::Supervisor, Hierarchy::Administrativo, Hierarchy::Superadmin],
            )
            .await;

        let reviewers: Vec<i32> = match reviewers {
            Ok(ids) => ids.into_iter().filter(|id| *id != actor.id).collect(),
            Err(e) => {
                tracing::error!(execution_id, "Failed to resolve checklist reviewers: {}", e);

                return;
            }
        };

        let message = NotificationMessage::new(
            NotificationType::Task,
            "Checklist aguardando aprovação",
            format!("{} {} concluiu {}", actor.first_name, actor.last_name, template_name),
        )
        .with_url("/checklists/approvals/")
        .created_by(actor.id);

        self.notifier
            .dispatch(self.db, message, Audience::Users(reviewers))
            .await;
    }
}
