//! Execution status transitions and the evidence rule for submissions.

use std::collections::HashMap;

use entity::sea_orm_active_enums::{ExecutionStatus, Hierarchy};

use crate::server::{
    error::checklist::ChecklistError,
    model::{
        db::{TaskExecutionModel, TaskModel, UserModel},
        permission::UserPermissions,
    },
};

/// Forward-only lifecycle of a checklist execution.
///
/// `AwaitingApproval -> Pending` is the rejection edge, every other move goes forward.
pub trait ExecutionTransitions {
    fn can_transition_to(&self, next: ExecutionStatus) -> bool;
}

impl ExecutionTransitions for ExecutionStatus {
    fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        use ExecutionStatus::*;

        matches!(
            (self, next),
            (Pending, Submitted)
                | (Pending, AwaitingApproval)
                | (Submitted, Submitted)
                | (Submitted, AwaitingApproval)
                | (AwaitingApproval, Approved)
                | (AwaitingApproval, Pending)
        )
    }
}

/// Whether `actor` may review executions of templates in `sector_id`.
///
/// ADMINISTRATIVO and above review every sector, SUPERVISOR only their own.
pub fn can_review_sector(actor: &UserModel, sector_id: i32) -> bool {
    actor.is_at_least(Hierarchy::Administrativo)
        || (actor.is_at_least(Hierarchy::Supervisor) && actor.sector_id == Some(sector_id))
}

/// Submitted values for one task, before anything is stored.
#[derive(Debug, Default)]
pub struct TaskSubmission {
    pub task_id: i32,
    pub is_completed: bool,
    pub notes: String,
    pub image: Option<EvidenceUpload>,
    pub video: Option<EvidenceUpload>,
}

#[derive(Debug)]
pub struct EvidenceUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Checks the evidence rule for every task flagged complete.
///
/// Evidence attached by an earlier submission counts. Tasks are checked in template order
/// and the first violation is returned. Submissions naming a task outside the execution
/// are rejected.
pub fn validate_submission(
    task_executions: &[TaskExecutionModel],
    tasks: &HashMap<i32, TaskModel>,
    submissions: &[TaskSubmission],
) -> Result<(), ChecklistError> {
    if let Some(unknown) = submissions
        .iter()
        .find(|submission| !task_executions.iter().any(|te| te.task_id == submission.task_id))
    {
        return Err(ChecklistError::UnknownTask(unknown.task_id));
    }

    let mut ordered: Vec<&TaskExecutionModel> = task_executions.iter().collect();
    ordered.sort_by_key(|te| tasks.get(&te.task_id).map(|task| task.sort_order).unwrap_or(i32::MAX));

    for task_execution in ordered {
        let Some(submission) = submissions
            .iter()
            .find(|submission| submission.task_id == task_execution.task_id)
        else {
            continue;
        };
        if !submission.is_completed {
            continue;
        }

        let has_notes = !submission.notes.trim().is_empty();
        let has_new_evidence = submission.image.is_some() || submission.video.is_some();
        let has_prior_evidence =
            task_execution.evidence_image.is_some() || task_execution.evidence_video.is_some();

        if !(has_notes || has_new_evidence || has_prior_evidence) {
            return Err(ChecklistError::MissingEvidence {
                task_id: task_execution.task_id,
                task_title: tasks
                    .get(&task_execution.task_id)
                    .map(|task| task.title.clone())
                    .unwrap_or_default(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use entity::sea_orm_active_enums::ExecutionStatus;

    use super::*;

    fn task(id: i32, title: &str, sort_order: i32) -> TaskModel {
        TaskModel {
            id,
            template_id: 1,
            title: title.to_string(),
            description: String::new(),
            sort_order,
            is_required: true,
        }
    }

    fn task_execution(id: i32, task_id: i32) -> TaskExecutionModel {
        TaskExecutionModel {
            id,
            execution_id: 1,
            task_id,
            is_completed: false,
            completed_at: None,
            notes: String::new(),
            evidence_image: None,
            evidence_video: None,
        }
    }

    fn completed(task_id: i32, notes: &str) -> TaskSubmission {
        TaskSubmission {
            task_id,
            is_completed: true,
            notes: notes.to_string(),
            ..Default::default()
        }
    }

    fn fixtures() -> (Vec<TaskExecutionModel>, HashMap<i32, TaskModel>) {
        let tasks = HashMap::from([(10, task(10, "Open doors", 0)), (11, task(11, "Count cash", 1))]);

        (vec![task_execution(1, 10), task_execution(2, 11)], tasks)
    }

    /// Expect statuses to move forward only, with rejection as the single way back
    #[test]
    fn transitions_are_forward_only() {
        use ExecutionStatus::*;

        assert!(Pending.can_transition_to(Submitted));
        assert!(Pending.can_transition_to(AwaitingApproval));
        assert!(Submitted.can_transition_to(AwaitingApproval));
        assert!(AwaitingApproval.can_transition_to(Approved));
        assert!(AwaitingApproval.can_transition_to(Pending));

        assert!(!Pending.can_transition_to(Approved));
        assert!(!Submitted.can_transition_to(Approved));
        assert!(!AwaitingApproval.can_transition_to(Submitted));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(AwaitingApproval));
    }

    /// Expect notes alone to satisfy the evidence rule
    #[test]
    fn notes_satisfy_rule() {
        let (task_executions, tasks) = fixtures();

        let result = validate_submission(&task_executions, &tasks, &[completed(10, "All good")]);

        assert!(result.is_ok());
    }

    /// Expect a completed task without notes or evidence to be named in the error
    #[test]
    fn missing_evidence_names_task() {
        let (task_executions, tasks) = fixtures();

        let result = validate_submission(
            &task_executions,
            &tasks,
            &[completed(10, "Done"), completed(11, "   ")],
        );

        assert!(matches!(
            result,
            Err(ChecklistError::MissingEvidence { task_id: 11, ref task_title }) if task_title == "Count cash"
        ));
    }

    /// Expect a new upload or previously attached evidence to satisfy the rule
    #[test]
    fn evidence_satisfies_rule() {
        let (mut task_executions, tasks) = fixtures();
        task_executions[1].evidence_video = Some("checklists/videos/a.mp4".to_string());

        let mut with_image = completed(10, "");
        with_image.image = Some(EvidenceUpload {
            file_name: "a.jpg".to_string(),
            bytes: vec![1, 2, 3],
        });

        let result = validate_submission(&task_executions, &tasks, &[with_image, completed(11, "")]);

        assert!(result.is_ok());
    }

    /// Expect unchecked tasks to be exempt and foreign tasks to be rejected
    #[test]
    fn unchecked_and_unknown_tasks() {
        let (task_executions, tasks) = fixtures();

        let unchecked = TaskSubmission {
            task_id: 10,
            ..Default::default()
        };
        assert!(validate_submission(&task_executions, &tasks, &[unchecked]).is_ok());

        assert!(matches!(
            validate_submission(&task_executions, &tasks, &[completed(99, "notes")]),
            Err(ChecklistError::UnknownTask(99))
        ));
    }
}
