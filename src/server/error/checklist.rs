use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entity::sea_orm_active_enums::ExecutionStatus;
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("Checklist template ID {0} not found")]
    TemplateNotFound(i32),
    #[error("Checklist assignment ID {0} not found")]
    AssignmentNotFound(i32),
    #[error("Checklist execution ID {0} not found")]
    ExecutionNotFound(i32),
    #[error("A checklist template needs at least one task")]
    NoTasks,
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    /// A task flagged complete has neither notes nor any image or video evidence.
    #[error("Task \"{task_title}\" is marked as completed but has no notes or evidence")]
    MissingEvidence { task_id: i32, task_title: String },
    #[error("Task ID {0} does not belong to this execution")]
    UnknownTask(i32),
    #[error("Only the assigned user can submit this checklist")]
    NotExecutor,
    #[error("Cannot move checklist execution from {from:?} to {to:?}")]
    InvalidTransition {
        from: ExecutionStatus,
        to: ExecutionStatus,
    },
    #[error("You cannot approve or reject a checklist you executed")]
    SelfApproval,
    #[error("You are not allowed to approve checklists of this sector")]
    NotApprover,
    #[error("Invalid evidence upload: {0}")]
    InvalidUpload(String),
}

impl IntoResponse for ChecklistError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::TemplateNotFound(_) | Self::AssignmentNotFound(_) | Self::ExecutionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::NotExecutor | Self::SelfApproval | Self::NotApprover => StatusCode::FORBIDDEN,
            Self::NoTasks
            | Self::InvalidSchedule(_)
            | Self::MissingEvidence { .. }
            | Self::UnknownTask(_)
            | Self::InvalidTransition { .. }
            | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        };

        tracing::debug!("{}", self);

        error_response(status, self.to_string())
    }
}
