//! Checklist template, assignment and execution repositories.

pub mod assignment;
pub mod execution;
pub mod template;

pub use assignment::{AssignmentRepository, NewAssignment};
pub use execution::{ExecutionRepository, TaskExecutionUpdate};
pub use template::TemplateRepository;
