mod approval;

use std::path::Path;

use chamados_test_utils::prelude::*;
use entity::sea_orm_active_enums::{ActionType, ExecutionStatus};

use super::*;
use crate::server::{
    data::audit::AuditRepository,
    service::checklist::workflow::{EvidenceUpload, TaskSubmission},
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn completed(task_id: i32, notes: &str) -> TaskSubmission {
    TaskSubmission {
        task_id,
        is_completed: true,
        notes: notes.to_string(),
        ..Default::default()
    }
}

fn photo() -> EvidenceUpload {
    EvidenceUpload {
        file_name: "shelf.jpg".to_string(),
        bytes: vec![0xff, 0xd8, 0xff],
    }
}

/// Number of regular files below `dir`
fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}
