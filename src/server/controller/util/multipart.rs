//! Decoding of the checklist submission form.

use std::collections::BTreeMap;

use axum::extract::Multipart;

use crate::server::{
    error::Error,
    service::checklist::workflow::{EvidenceUpload, TaskSubmission},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskField {
    Completed,
    Notes,
    Image,
    Video,
}

/// Splits `task_12`, `notes_12`, `evidence_image_12` and `evidence_video_12` into kind and task ID
fn parse_field_name(name: &str) -> Option<(TaskField, i32)> {
    let (kind, id) = if let Some(id) = name.strip_prefix("evidence_image_") {
        (TaskField::Image, id)
    } else if let Some(id) = name.strip_prefix("evidence_video_") {
        (TaskField::Video, id)
    } else if let Some(id) = name.strip_prefix("notes_") {
        (TaskField::Notes, id)
    } else if let Some(id) = name.strip_prefix("task_") {
        (TaskField::Completed, id)
    } else {
        return None;
    };

    id.parse().ok().map(|id| (kind, id))
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

/// Reads every task field of a submission form, ordered by task ID.
///
/// Unknown fields are skipped and empty file parts count as no upload.
pub async fn read_task_submissions(mut multipart: Multipart) -> Result<Vec<TaskSubmission>, Error> {
    let mut submissions: BTreeMap<i32, TaskSubmission> = BTreeMap::new();

    while let Some(field) = multipart.next_field().await? {
        let Some((kind, task_id)) = field.name().and_then(parse_field_name) else {
            continue;
        };
        let file_name = field.file_name().unwrap_or_default().to_string();

        let entry = submissions.entry(task_id).or_insert_with(|| TaskSubmission {
            task_id,
            ..Default::default()
        });

        match kind {
            TaskField::Completed => entry.is_completed = is_checked(&field.text().await?),
            TaskField::Notes => entry.notes = field.text().await?,
            TaskField::Image | TaskField::Video => {
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }

                let upload = Some(EvidenceUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
                if kind == TaskField::Image {
                    entry.image = upload;
                } else {
                    entry.video = upload;
                }
            }
        }
    }

    Ok(submissions.into_values().collect())
}
