//! Filesystem storage for uploaded evidence files.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Uploaded media rooted at a directory, addressed by paths relative to that root.
#[derive(Clone, Debug)]
pub struct MediaStore {
    root: Arc<PathBuf>,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to `<root>/<dir>/<uuid>.<ext>` and returns the relative path.
    ///
    /// The extension is taken from `original_name` when it is short and alphanumeric,
    /// otherwise the file is stored without one.
    pub async fn save(
        &self,
        dir: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, std::io::Error> {
        let file_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let relative = format!("{}/{}", dir.trim_matches('/'), file_name);

        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        Ok(relative)
    }

    /// Removes a stored file, ignoring files that are already gone.
    pub async fn remove(&self, relative: &str) -> Result<(), std::io::Error> {
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }

    /// Public URL a stored file is served under.
    pub fn url(relative: &str) -> String {
        format!("/media/{}", relative)
    }
}

fn sanitized_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;

    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}
