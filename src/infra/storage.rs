//! Local file storage for uploaded mapping documents.
//!
//! Files live under `<upload_root>/<project_id>/`. Stored names get a
//! random prefix so repeated uploads of the same filename never collide.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn project_dir(&self, project_id: Uuid) -> PathBuf {
        self.root.join(project_id.to_string())
    }

    /// Writes the file and returns its path relative to the storage root.
    pub async fn save(
        &self,
        project_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        let dir = self.project_dir(project_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("create upload dir: {}", e)))?;

        // Strip any path components a client may have smuggled in
        let safe_name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation("invalid filename"))?;
        let stored_name = format!("{}_{}", Uuid::new_v4(), safe_name);

        let path = dir.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("write upload: {}", e)))?;

        Ok(format!("{}/{}", project_id, stored_name))
    }

    pub fn absolute(&self, stored_path: &str) -> PathBuf {
        self.root.join(stored_path)
    }

    pub async fn read(&self, stored_path: &str) -> AppResult<Vec<u8>> {
        tokio::fs::read(self.absolute(stored_path))
            .await
            .map_err(|e| AppError::internal(format!("read upload: {}", e)))
    }

    pub async fn delete(&self, stored_path: &str) -> AppResult<()> {
        tokio::fs::remove_file(self.absolute(stored_path))
            .await
            .map_err(|e| AppError::internal(format!("delete upload: {}", e)))
    }

    /// Best-effort removal of a project's directory tree.
    pub async fn remove_project_dir(&self, project_id: Uuid) {
        let dir = self.project_dir(project_id);
        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(%project_id, error = %e, "failed to remove upload directory");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DocumentStorage::new(dir.path());
        let project = Uuid::new_v4();

        let stored = storage
            .save(project, "../../etc/passwd", b"data")
            .await
            .unwrap();

        assert!(stored.starts_with(&project.to_string()));
        assert!(stored.ends_with("passwd"));
        assert!(!stored.contains(".."));
        assert_eq!(storage.read(&stored).await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn remove_project_dir_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DocumentStorage::new(dir.path());
        let project = Uuid::new_v4();

        let stored = storage.save(project, "a.txt", b"x").await.unwrap();
        storage.remove_project_dir(project).await;

        assert!(storage.read(&stored).await.is_err());
    }
}
