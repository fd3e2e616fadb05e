use crate::{
    error::{Result, SprintboardError},
    snapshot::{Snapshot, SnapshotSource},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads snapshots from a JSON file, e.g. an export of the external store
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a snapshot to the file, creating parent directories as needed
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            return Err(SprintboardError::SnapshotNotFound(
                self.path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        snapshot.validate()?;

        tracing::debug!(
            "Loaded snapshot from {} with {} issues",
            self.path.display(),
            snapshot.issues.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, BoardType, Issue, IssueStatus, Sprint};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_snapshot_save_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileSnapshotSource::new(temp_dir.path().join("exports/snapshot.json"));

        let snapshot = Snapshot {
            board: Some(Board::new("b1", "Platform", BoardType::Scrum)),
            sprint: Some(Sprint::new("s1", "Sprint 1")),
            issues: vec![
                Issue::new("1", "Login page").with_sprint("s1").with_story_points(3),
                Issue::new("2", "Logout")
                    .with_status(IssueStatus::Done)
                    .with_order(1.0),
            ],
        };
        source.save(&snapshot).await.unwrap();

        let loaded = source.fetch().await.unwrap();
        assert_eq!(loaded.issues.len(), 2);
        assert_eq!(loaded.issues[0].story_points, Some(3));
        assert_eq!(loaded.board.unwrap().board_type, BoardType::Scrum);
        assert_eq!(loaded.sprint.unwrap().id.as_str(), "s1");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileSnapshotSource::new(temp_dir.path().join("absent.json"));

        let result = source.fetch().await;
        assert!(matches!(result, Err(SprintboardError::SnapshotNotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        tokio::fs::write(
            &path,
            r#"{"issues": [
                {"id": "1", "title": "", "status": "To Do",
                 "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
            ]}"#,
        )
        .await
        .unwrap();

        let result = FileSnapshotSource::new(&path).fetch().await;
        assert!(matches!(result, Err(SprintboardError::InvalidSnapshot(_))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = FileSnapshotSource::new(&path).fetch().await;
        assert!(matches!(result, Err(SprintboardError::SerializationError(_))));
    }
}
