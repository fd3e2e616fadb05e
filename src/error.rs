use thiserror::Error;

pub type Result<T> = std::result::Result<T, SprintboardError>;

#[derive(Debug, Error)]
pub enum SprintboardError {
    #[error("Invalid {kind} identifier: {value:?}")]
    InvalidId { kind: &'static str, value: String },

    #[error("Invalid issue status: {0}")]
    InvalidStatus(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Invalid sort field '{0}'. Valid fields: order, title, status, priority, points, created, updated")]
    InvalidSortField(String),

    #[error("Invalid sort order '{0}'. Valid orders: asc, desc")]
    InvalidSortOrder(String),

    #[error("Invalid grouping dimension '{0}'. Valid dimensions: status, priority, assignee")]
    InvalidDimension(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
