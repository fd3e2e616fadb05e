use crate::domain::issue::IssueStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

opaque_id!(
    /// Unique identifier for a board
    BoardId,
    "board"
);

/// Board flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    Kanban,
    Scrum,
}

impl Default for BoardType {
    fn default() -> Self {
        Self::Kanban
    }
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kanban => write!(f, "Kanban"),
            Self::Scrum => write!(f, "Scrum"),
        }
    }
}

/// A named workspace whose issues are laid out in status columns.
///
/// The board refers to issues only through their status; the issues
/// themselves live in the external store and reach the engines as a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub board_type: BoardType,
    /// Status columns in display order
    #[serde(default = "Board::default_columns")]
    pub columns: Vec<IssueStatus>,
}

impl Board {
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>, board_type: BoardType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            board_type,
            columns: Self::default_columns(),
        }
    }

    pub fn default_columns() -> Vec<IssueStatus> {
        vec![
            IssueStatus::ToDo,
            IssueStatus::InProgress,
            IssueStatus::Blocked,
            IssueStatus::Done,
        ]
    }

    pub fn with_columns(mut self, columns: Vec<IssueStatus>) -> Self {
        self.columns = columns;
        self
    }

    /// Gets the display position of the column for a status
    pub fn column_index(&self, status: IssueStatus) -> Option<usize> {
        self.columns.iter().position(|col| *col == status)
    }

    pub fn has_column(&self, status: IssueStatus) -> bool {
        self.column_index(status).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new("b1", "Platform", BoardType::Scrum);
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.column_index(IssueStatus::ToDo), Some(0));
        assert_eq!(board.column_index(IssueStatus::Done), Some(3));
    }

    #[test]
    fn test_custom_columns() {
        let board = Board::new("b1", "Platform", BoardType::Kanban)
            .with_columns(vec![IssueStatus::ToDo, IssueStatus::Done]);

        assert!(board.has_column(IssueStatus::Done));
        assert!(!board.has_column(IssueStatus::Blocked));
    }

    #[test]
    fn test_board_deserialization_defaults_columns() {
        let json = r#"{"id": "b1", "name": "Platform", "type": "scrum"}"#;
        let board: Board = serde_json::from_str(json).unwrap();

        assert_eq!(board.board_type, BoardType::Scrum);
        assert_eq!(board.columns, Board::default_columns());
        assert!(board.description.is_none());
    }
}
