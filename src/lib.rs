//! # Sprintboard Core
//!
//! Board and sprint analytics for agile project tracking.
//!
//! This crate provides pure, synchronous computations over snapshots of
//! issues, boards and sprints: grouping, statistics, relative ordering for
//! drag-and-drop, burndown series, validation of proposed edits and
//! display-ready view-models. Persistence and transport stay with the caller;
//! the engines only compute what a change should be.

pub mod analytics;
pub mod config;
pub mod domain;
pub mod error;
pub mod snapshot;

// Re-export commonly used types
pub use analytics::{
    board_stats, completion_percentage, generate_burndown, group_by, move_issue, reorder,
    sprint_stats, validate_board, validate_sprint, Burndown, GroupDimension, PresentationFormatter,
    ReorderPlan, Scope, ValidationReport,
};
pub use config::EngineConfig;
pub use domain::{
    board::{Board, BoardType},
    issue::{Issue, IssueId, IssueStatus, Priority},
    sprint::{Sprint, SprintStatus},
};
pub use error::{Result, SprintboardError};
pub use snapshot::{Snapshot, SnapshotSource};
