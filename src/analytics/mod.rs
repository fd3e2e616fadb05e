pub mod burndown;
pub mod grouping;
pub mod ordering;
pub mod presentation;
pub mod statistics;
pub mod validation;

pub use burndown::{generate_burndown, generate_burndown_with, Burndown, BurndownSource};
pub use grouping::{group_by, GroupDimension, GroupKey, UNASSIGNED_KEY};
pub use ordering::{
    move_issue, move_issue_with, renormalize, reorder, reorder_with, scope_sequence, OrderUpdate,
    ReorderPlan, Reparent, Scope, ScopeChange,
};
pub use presentation::{BoardOverview, ColumnView, PresentationFormatter, SprintSummary};
pub use statistics::{
    board_stats, completion_percentage, sprint_issues, sprint_stats, BoardStats, SprintStats,
};
pub use validation::{validate_board, validate_sprint, BoardDraft, SprintDraft, ValidationReport};
