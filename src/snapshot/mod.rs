use crate::{
    analytics::validation::{MAX_BOARD_NAME_LEN, MAX_SPRINT_CAPACITY, MAX_SPRINT_NAME_LEN},
    domain::{Board, Issue, IssueStatus, Sprint, SprintId},
    error::{Result, SprintboardError},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub mod file_source;

pub use file_source::FileSnapshotSource;

pub const MAX_ISSUE_TITLE_LEN: usize = 500;

/// Point-in-time view of the records the engines operate on, as fetched
/// from the external store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<Sprint>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Snapshot {
    /// Checks the record invariants the engines rely on. Run once where
    /// external data enters the crate.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut column_orders: HashMap<IssueStatus, Vec<f64>> = HashMap::new();
        let mut backlog_orders: HashMap<Option<&SprintId>, Vec<f64>> = HashMap::new();

        for issue in &self.issues {
            if !ids.insert(&issue.id) {
                return Err(invalid(format!("duplicate issue id {}", issue.id)));
            }
            let title = issue.title.trim();
            if title.is_empty() {
                return Err(invalid(format!("issue {} has an empty title", issue.id)));
            }
            if title.chars().count() > MAX_ISSUE_TITLE_LEN {
                return Err(invalid(format!(
                    "issue {} title exceeds {} characters",
                    issue.id, MAX_ISSUE_TITLE_LEN
                )));
            }
            if !issue.order.is_finite() {
                return Err(invalid(format!("issue {} has a non-finite order", issue.id)));
            }
            column_orders.entry(issue.status).or_default().push(issue.order);
            backlog_orders
                .entry(issue.sprint_id.as_ref())
                .or_default()
                .push(issue.order);
        }

        for (status, orders) in column_orders {
            if !all_distinct(orders) {
                return Err(invalid(format!(
                    "order values in column {} are not unique",
                    status
                )));
            }
        }
        for (sprint_id, orders) in backlog_orders {
            if !all_distinct(orders) {
                let backlog = match sprint_id {
                    Some(id) => format!("sprint {}", id),
                    None => "the product backlog".to_string(),
                };
                return Err(invalid(format!("order values in {} are not unique", backlog)));
            }
        }

        if let Some(board) = &self.board {
            let name = board.name.trim();
            if name.is_empty() || name.chars().count() > MAX_BOARD_NAME_LEN {
                return Err(invalid(format!("board {} has an invalid name", board.id)));
            }
        }

        if let Some(sprint) = &self.sprint {
            let name = sprint.name.trim();
            if name.is_empty() || name.chars().count() > MAX_SPRINT_NAME_LEN {
                return Err(invalid(format!("sprint {} has an invalid name", sprint.id)));
            }
            if let (Some(start), Some(end)) = (sprint.start_date, sprint.end_date) {
                if start > end {
                    return Err(invalid(format!("sprint {} ends before it starts", sprint.id)));
                }
            }
            if sprint
                .capacity_story_points
                .map_or(false, |capacity| i64::from(capacity) > MAX_SPRINT_CAPACITY)
            {
                return Err(invalid(format!(
                    "sprint {} capacity exceeds {} story points",
                    sprint.id, MAX_SPRINT_CAPACITY
                )));
            }
        }

        Ok(())
    }
}

fn all_distinct(mut orders: Vec<f64>) -> bool {
    orders.sort_by(f64::total_cmp);
    orders.windows(2).all(|w| w[0] != w[1])
}

fn invalid(message: String) -> SprintboardError {
    SprintboardError::InvalidSnapshot(message)
}

/// Source of snapshots, implemented by whatever fronts the external store
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches and validates the current snapshot
    async fn fetch(&self) -> Result<Snapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_valid_snapshot() {
        let snapshot = Snapshot {
            issues: vec![
                Issue::new("1", "A").with_order(1.0),
                Issue::new("2", "B").with_order(2.0),
                Issue::new("3", "C").with_status(IssueStatus::Done).with_order(3.0),
                Issue::new("4", "D")
                    .with_sprint("s1")
                    .with_status(IssueStatus::InProgress)
                    .with_order(1.0),
                Issue::new("5", "E")
                    .with_sprint("s2")
                    .with_status(IssueStatus::Blocked)
                    .with_order(1.0),
            ],
            ..Default::default()
        };

        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let snapshot = Snapshot {
            issues: vec![Issue::new("1", "A").with_order(1.0), Issue::new("1", "B").with_order(2.0)],
            ..Default::default()
        };

        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate issue id 1"));
    }

    #[test]
    fn test_blank_title_rejected() {
        let snapshot = Snapshot {
            issues: vec![Issue::new("1", "  ")],
            ..Default::default()
        };

        assert!(matches!(snapshot.validate(), Err(SprintboardError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_duplicate_column_order_rejected() {
        let snapshot = Snapshot {
            issues: vec![Issue::new("1", "A").with_order(1.0), Issue::new("2", "B").with_order(1.0)],
            ..Default::default()
        };

        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("To Do"));
    }

    #[test]
    fn test_duplicate_sprint_backlog_order_rejected() {
        let snapshot = Snapshot {
            issues: vec![
                Issue::new("1", "A").with_sprint("s1").with_order(1.0),
                Issue::new("2", "B")
                    .with_sprint("s1")
                    .with_status(IssueStatus::InProgress)
                    .with_order(1.0),
            ],
            ..Default::default()
        };

        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("sprint s1"));

        let snapshot = Snapshot {
            issues: vec![
                Issue::new("1", "A").with_order(1.0),
                Issue::new("2", "B").with_status(IssueStatus::Done).with_order(1.0),
            ],
            ..Default::default()
        };

        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("product backlog"));
    }

    #[test]
    fn test_inverted_sprint_dates_rejected() {
        let now = Utc::now();
        let snapshot = Snapshot {
            sprint: Some(Sprint::new("s1", "Sprint 1").with_dates(now, now - Duration::days(1))),
            ..Default::default()
        };

        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_sprint_capacity_limit() {
        let snapshot = Snapshot {
            sprint: Some(Sprint::new("s1", "Sprint 1").with_capacity(1001)),
            ..Default::default()
        };

        assert!(snapshot.validate().is_err());
    }
}
