//! Display strings and view-models built from the other engines' outputs.

use crate::analytics::grouping::{group_by, GroupDimension, GroupKey};
use crate::analytics::statistics::{
    board_stats, completion_percentage, rounded_percentage, sprint_stats, sum_points, BoardStats,
    SprintStats,
};
use crate::config::FormatConfig;
use crate::domain::board::{Board, BoardId};
use crate::domain::issue::{Issue, IssueId, IssueStatus};
use crate::domain::sprint::{Sprint, SprintId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const NOT_SET: &str = "Not set";
const SECONDS_PER_DAY: i64 = 86_400;

/// Formats a timestamp with a strftime pattern, falling back to an ISO
/// date if the pattern cannot be rendered
pub(crate) fn format_with(date: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintSummary {
    pub sprint_id: SprintId,
    pub name: String,
    pub status: String,
    pub goal: Option<String>,
    pub date_range: String,
    pub days_remaining: Option<i64>,
    pub stats: SprintStats,
    /// Committed story points as a share of capacity, when capacity is set
    pub capacity_utilization: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub status: IssueStatus,
    pub title: String,
    pub issue_count: usize,
    pub story_points: u32,
    /// Column issues listed by order value
    pub issue_ids: Vec<IssueId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOverview {
    pub board_id: BoardId,
    pub name: String,
    pub board_type: String,
    pub stats: BoardStats,
    pub completion_percentage: u32,
    pub columns: Vec<ColumnView>,
    /// Issues whose status has no column on this board
    pub unplaced_issues: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PresentationFormatter {
    config: FormatConfig,
}

impl PresentationFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn format_date(&self, date: Option<DateTime<Utc>>) -> String {
        date.map_or_else(
            || NOT_SET.to_string(),
            |d| format_with(&d, &self.config.date_format),
        )
    }

    pub fn format_date_time(&self, date: Option<DateTime<Utc>>) -> String {
        date.map_or_else(
            || NOT_SET.to_string(),
            |d| format_with(&d, &self.config.date_time_format),
        )
    }

    /// Human-friendly distance between `date` and `now`, such as
    /// "3 hours ago" or "in 2 days". Beyond 30 days the plain date is shown.
    pub fn format_relative(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let seconds = (now - date).num_seconds();
        let future = seconds < 0;
        let magnitude = seconds.abs();

        let (count, unit) = match magnitude {
            s if s < 60 => return "just now".to_string(),
            s if s < 3_600 => (s / 60, "minute"),
            s if s < SECONDS_PER_DAY => (s / 3_600, "hour"),
            s if s < 2 * SECONDS_PER_DAY => {
                let word = if future { "tomorrow" } else { "yesterday" };
                return word.to_string();
            }
            s if s <= 30 * SECONDS_PER_DAY => (s / SECONDS_PER_DAY, "day"),
            _ => return self.format_date(Some(date)),
        };

        let plural = if count == 1 { "" } else { "s" };
        if future {
            format!("in {} {}{}", count, unit, plural)
        } else {
            format!("{} {}{} ago", count, unit, plural)
        }
    }

    pub fn sprint_date_range(&self, sprint: &Sprint) -> String {
        match (sprint.start_date, sprint.end_date) {
            (Some(start), Some(end)) => format!(
                "{} - {}",
                self.format_date(Some(start)),
                self.format_date(Some(end))
            ),
            (Some(start), None) => format!("From {}", self.format_date(Some(start))),
            (None, Some(end)) => format!("Until {}", self.format_date(Some(end))),
            (None, None) => "Dates not set".to_string(),
        }
    }

    /// Whole days left until the sprint ends, rounded up; 0 once it has ended
    pub fn days_remaining(&self, sprint: &Sprint, now: DateTime<Utc>) -> Option<i64> {
        let seconds = (sprint.end_date? - now).num_seconds();
        if seconds <= 0 {
            return Some(0);
        }
        Some((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
    }

    pub fn sprint_summary(&self, sprint: &Sprint, issues: &[Issue], now: DateTime<Utc>) -> SprintSummary {
        let stats = sprint_stats(sprint, issues);
        let capacity_utilization = sprint
            .capacity_story_points
            .filter(|capacity| *capacity > 0)
            .map(|capacity| rounded_percentage(stats.total_story_points as u64, capacity as u64));

        SprintSummary {
            sprint_id: sprint.id.clone(),
            name: sprint.name.clone(),
            status: sprint.status.to_string(),
            goal: sprint.goal.clone(),
            date_range: self.sprint_date_range(sprint),
            days_remaining: self.days_remaining(sprint, now),
            stats,
            capacity_utilization,
        }
    }

    /// Lays the board's issues out in its columns, in display order. Columns
    /// without issues are still listed.
    pub fn board_overview(&self, board: &Board, issues: &[Issue]) -> BoardOverview {
        let mut groups = group_by(issues, GroupDimension::Status);

        let columns = board
            .columns
            .iter()
            .map(|status| {
                let mut members = groups
                    .remove(&GroupKey::Status(*status))
                    .unwrap_or_default();
                members.sort_by(|a, b| a.order.total_cmp(&b.order));
                ColumnView {
                    status: *status,
                    title: status.to_string(),
                    issue_count: members.len(),
                    story_points: sum_points(members.iter().copied()),
                    issue_ids: members.iter().map(|issue| issue.id.clone()).collect(),
                }
            })
            .collect();

        BoardOverview {
            board_id: board.id.clone(),
            name: board.name.clone(),
            board_type: board.board_type.to_string(),
            stats: board_stats(issues),
            completion_percentage: completion_percentage(issues),
            columns,
            unplaced_issues: groups.values().map(Vec::len).sum(),
        }
    }
}
