use crate::analytics::presentation::format_with;
use crate::analytics::statistics::{sprint_issues, sum_points};
use crate::config::FormatConfig;
use crate::domain::issue::Issue;
use crate::domain::sprint::Sprint;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Where the actual line of a burndown came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BurndownSource {
    /// The sprint lacks a usable date range; all series are empty
    Undated,
    /// Derived day by day from issue completion timestamps
    CompletionHistory,
    /// Placeholder: some completed issue carries no completion timestamp, so
    /// every day reports the sprint's current remaining points
    CurrentRemaining,
}

/// Day-by-day remaining work for a sprint. All three series share the same
/// length and index: entry `d` is calendar day `d` counted from the start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Burndown {
    pub labels: Vec<String>,
    pub ideal_line: Vec<f64>,
    pub actual_line: Vec<u32>,
    pub source: BurndownSource,
}

impl Burndown {
    fn undated() -> Self {
        Self {
            labels: Vec::new(),
            ideal_line: Vec::new(),
            actual_line: Vec::new(),
            source: BurndownSource::Undated,
        }
    }

    /// True when the actual line is not real history
    pub fn is_degraded(&self) -> bool {
        self.source == BurndownSource::CurrentRemaining
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn generate_burndown(sprint: &Sprint, issues: &[Issue]) -> Burndown {
    generate_burndown_with(&FormatConfig::default(), sprint, issues)
}

/// Builds ideal and actual burndown series over `total_days + 1` days.
///
/// The ideal line decays linearly from the sprint's total story points to
/// zero; a zero-day sprint yields the single point `0`. Sprints without
/// both dates (or with an end before the start) produce empty series.
pub fn generate_burndown_with(format: &FormatConfig, sprint: &Sprint, issues: &[Issue]) -> Burndown {
    let (Some(start), Some(total_days)) = (sprint.start_date, sprint.total_days()) else {
        return Burndown::undated();
    };

    let members: Vec<&Issue> = sprint_issues(sprint, issues).collect();
    let total = sum_points(members.iter().copied());

    let days = 0..=total_days;
    let labels = days
        .clone()
        .map(|d| format_with(&(start + Duration::days(d)), &format.label_format))
        .collect();

    let ideal_line = days
        .clone()
        .map(|d| {
            if total_days == 0 {
                0.0
            } else {
                (total as f64 * (1.0 - d as f64 / total_days as f64)).max(0.0)
            }
        })
        .collect();

    let has_history = members
        .iter()
        .filter(|issue| issue.is_done())
        .all(|issue| issue.completed_at.is_some());

    let (actual_line, source) = if has_history {
        let line = days
            .map(|d| {
                let cutoff = start + Duration::days(d + 1);
                let burned = sum_points(
                    members
                        .iter()
                        .copied()
                        .filter(|issue| issue.is_done())
                        .filter(|issue| issue.completed_at.map_or(false, |at| at < cutoff)),
                );
                total.saturating_sub(burned)
            })
            .collect();
        (line, BurndownSource::CompletionHistory)
    } else {
        let remaining = sum_points(members.iter().copied().filter(|issue| !issue.is_done()));
        tracing::warn!(
            "Sprint {} has completed issues without completion timestamps; burndown actual line is a flat placeholder of {} points",
            sprint.id,
            remaining
        );
        (
            vec![remaining; (total_days + 1) as usize],
            BurndownSource::CurrentRemaining,
        )
    };

    Burndown {
        labels,
        ideal_line,
        actual_line,
        source,
    }
}
