use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

opaque_id!(
    /// Unique identifier for a sprint
    SprintId,
    "sprint"
);

/// Lifecycle state of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    Planning,
    Active,
    Completed,
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// A time-boxed subset of issues. Issues reference the sprint through
/// their `sprint_id`; the sprint never owns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: SprintId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_story_points: Option<u32>,
    pub status: SprintStatus,
}

impl Sprint {
    /// Creates a new sprint in planning with no dates
    pub fn new(id: impl Into<SprintId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            goal: None,
            start_date: None,
            end_date: None,
            capacity_story_points: None,
            status: SprintStatus::Planning,
        }
    }

    pub fn with_dates(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_capacity(mut self, points: u32) -> Self {
        self.capacity_story_points = Some(points);
        self
    }

    pub fn with_status(mut self, status: SprintStatus) -> Self {
        self.status = status;
        self
    }

    /// Whole calendar days spanned by the sprint, rounded up.
    ///
    /// Returns `None` when either date is missing or the end precedes the start.
    pub fn total_days(&self) -> Option<i64> {
        let (start, end) = (self.start_date?, self.end_date?);
        let seconds = (end - start).num_seconds();
        if seconds < 0 {
            return None;
        }
        const SECONDS_PER_DAY: i64 = 86_400;
        Some((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
    }
}
