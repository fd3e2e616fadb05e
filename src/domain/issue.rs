use crate::domain::sprint::SprintId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

opaque_id!(
    /// Unique identifier for an issue
    IssueId,
    "issue"
);

opaque_id!(
    /// Identifier of a user an issue can be assigned to
    UserId,
    "user"
);

/// Status of an issue, which doubles as its board column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum IssueStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "Blocked")]
    Blocked,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [Self::ToDo, Self::InProgress, Self::Done, Self::Blocked];

    /// Position in the logical workflow: To Do → In Progress → Blocked → Done
    pub fn workflow_rank(&self) -> u8 {
        match self {
            Self::ToDo => 0,
            Self::InProgress => 1,
            Self::Blocked => 2,
            Self::Done => 3,
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToDo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
            Self::Blocked => write!(f, "Blocked"),
        }
    }
}

impl FromStr for IssueStatus {
    type Err = crate::error::SprintboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "todo" => Ok(Self::ToDo),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "blocked" => Ok(Self::Blocked),
            _ => Err(crate::error::SprintboardError::InvalidStatus(s.to_string())),
        }
    }
}

/// Issue priority, P1 being the most urgent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::P1, Self::P2, Self::P3, Self::P4];

    pub fn label(&self) -> &'static str {
        match self {
            Self::P1 => "Highest",
            Self::P2 => "High",
            Self::P3 => "Medium",
            Self::P4 => "Low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::P3
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
            Self::P3 => write!(f, "P3"),
            Self::P4 => write!(f, "P4"),
        }
    }
}

/// The user an issue is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: UserId,
    pub display_name: String,
}

impl Assignee {
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// An issue as seen by the engines: a read-only snapshot of the external record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub status: IssueStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<SprintId>,
    #[serde(default)]
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When the issue reached Done; the burndown history is derived from it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Creates a new To Do issue with the given ID and title
    pub fn new(id: impl Into<IssueId>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            status: IssueStatus::ToDo,
            priority: Priority::default(),
            story_points: None,
            assignee: None,
            sprint_id: None,
            order: 0.0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub fn with_sprint(mut self, sprint_id: impl Into<SprintId>) -> Self {
        self.sprint_id = Some(sprint_id.into());
        self
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.order = order;
        self
    }

    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == IssueStatus::Done
    }

    /// Story points with an absent estimate counted as zero
    pub fn points(&self) -> u32 {
        self.story_points.unwrap_or(0)
    }

    /// Changes the status, stamping or clearing `completed_at` as the issue
    /// enters or leaves Done
    pub fn set_status(&mut self, status: IssueStatus, at: DateTime<Utc>) {
        if status == self.status {
            return;
        }
        self.completed_at = match status {
            IssueStatus::Done => Some(at),
            _ => None,
        };
        self.status = status;
        self.updated_at = at;
    }

    pub fn set_sprint(&mut self, sprint_id: Option<SprintId>, at: DateTime<Utc>) {
        self.sprint_id = sprint_id;
        self.updated_at = at;
    }
}
