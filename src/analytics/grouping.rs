use crate::domain::issue::{Issue, IssueStatus, Priority, UserId};
use crate::error::SprintboardError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

/// Key used for issues without an assignee
pub const UNASSIGNED_KEY: &str = "unassigned";

/// Dimension an issue collection can be partitioned by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupDimension {
    Status,
    Priority,
    Assignee,
}

impl FromStr for GroupDimension {
    type Err = SprintboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "assignee" => Ok(Self::Assignee),
            _ => Err(SprintboardError::InvalidDimension(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Status(IssueStatus),
    Priority(Priority),
    Assignee(UserId),
    Unassigned,
}

impl GroupKey {
    pub fn for_issue(issue: &Issue, dimension: GroupDimension) -> Self {
        match dimension {
            GroupDimension::Status => Self::Status(issue.status),
            GroupDimension::Priority => Self::Priority(issue.priority),
            GroupDimension::Assignee => match &issue.assignee {
                Some(assignee) => Self::Assignee(assignee.id.clone()),
                None => Self::Unassigned,
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{}", status),
            Self::Priority(priority) => write!(f, "{}", priority),
            Self::Assignee(id) => write!(f, "{}", id),
            Self::Unassigned => write!(f, "{}", UNASSIGNED_KEY),
        }
    }
}

/// Partitions issues by the given dimension.
///
/// Each issue lands in exactly one group, and issues keep their relative
/// input order within a group. An empty input yields an empty mapping.
pub fn group_by(issues: &[Issue], dimension: GroupDimension) -> BTreeMap<GroupKey, Vec<&Issue>> {
    let mut groups: BTreeMap<GroupKey, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        groups
            .entry(GroupKey::for_issue(issue, dimension))
            .or_default()
            .push(issue);
    }
    groups
}
