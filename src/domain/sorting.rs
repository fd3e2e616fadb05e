use crate::domain::issue::Issue;
use crate::error::SprintboardError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Order,
    Title,
    Status,
    Priority,
    Points,
    Created,
    Updated,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = SprintboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "order" => Ok(SortField::Order),
            "title" => Ok(SortField::Title),
            "status" => Ok(SortField::Status),
            "priority" => Ok(SortField::Priority),
            "points" | "story-points" => Ok(SortField::Points),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            _ => Err(SprintboardError::InvalidSortField(s.to_string())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = SprintboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(SprintboardError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Sorts issues in-place by the given field and direction.
///
/// The sort is stable. Issues without a story point estimate always sort
/// after estimated ones, whichever direction is requested.
///
/// # Examples
/// ```
/// use sprintboard_core::domain::sorting::{sort_issues, SortField, SortOrder};
/// use sprintboard_core::domain::issue::Issue;
///
/// let mut issues = vec![
///     Issue::new("3", "C").with_order(3.0),
///     Issue::new("1", "A").with_order(1.0),
///     Issue::new("2", "B").with_order(2.0),
/// ];
///
/// sort_issues(&mut issues, SortField::Order, SortOrder::Ascending);
/// assert_eq!(issues[0].id.as_str(), "1");
/// ```
pub fn sort_issues(issues: &mut [Issue], field: SortField, order: SortOrder) {
    issues.sort_by(|a, b| {
        if field == SortField::Points {
            return compare_points(a.story_points, b.story_points, order);
        }

        let cmp = match field {
            SortField::Order => a.order.total_cmp(&b.order),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Status => a.status.workflow_rank().cmp(&b.status.workflow_rank()),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
            SortField::Points => Ordering::Equal,
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare estimates with unestimated issues always last
fn compare_points(a: Option<u32>, b: Option<u32>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::{IssueStatus, Priority};

    fn ids(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_order_descending() {
        let mut issues = vec![
            Issue::new("a", "A").with_order(1.0),
            Issue::new("b", "B").with_order(3.0),
            Issue::new("c", "C").with_order(2.0),
        ];

        sort_issues(&mut issues, SortField::Order, SortOrder::Descending);

        assert_eq!(ids(&issues), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_title_case_insensitive() {
        let mut issues = vec![
            Issue::new("1", "zebra"),
            Issue::new("2", "Apple"),
            Issue::new("3", "BANANA"),
        ];

        sort_issues(&mut issues, SortField::Title, SortOrder::Ascending);

        assert_eq!(issues[0].title, "Apple");
        assert_eq!(issues[1].title, "BANANA");
        assert_eq!(issues[2].title, "zebra");
    }

    #[test]
    fn test_sort_by_status_follows_workflow() {
        let mut issues = vec![
            Issue::new("done", "D").with_status(IssueStatus::Done),
            Issue::new("todo", "T").with_status(IssueStatus::ToDo),
            Issue::new("blocked", "B").with_status(IssueStatus::Blocked),
            Issue::new("wip", "W").with_status(IssueStatus::InProgress),
        ];

        sort_issues(&mut issues, SortField::Status, SortOrder::Ascending);

        assert_eq!(ids(&issues), vec!["todo", "wip", "blocked", "done"]);
    }

    #[test]
    fn test_sort_by_priority_most_urgent_first() {
        let mut issues = vec![
            Issue::new("low", "L").with_priority(Priority::P4),
            Issue::new("top", "T").with_priority(Priority::P1),
            Issue::new("mid", "M").with_priority(Priority::P3),
        ];

        sort_issues(&mut issues, SortField::Priority, SortOrder::Ascending);

        assert_eq!(ids(&issues), vec!["top", "mid", "low"]);
    }

    #[test]
    fn test_sort_by_points_unestimated_last_both_directions() {
        let mut issues = vec![
            Issue::new("none", "N"),
            Issue::new("three", "3").with_story_points(3),
            Issue::new("eight", "8").with_story_points(8),
        ];

        sort_issues(&mut issues, SortField::Points, SortOrder::Ascending);
        assert_eq!(ids(&issues), vec!["three", "eight", "none"]);

        sort_issues(&mut issues, SortField::Points, SortOrder::Descending);
        assert_eq!(ids(&issues), vec!["eight", "three", "none"]);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!(SortField::from_str("ORDER").unwrap(), SortField::Order);
        assert_eq!(SortField::from_str("story-points").unwrap(), SortField::Points);
        assert_eq!(SortOrder::from_str("desc").unwrap(), SortOrder::Descending);

        let err = SortField::from_str("color").unwrap_err();
        assert!(err.to_string().contains("Valid fields"));
        assert!(SortOrder::from_str("sideways").is_err());
    }
}
