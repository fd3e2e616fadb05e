use crate::domain::issue::{Issue, IssueStatus};
use crate::domain::sprint::Sprint;
use serde::{Deserialize, Serialize};

/// Aggregate counts over a board's issues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total_issues: usize,
    pub completed_issues: usize,
    pub blocked_issues: usize,
    pub total_story_points: u32,
    pub completed_story_points: u32,
}

/// Aggregate counts over the issues belonging to one sprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintStats {
    pub total_issues: usize,
    pub completed_issues: usize,
    pub in_progress_issues: usize,
    pub blocked_issues: usize,
    pub total_story_points: u32,
    pub completed_story_points: u32,
    /// Share of story points done, rounded to a whole percent
    pub completion_percentage: u32,
    /// Story points completed within the sprint
    pub velocity: u32,
}

impl SprintStats {
    pub fn remaining_story_points(&self) -> u32 {
        self.total_story_points - self.completed_story_points
    }
}

#[derive(Default)]
struct Tally {
    total: usize,
    todo: usize,
    in_progress: usize,
    done: usize,
    blocked: usize,
    points: u32,
    done_points: u32,
}

impl Tally {
    fn over<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
        let mut tally = Self::default();
        for issue in issues {
            let points = issue.points();
            tally.total += 1;
            tally.points = tally.points.saturating_add(points);
            match issue.status {
                IssueStatus::ToDo => tally.todo += 1,
                IssueStatus::InProgress => tally.in_progress += 1,
                IssueStatus::Blocked => tally.blocked += 1,
                IssueStatus::Done => {
                    tally.done += 1;
                    tally.done_points = tally.done_points.saturating_add(points);
                }
            }
        }
        tally
    }
}

pub fn board_stats(issues: &[Issue]) -> BoardStats {
    let tally = Tally::over(issues);
    BoardStats {
        total_issues: tally.total,
        completed_issues: tally.done,
        blocked_issues: tally.blocked,
        total_story_points: tally.points,
        completed_story_points: tally.done_points,
    }
}

/// Computes statistics over the issues whose `sprint_id` matches the sprint;
/// every other issue in the input is ignored.
pub fn sprint_stats(sprint: &Sprint, issues: &[Issue]) -> SprintStats {
    let tally = Tally::over(sprint_issues(sprint, issues));
    SprintStats {
        total_issues: tally.total,
        completed_issues: tally.done,
        in_progress_issues: tally.in_progress,
        blocked_issues: tally.blocked,
        total_story_points: tally.points,
        completed_story_points: tally.done_points,
        completion_percentage: rounded_percentage(tally.done_points as u64, tally.points as u64),
        velocity: tally.done_points,
    }
}

/// Share of issues (by count) that are done, as a rounded whole percent.
/// An empty collection is 0% complete.
pub fn completion_percentage(issues: &[Issue]) -> u32 {
    let tally = Tally::over(issues);
    rounded_percentage(tally.done as u64, tally.total as u64)
}

/// Issues that belong to the sprint, in input order
pub fn sprint_issues<'a>(sprint: &'a Sprint, issues: &'a [Issue]) -> impl Iterator<Item = &'a Issue> {
    issues
        .iter()
        .filter(move |issue| issue.sprint_id.as_ref() == Some(&sprint.id))
}

/// Total story points, saturating at `u32::MAX` like the stats tallies
pub(crate) fn sum_points<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> u32 {
    issues
        .into_iter()
        .fold(0u32, |sum, issue| sum.saturating_add(issue.points()))
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0
pub(crate) fn rounded_percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_board_stats_scenario() {
        let issues = vec![
            Issue::new("1", "A").with_status(IssueStatus::Done).with_story_points(3),
            Issue::new("2", "B").with_status(IssueStatus::ToDo).with_story_points(5),
        ];

        assert_eq!(
            board_stats(&issues),
            BoardStats {
                total_issues: 2,
                completed_issues: 1,
                blocked_issues: 0,
                total_story_points: 8,
                completed_story_points: 3,
            }
        );
    }

    #[test]
    fn test_board_stats_empty() {
        assert_eq!(board_stats(&[]), BoardStats::default());
    }

    #[test]
    fn test_sprint_stats_filters_by_sprint() {
        let sprint = Sprint::new("s1", "Sprint 1");
        let issues = vec![
            Issue::new("1", "A").with_sprint("s1").with_status(IssueStatus::Done).with_story_points(5),
            Issue::new("2", "B").with_sprint("s1").with_status(IssueStatus::InProgress).with_story_points(3),
            Issue::new("3", "C").with_sprint("s1").with_status(IssueStatus::Blocked),
            Issue::new("4", "D").with_sprint("s2").with_status(IssueStatus::Done).with_story_points(13),
            Issue::new("5", "E").with_status(IssueStatus::Done).with_story_points(8),
        ];

        let stats = sprint_stats(&sprint, &issues);

        assert_eq!(stats.total_issues, 3);
        assert_eq!(stats.completed_issues, 1);
        assert_eq!(stats.in_progress_issues, 1);
        assert_eq!(stats.blocked_issues, 1);
        assert_eq!(stats.total_story_points, 8);
        assert_eq!(stats.completed_story_points, 5);
        assert_eq!(stats.completion_percentage, 63);
        assert_eq!(stats.velocity, 5);
        assert_eq!(stats.remaining_story_points(), 3);
    }

    #[test]
    fn test_sprint_stats_without_points_is_zero_percent() {
        let sprint = Sprint::new("s1", "Sprint 1");
        let issues = vec![Issue::new("1", "A").with_sprint("s1").with_status(IssueStatus::Done)];

        let stats = sprint_stats(&sprint, &issues);

        assert_eq!(stats.completed_issues, 1);
        assert_eq!(stats.completion_percentage, 0);
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(&[]), 0);

        let all_done: Vec<Issue> = (0..5)
            .map(|i| Issue::new(i.to_string().as_str(), "Done").with_status(IssueStatus::Done))
            .collect();
        assert_eq!(completion_percentage(&all_done), 100);

        let mixed = vec![
            Issue::new("1", "A").with_status(IssueStatus::Done),
            Issue::new("2", "B"),
            Issue::new("3", "C"),
        ];
        assert_eq!(completion_percentage(&mixed), 33);
    }

    #[test]
    fn test_rounded_percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(1, 200), 1);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(5, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_completed_points_never_exceed_total(
            rows in prop::collection::vec((0usize..4, prop::option::of(0u32..100)), 0..50)
        ) {
            let issues: Vec<Issue> = rows
                .into_iter()
                .enumerate()
                .map(|(i, (status, points))| {
                    let mut issue = Issue::new(i.to_string().as_str(), "Issue")
                        .with_status(IssueStatus::ALL[status]);
                    issue.story_points = points;
                    issue
                })
                .collect();

            let stats = board_stats(&issues);
            prop_assert!(stats.completed_story_points <= stats.total_story_points);
            prop_assert!(stats.completed_issues + stats.blocked_issues <= stats.total_issues);
            prop_assert!(completion_percentage(&issues) <= 100);
        }
    }
}
