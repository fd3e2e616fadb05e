//! Field-level validation of proposed board and sprint edits.
//!
//! Validation never fails: every rule violation becomes an entry in the
//! report's error map, keyed by the field's wire name.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_BOARD_NAME_LEN: usize = 100;
pub const MAX_BOARD_DESCRIPTION_LEN: usize = 500;
pub const MAX_SPRINT_NAME_LEN: usize = 255;
pub const MAX_SPRINT_GOAL_LEN: usize = 1000;
pub const MAX_SPRINT_CAPACITY: i64 = 1000;

/// Proposed board fields as submitted by a form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub board_type: Option<String>,
}

/// Proposed sprint fields as submitted by a form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SprintDraft {
    pub name: Option<String>,
    pub goal: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub capacity_story_points: Option<i64>,
}

/// Outcome of validating a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

/// Validates a proposed board. The name is required; other fields are
/// checked only when present.
pub fn validate_board(draft: &BoardDraft) -> ValidationReport {
    let mut errors = BTreeMap::new();

    check_name(
        &mut errors,
        draft.name.as_deref(),
        "Board name",
        MAX_BOARD_NAME_LEN,
    );

    if let Some(description) = draft.description.as_deref() {
        if description.chars().count() > MAX_BOARD_DESCRIPTION_LEN {
            errors.insert(
                "description".to_string(),
                format!(
                    "Description must be {} characters or less",
                    MAX_BOARD_DESCRIPTION_LEN
                ),
            );
        }
    }

    if let Some(board_type) = draft.board_type.as_deref() {
        if !matches!(board_type.trim().to_lowercase().as_str(), "kanban" | "scrum") {
            errors.insert(
                "type".to_string(),
                "Board type must be either kanban or scrum".to_string(),
            );
        }
    }

    ValidationReport::from_errors(errors)
}

/// Validates a proposed sprint. A date range whose start is not strictly
/// before its end is reported against `endDate`.
pub fn validate_sprint(draft: &SprintDraft) -> ValidationReport {
    let mut errors = BTreeMap::new();

    check_name(
        &mut errors,
        draft.name.as_deref(),
        "Sprint name",
        MAX_SPRINT_NAME_LEN,
    );

    if let Some(goal) = draft.goal.as_deref() {
        if goal.chars().count() > MAX_SPRINT_GOAL_LEN {
            errors.insert(
                "goal".to_string(),
                format!("Goal must be {} characters or less", MAX_SPRINT_GOAL_LEN),
            );
        }
    }

    let start = check_date(&mut errors, "startDate", draft.start_date.as_deref());
    let end = check_date(&mut errors, "endDate", draft.end_date.as_deref());
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            errors.insert(
                "endDate".to_string(),
                "End date must be after start date".to_string(),
            );
        }
    }

    if let Some(capacity) = draft.capacity_story_points {
        if !(0..=MAX_SPRINT_CAPACITY).contains(&capacity) {
            errors.insert(
                "capacityStoryPoints".to_string(),
                format!(
                    "Capacity must be between 0 and {} story points",
                    MAX_SPRINT_CAPACITY
                ),
            );
        }
    }

    ValidationReport::from_errors(errors)
}

/// Parses a form date: either a calendar date (taken as midnight UTC) or a
/// full RFC 3339 timestamp.
pub fn parse_date_input(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn check_name(
    errors: &mut BTreeMap<String, String>,
    name: Option<&str>,
    label: &str,
    max_len: usize,
) {
    match name.map(str::trim) {
        None | Some("") => {
            errors.insert("name".to_string(), format!("{} is required", label));
        }
        Some(name) if name.chars().count() > max_len => {
            errors.insert(
                "name".to_string(),
                format!("{} must be {} characters or less", label, max_len),
            );
        }
        Some(_) => {}
    }
}

fn check_date(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    value: Option<&str>,
) -> Option<DateTime<Utc>> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_date_input(value);
    if parsed.is_none() {
        errors.insert(field.to_string(), "Invalid date".to_string());
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(name: &str) -> BoardDraft {
        BoardDraft {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn sprint(name: &str, start: Option<&str>, end: Option<&str>) -> SprintDraft {
        SprintDraft {
            name: Some(name.to_string()),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_board() {
        let report = validate_board(&board("Platform"));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_board_name_blank_or_missing() {
        assert!(!validate_board(&board("   ")).is_valid);

        let report = validate_board(&BoardDraft::default());
        assert_eq!(report.error_for("name"), Some("Board name is required"));
    }

    #[test]
    fn test_board_length_limits() {
        assert!(validate_board(&board(&"a".repeat(100))).is_valid);
        assert!(!validate_board(&board(&"a".repeat(101))).is_valid);

        let mut draft = board("Platform");
        draft.description = Some("d".repeat(501));
        let report = validate_board(&draft);
        assert!(report.error_for("description").is_some());
        assert!(report.error_for("name").is_none());
    }

    #[test]
    fn test_board_type() {
        let mut draft = board("Platform");
        draft.board_type = Some("Scrum".to_string());
        assert!(validate_board(&draft).is_valid);

        draft.board_type = Some("waterfall".to_string());
        assert!(validate_board(&draft).error_for("type").is_some());
    }

    #[test]
    fn test_sprint_invalid_name_and_inverted_dates() {
        let report = validate_sprint(&sprint("", Some("2024-01-10"), Some("2024-01-05")));

        assert!(!report.is_valid);
        assert!(report.errors.contains_key("name"));
        assert!(report.errors.contains_key("endDate"));
        assert!(!report.errors.contains_key("startDate"));
    }

    #[test]
    fn test_sprint_equal_dates_invalid_on_end_date() {
        let report = validate_sprint(&sprint("S1", Some("2024-01-10"), Some("2024-01-10")));
        assert_eq!(
            report.error_for("endDate"),
            Some("End date must be after start date")
        );
    }

    #[test]
    fn test_sprint_optional_fields_missing_is_valid() {
        assert!(validate_sprint(&sprint("Sprint 1", None, None)).is_valid);
        assert!(validate_sprint(&sprint("Sprint 1", Some("2024-01-01"), None)).is_valid);
    }

    #[test]
    fn test_sprint_unparseable_date() {
        let report = validate_sprint(&sprint("S1", Some("next tuesday"), Some("2024-01-10")));
        assert_eq!(report.error_for("startDate"), Some("Invalid date"));
    }

    #[test]
    fn test_sprint_capacity_bounds() {
        let mut draft = sprint("S1", None, None);

        draft.capacity_story_points = Some(0);
        assert!(validate_sprint(&draft).is_valid);
        draft.capacity_story_points = Some(1000);
        assert!(validate_sprint(&draft).is_valid);

        draft.capacity_story_points = Some(-1);
        assert!(validate_sprint(&draft).error_for("capacityStoryPoints").is_some());
        draft.capacity_story_points = Some(1001);
        assert!(validate_sprint(&draft).error_for("capacityStoryPoints").is_some());
    }

    #[test]
    fn test_sprint_goal_limit() {
        let mut draft = sprint("S1", None, None);
        draft.goal = Some("g".repeat(1001));
        assert!(validate_sprint(&draft).error_for("goal").is_some());
    }

    #[test]
    fn test_draft_deserializes_from_form_payload() {
        let json = r#"{"name": "S1", "startDate": "2024-01-01", "endDate": "2024-01-14T12:00:00Z", "capacityStoryPoints": 40}"#;
        let draft: SprintDraft = serde_json::from_str(json).unwrap();

        assert_eq!(draft.capacity_story_points, Some(40));
        assert!(validate_sprint(&draft).is_valid);
    }

    #[test]
    fn test_parse_date_input() {
        let date = parse_date_input("2024-03-05").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-05T00:00:00+00:00");

        assert!(parse_date_input("2024-03-05T10:00:00+02:00").is_some());
        assert!(parse_date_input("05/03/2024").is_none());
    }
}
