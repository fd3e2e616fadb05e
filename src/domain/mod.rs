/// Declares an opaque, string-backed identifier assigned by the external store.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::SprintboardError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(crate::error::SprintboardError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod board;
pub mod issue;
pub mod sorting;
pub mod sprint;

pub use board::{Board, BoardId, BoardType};
pub use issue::{Assignee, Issue, IssueId, IssueStatus, Priority, UserId};
pub use sorting::{sort_issues, SortField, SortOrder};
pub use sprint::{Sprint, SprintId, SprintStatus};
