//! Enumerations and field types for tasks.
//!
//! The board has a fixed, closed set of statuses. Each status is one board
//! column, and `Status::ALL` gives the left-to-right column order.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task status, one per board column.
///
/// Older documents used a four-column board (`Backlog`, `Todo`,
/// `In Progress`, `Done`); those strings still load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(alias = "Todo", alias = "Backlog")]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(alias = "Done")]
    Complete,
}

impl Status {
    /// Column order on the board.
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Complete];

    /// Display label, identical to the persisted string.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Complete => "Complete",
        }
    }

    /// Position of this status in `Status::ALL`.
    pub fn column_index(self) -> usize {
        match self {
            Status::Pending => 0,
            Status::InProgress => 1,
            Status::Complete => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_persisted_strings() {
        assert_eq!(serde_json::to_string(&Status::Pending).unwrap(), "\"Pending\"");
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"In Progress\"");
        assert_eq!(serde_json::to_string(&Status::Complete).unwrap(), "\"Complete\"");
    }

    #[test]
    fn test_legacy_statuses_load() {
        let parsed: Vec<Status> =
            serde_json::from_str(r#"["Backlog", "Todo", "In Progress", "Done"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Status::Pending, Status::Pending, Status::InProgress, Status::Complete]
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_str::<Status>("\"Blocked\"").is_err());
    }

    #[test]
    fn test_column_index_matches_all() {
        for (i, s) in Status::ALL.iter().enumerate() {
            assert_eq!(s.column_index(), i);
        }
    }
}
