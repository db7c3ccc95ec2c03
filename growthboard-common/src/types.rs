//! Common types used across the growthboard application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the application
pub type Timestamp = DateTime<Utc>;

/// Cohort selection for report views: one labelled cohort or all of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CohortSelection {
    All,
    Cohort(String),
}

impl CohortSelection {
    /// Parse a selection from a query value; "all" (any casing) selects
    /// every cohort, anything else is treated as a cohort label.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Cohort(trimmed.to_string())
        }
    }

    /// Whether this selection matches the given cohort label
    pub fn matches(&self, cohort: &str) -> bool {
        match self {
            Self::All => true,
            Self::Cohort(label) => label == cohort,
        }
    }
}

impl Default for CohortSelection {
    fn default() -> Self {
        Self::All
    }
}

impl std::fmt::Display for CohortSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Cohort(label) => write!(f, "{label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all() {
        assert_eq!(CohortSelection::parse("all"), CohortSelection::All);
        assert_eq!(CohortSelection::parse("ALL"), CohortSelection::All);
        assert_eq!(CohortSelection::parse("  "), CohortSelection::All);
    }

    #[test]
    fn test_parse_cohort() {
        assert_eq!(
            CohortSelection::parse(" 2nd year "),
            CohortSelection::Cohort("2nd year".to_string())
        );
    }

    #[test]
    fn test_matches() {
        assert!(CohortSelection::All.matches("5th year"));
        let sel = CohortSelection::Cohort("2nd year".to_string());
        assert!(sel.matches("2nd year"));
        assert!(!sel.matches("5th year"));
    }
}
