//! Utility functions used across the growthboard application

use crate::{Result, Timestamp};

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Validate that a string is not empty after trimming
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(crate::GrowthboardError::validation_field(
            format!("{} cannot be empty", field_name),
            field_name,
        ))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let ts = chrono::Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-14 09:26:53 UTC");
    }

    #[test]
    fn test_validate_non_empty() {
        assert_eq!(validate_non_empty(" EMEF Central ", "school").unwrap(), "EMEF Central");
        assert!(validate_non_empty("", "school").is_err());
        assert!(validate_non_empty("   ", "school").is_err());
    }
}
