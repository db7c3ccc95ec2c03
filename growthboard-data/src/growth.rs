//! Growth computation over ingested score rows
//!
//! Each school's growth is the percentage change from its diagnostic score
//! to its formative score, rounded to two decimal places.

use growthboard_common::{utils::validate_non_empty, GrowthboardError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One ingested score sheet row before growth is computed
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    /// School identifier
    pub school: String,

    /// Diagnostic (baseline) score
    pub diagnostic_score: f64,

    /// Formative (follow-up) score
    pub formative_score: f64,
}

/// One school's computed growth within a cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolGrowthRecord {
    /// School identifier
    pub school: String,

    /// Diagnostic (baseline) score
    pub diagnostic_score: f64,

    /// Formative (follow-up) score
    pub formative_score: f64,

    /// Percentage growth from diagnostic to formative, rounded to 2 decimals
    pub growth_percent: f64,

    /// Cohort the school's row came from
    pub cohort: String,
}

/// Computed growth records plus ingest bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrowthTable {
    /// Growth records in source order
    pub records: Vec<SchoolGrowthRecord>,

    /// Rows dropped because their diagnostic score was zero
    pub skipped_rows: usize,
}

/// Round to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes growth percentages from score rows
pub struct GrowthCalculator;

impl GrowthCalculator {
    /// Compute growth for every row of a cohort
    ///
    /// Rows with a zero diagnostic score have no defined growth; they are
    /// skipped with a warning and counted in [`GrowthTable::skipped_rows`].
    /// Any other invalid row fails the whole computation.
    pub fn compute(rows: &[ScoreRow], cohort: &str) -> Result<GrowthTable> {
        validate_non_empty(cohort, "cohort")?;

        let mut table = GrowthTable::default();
        for row in rows {
            match Self::compute_row(row, cohort) {
                Ok(record) => table.records.push(record),
                Err(GrowthboardError::ZeroDiagnostic { school, cohort }) => {
                    warn!(%school, %cohort, "skipping row with zero diagnostic score");
                    table.skipped_rows += 1;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(table)
    }

    /// Concatenate per-cohort tables, preserving their order
    pub fn merge(tables: Vec<GrowthTable>) -> GrowthTable {
        let mut merged = GrowthTable::default();
        for table in tables {
            merged.records.extend(table.records);
            merged.skipped_rows += table.skipped_rows;
        }
        merged
    }

    fn compute_row(row: &ScoreRow, cohort: &str) -> Result<SchoolGrowthRecord> {
        validate_non_empty(&row.school, "school")?;

        if !row.diagnostic_score.is_finite() || !row.formative_score.is_finite() {
            return Err(GrowthboardError::table(format!(
                "Non-finite score for school '{}'",
                row.school
            )));
        }

        if row.diagnostic_score == 0.0 {
            return Err(GrowthboardError::zero_diagnostic(&row.school, cohort));
        }

        let growth =
            (row.formative_score - row.diagnostic_score) / row.diagnostic_score * 100.0;

        Ok(SchoolGrowthRecord {
            school: row.school.clone(),
            diagnostic_score: row.diagnostic_score,
            formative_score: row.formative_score,
            growth_percent: round2(growth),
            cohort: cohort.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(school: &str, diagnostic: f64, formative: f64) -> ScoreRow {
        ScoreRow {
            school: school.to_string(),
            diagnostic_score: diagnostic,
            formative_score: formative,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(-25.005), -25.01);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn test_positive_growth() {
        let table = GrowthCalculator::compute(&[row("Alpha", 50.0, 75.0)], "2nd year").unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].growth_percent, 50.0);
        assert_eq!(table.records[0].cohort, "2nd year");
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn test_negative_growth() {
        let table = GrowthCalculator::compute(&[row("Beta", 80.0, 60.0)], "5th year").unwrap();
        assert_eq!(table.records[0].growth_percent, -25.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let table = GrowthCalculator::compute(&[row("Gamma", 3.0, 4.0)], "2nd year").unwrap();
        assert_eq!(table.records[0].growth_percent, 33.33);
    }

    #[test]
    fn test_zero_diagnostic_skipped_and_counted() {
        let rows = vec![
            row("Alpha", 50.0, 75.0),
            row("Broken", 0.0, 40.0),
            row("Beta", 40.0, 50.0),
        ];
        let table = GrowthCalculator::compute(&rows, "2nd year").unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.skipped_rows, 1);
        assert_eq!(table.records[0].school, "Alpha");
        assert_eq!(table.records[1].school, "Beta");
    }

    #[test]
    fn test_blank_school_fails() {
        let result = GrowthCalculator::compute(&[row("", 50.0, 75.0)], "2nd year");
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_score_fails() {
        let result = GrowthCalculator::compute(&[row("Alpha", f64::NAN, 75.0)], "2nd year");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_cohort_label_fails() {
        let result = GrowthCalculator::compute(&[row("Alpha", 50.0, 75.0)], "");
        assert!(result.is_err());
    }

    #[test]
    fn test_deterministic_output() {
        let rows = vec![row("Alpha", 50.0, 75.0), row("Beta", 40.0, 50.0)];
        let first = GrowthCalculator::compute(&rows, "2nd year").unwrap();
        let second = GrowthCalculator::compute(&rows, "2nd year").unwrap();
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_merge_preserves_order_and_counts() {
        let second = GrowthCalculator::compute(
            &[row("Alpha", 50.0, 75.0), row("Zed", 0.0, 10.0)],
            "2nd year",
        )
        .unwrap();
        let fifth = GrowthCalculator::compute(&[row("Beta", 40.0, 50.0)], "5th year").unwrap();

        let merged = GrowthCalculator::merge(vec![second, fifth]);
        assert_eq!(merged.records.len(), 2);
        assert_eq!(merged.skipped_rows, 1);
        assert_eq!(merged.records[0].cohort, "2nd year");
        assert_eq!(merged.records[1].cohort, "5th year");
    }
}
