//! Table shaping operations over computed growth records

use crate::growth::{round2, GrowthTable, SchoolGrowthRecord};
use growthboard_common::CohortSelection;
use std::cmp::Ordering;

impl GrowthTable {
    /// Number of records in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by growth percentage, highest first
    ///
    /// The sort is stable, so schools with equal growth keep their
    /// source order.
    pub fn sorted_desc(&self) -> GrowthTable {
        let mut records = self.records.clone();
        records.sort_by(|a, b| {
            b.growth_percent
                .partial_cmp(&a.growth_percent)
                .unwrap_or(Ordering::Equal)
        });
        GrowthTable {
            records,
            skipped_rows: self.skipped_rows,
        }
    }

    /// The `n` schools with the highest growth, best first
    pub fn top(&self, n: usize) -> Vec<SchoolGrowthRecord> {
        let sorted = self.sorted_desc();
        sorted.records.into_iter().take(n).collect()
    }

    /// The `n` schools with the lowest growth, worst first
    pub fn bottom(&self, n: usize) -> Vec<SchoolGrowthRecord> {
        let sorted = self.sorted_desc();
        sorted.records.into_iter().rev().take(n).collect()
    }

    /// Records matching the cohort selection, in source order
    pub fn filter_cohort(&self, selection: &CohortSelection) -> GrowthTable {
        let records = self
            .records
            .iter()
            .filter(|record| selection.matches(&record.cohort))
            .cloned()
            .collect();
        GrowthTable {
            records,
            skipped_rows: self.skipped_rows,
        }
    }

    /// Records whose school appears in `schools`, in source order
    ///
    /// An empty filter keeps every record.
    pub fn filter_schools(&self, schools: &[String]) -> GrowthTable {
        if schools.is_empty() {
            return self.clone();
        }
        let records = self
            .records
            .iter()
            .filter(|record| schools.iter().any(|s| s == &record.school))
            .cloned()
            .collect();
        GrowthTable {
            records,
            skipped_rows: self.skipped_rows,
        }
    }

    /// Mean growth across all records, rounded to 2 decimals
    pub fn mean_growth(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(|r| r.growth_percent).sum();
        Some(round2(sum / self.records.len() as f64))
    }

    /// Distinct school names in order of first appearance
    pub fn school_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for record in &self.records {
            if !names.contains(&record.school) {
                names.push(record.school.clone());
            }
        }
        names
    }

    /// Distinct cohort labels in order of first appearance
    pub fn cohorts(&self) -> Vec<String> {
        let mut cohorts = Vec::new();
        for record in &self.records {
            if !cohorts.contains(&record.cohort) {
                cohorts.push(record.cohort.clone());
            }
        }
        cohorts
    }
}
