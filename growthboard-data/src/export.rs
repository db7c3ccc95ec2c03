//! Excel export of growth tables

use crate::growth::GrowthTable;
use growthboard_common::{GrowthboardError, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

const HEADERS: [&str; 5] = [
    "School",
    "Diagnostic Score",
    "Formative Score",
    "Growth %",
    "Cohort",
];

/// Writes growth tables as xlsx workbooks
pub struct GrowthWorkbookWriter {
    sheet_name: String,
}

impl Default for GrowthWorkbookWriter {
    fn default() -> Self {
        Self::new("Growth")
    }
}

impl GrowthWorkbookWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// Render the table into an in-memory xlsx buffer
    pub fn render_to_bytes(&self, table: &GrowthTable) -> Result<Vec<u8>> {
        let mut workbook = self.build_workbook(table)?;
        workbook
            .save_to_buffer()
            .map_err(|e| GrowthboardError::export_with_source("Failed to build workbook buffer", e))
    }

    /// Render the table into an xlsx file on disk
    pub fn render_to_file(&self, table: &GrowthTable, path: &Path) -> Result<()> {
        let mut workbook = self.build_workbook(table)?;
        workbook.save(path).map_err(|e| {
            GrowthboardError::export_with_source(
                format!("Failed to write workbook to {}", path.display()),
                e,
            )
        })?;
        info!(path = %path.display(), rows = table.len(), "wrote growth workbook");
        Ok(())
    }

    fn build_workbook(&self, table: &GrowthTable) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| GrowthboardError::export_with_source("Invalid sheet name", e))?;

        let header_format = Format::new().set_bold();
        for (col, header) in HEADERS.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(|e| GrowthboardError::export_with_source("Failed to write header", e))?;
        }

        for (i, record) in table.records.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &record.school)
                .and_then(|s| s.write_number(row, 1, record.diagnostic_score))
                .and_then(|s| s.write_number(row, 2, record.formative_score))
                .and_then(|s| s.write_number(row, 3, record.growth_percent))
                .and_then(|s| s.write_string(row, 4, &record.cohort))
                .map_err(|e| {
                    GrowthboardError::export_with_source(
                        format!("Failed to write row for school '{}'", record.school),
                        e,
                    )
                })?;
        }

        Ok(workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::SchoolGrowthRecord;

    fn sample_table() -> GrowthTable {
        GrowthTable {
            records: vec![
                SchoolGrowthRecord {
                    school: "Alpha".to_string(),
                    diagnostic_score: 50.0,
                    formative_score: 75.0,
                    growth_percent: 50.0,
                    cohort: "2nd year".to_string(),
                },
                SchoolGrowthRecord {
                    school: "Beta".to_string(),
                    diagnostic_score: 80.0,
                    formative_score: 60.0,
                    growth_percent: -25.0,
                    cohort: "5th year".to_string(),
                },
            ],
            skipped_rows: 0,
        }
    }

    #[test]
    fn test_render_to_bytes_produces_xlsx() {
        let writer = GrowthWorkbookWriter::default();
        let bytes = writer.render_to_bytes(&sample_table()).unwrap();
        assert!(!bytes.is_empty());
        // xlsx is a zip archive: PK magic
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn test_render_to_file_round_trips_through_ingest() {
        use crate::ingest::{read_rows, ColumnNames};

        let writer = GrowthWorkbookWriter::default();
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writer.render_to_file(&sample_table(), file.path()).unwrap();

        let columns = ColumnNames {
            school: "School".to_string(),
            diagnostic: "Diagnostic Score".to_string(),
            formative: "Formative Score".to_string(),
        };
        let rows = read_rows(file.path(), Some("Growth"), &columns).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].school, "Alpha");
        assert_eq!(rows[1].formative_score, 60.0);
    }

    #[test]
    fn test_invalid_sheet_name_fails() {
        let writer = GrowthWorkbookWriter::new("bad[name]");
        assert!(writer.render_to_bytes(&sample_table()).is_err());
    }

    #[test]
    fn test_empty_table_exports_header_only() {
        let writer = GrowthWorkbookWriter::default();
        let bytes = writer.render_to_bytes(&GrowthTable::default()).unwrap();
        assert!(!bytes.is_empty());
    }
}
