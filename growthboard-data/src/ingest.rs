//! Reading score rows from spreadsheet and CSV sources
//!
//! Header cells are trimmed before matching, so stray whitespace in the
//! source files does not break column lookup.

use crate::growth::ScoreRow;
use calamine::{open_workbook_auto, Data, Reader};
use growthboard_common::{GrowthboardError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Names of the columns carrying the required fields
#[derive(Debug, Clone)]
pub struct ColumnNames {
    /// Column holding the school identifier
    pub school: String,

    /// Column holding the diagnostic (baseline) score
    pub diagnostic: String,

    /// Column holding the formative (follow-up) score
    pub formative: String,
}

/// Read score rows from a source file, dispatching on its extension
///
/// Spreadsheet sources (`.xlsx`, `.xlsm`, `.xls`) are read with calamine;
/// `.csv` sources with the csv crate. `sheet` selects the worksheet for
/// spreadsheet sources; the first sheet is used when unset.
pub fn read_rows(path: &Path, sheet: Option<&str>, columns: &ColumnNames) -> Result<Vec<ScoreRow>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" => read_spreadsheet(path, sheet, columns),
        "csv" => read_csv(path, columns),
        other => Err(GrowthboardError::ingest_in(
            format!("Unsupported source extension '{other}'"),
            path.display().to_string(),
        )),
    }?;

    info!(path = %path.display(), rows = rows.len(), "read score rows");
    Ok(rows)
}

fn read_spreadsheet(
    path: &Path,
    sheet: Option<&str>,
    columns: &ColumnNames,
) -> Result<Vec<ScoreRow>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        GrowthboardError::ingest_with_source(
            "Failed to open workbook",
            path.display().to_string(),
            e,
        )
    })?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| {
                GrowthboardError::ingest_in("Workbook has no sheets", path.display().to_string())
            })?,
    };
    debug!(sheet = %sheet_name, "reading worksheet");

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        GrowthboardError::ingest_with_source(
            format!("Failed to read sheet '{sheet_name}'"),
            path.display().to_string(),
            e,
        )
    })?;

    let mut rows_iter = range.rows();
    let header = rows_iter.next().ok_or_else(|| {
        GrowthboardError::ingest_in("Sheet is empty", path.display().to_string())
    })?;
    let header: Vec<String> = header
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let school_idx = column_index(&header, &columns.school, path)?;
    let diagnostic_idx = column_index(&header, &columns.diagnostic, path)?;
    let formative_idx = column_index(&header, &columns.formative, path)?;

    let mut rows = Vec::new();
    for (number, cells) in rows_iter.enumerate() {
        // Row numbers are 1-based and count the header
        let row_number = number + 2;
        if cells.iter().all(is_empty_cell) {
            continue;
        }

        let school = cells
            .get(school_idx)
            .map(|cell| cell.to_string().trim().to_string())
            .unwrap_or_default();
        if school.is_empty() {
            return Err(GrowthboardError::ingest_in(
                format!("Blank school name at row {row_number}"),
                path.display().to_string(),
            ));
        }

        let diagnostic = numeric_cell(cells.get(diagnostic_idx), &columns.diagnostic, row_number, path)?;
        let formative = numeric_cell(cells.get(formative_idx), &columns.formative, row_number, path)?;

        rows.push(ScoreRow {
            school,
            diagnostic_score: diagnostic,
            formative_score: formative,
        });
    }

    Ok(rows)
}

fn read_csv(path: &Path, columns: &ColumnNames) -> Result<Vec<ScoreRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            GrowthboardError::ingest_with_source(
                "Failed to open CSV source",
                path.display().to_string(),
                e,
            )
        })?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| {
            GrowthboardError::ingest_with_source(
                "Failed to read CSV header",
                path.display().to_string(),
                e,
            )
        })?
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();

    let school_idx = column_index(&header, &columns.school, path)?;
    let diagnostic_idx = column_index(&header, &columns.diagnostic, path)?;
    let formative_idx = column_index(&header, &columns.formative, path)?;

    let mut rows = Vec::new();
    for (number, record) in reader.records().enumerate() {
        let row_number = number + 2;
        let record = record.map_err(|e| {
            GrowthboardError::ingest_with_source(
                format!("Failed to read CSV row {row_number}"),
                path.display().to_string(),
                e,
            )
        })?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let school = record.get(school_idx).unwrap_or_default().trim().to_string();
        if school.is_empty() {
            return Err(GrowthboardError::ingest_in(
                format!("Blank school name at row {row_number}"),
                path.display().to_string(),
            ));
        }

        let diagnostic =
            parse_number(record.get(diagnostic_idx), &columns.diagnostic, row_number, path)?;
        let formative =
            parse_number(record.get(formative_idx), &columns.formative, row_number, path)?;

        rows.push(ScoreRow {
            school,
            diagnostic_score: diagnostic,
            formative_score: formative,
        });
    }

    Ok(rows)
}

fn column_index(header: &[String], name: &str, path: &Path) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell == name.trim())
        .ok_or_else(|| {
            GrowthboardError::ingest_in(
                format!("Missing column '{name}'"),
                path.display().to_string(),
            )
        })
}

fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn numeric_cell(cell: Option<&Data>, column: &str, row_number: usize, path: &Path) -> Result<f64> {
    let value = match cell {
        Some(Data::Float(f)) => Some(*f),
        Some(Data::Int(i)) => Some(*i as f64),
        Some(Data::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    value.ok_or_else(|| {
        GrowthboardError::ingest_in(
            format!("Non-numeric value in column '{column}' at row {row_number}"),
            path.display().to_string(),
        )
    })
}

fn parse_number(field: Option<&str>, column: &str, row_number: usize, path: &Path) -> Result<f64> {
    field
        .and_then(|f| f.trim().parse::<f64>().ok())
        .ok_or_else(|| {
            GrowthboardError::ingest_in(
                format!("Non-numeric value in column '{column}' at row {row_number}"),
                path.display().to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;

    fn columns() -> ColumnNames {
        ColumnNames {
            school: "SCHOOL".to_string(),
            diagnostic: "DIAGNOSTIC - MAT".to_string(),
            formative: "FORMATIVE I - MAT".to_string(),
        }
    }

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn write_xlsx(rows: &[(&str, f64, f64)]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        // Headers carry stray whitespace on purpose
        sheet.write_string(0, 0, " SCHOOL ").unwrap();
        sheet.write_string(0, 1, "DIAGNOSTIC - MAT").unwrap();
        sheet.write_string(0, 2, "FORMATIVE I - MAT ").unwrap();
        for (i, (school, diagnostic, formative)) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, *school).unwrap();
            sheet.write_number(row, 1, *diagnostic).unwrap();
            sheet.write_number(row, 2, *formative).unwrap();
        }
        workbook.save(file.path()).unwrap();
        file
    }

    #[test]
    fn test_read_csv_rows() {
        let file = write_csv(
            "SCHOOL,DIAGNOSTIC - MAT,FORMATIVE I - MAT\n\
             Alpha,50,75\n\
             Beta,40.5,39\n",
        );
        let rows = read_rows(file.path(), None, &columns()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].school, "Alpha");
        assert_eq!(rows[0].diagnostic_score, 50.0);
        assert_eq!(rows[1].formative_score, 39.0);
    }

    #[test]
    fn test_read_csv_trims_header_whitespace() {
        let file = write_csv(
            " SCHOOL ,DIAGNOSTIC - MAT , FORMATIVE I - MAT\n\
             Alpha,50,75\n",
        );
        let rows = read_rows(file.path(), None, &columns()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_csv_skips_blank_rows() {
        let file = write_csv(
            "SCHOOL,DIAGNOSTIC - MAT,FORMATIVE I - MAT\n\
             Alpha,50,75\n\
             ,,\n\
             Beta,40,50\n",
        );
        let rows = read_rows(file.path(), None, &columns()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_read_csv_missing_column() {
        let file = write_csv("SCHOOL,DIAGNOSTIC - MAT\nAlpha,50\n");
        let err = read_rows(file.path(), None, &columns()).unwrap_err();
        assert!(err.to_string().contains("FORMATIVE I - MAT"));
    }

    #[test]
    fn test_read_csv_non_numeric_score() {
        let file = write_csv(
            "SCHOOL,DIAGNOSTIC - MAT,FORMATIVE I - MAT\n\
             Alpha,absent,75\n",
        );
        let err = read_rows(file.path(), None, &columns()).unwrap_err();
        assert!(err.to_string().contains("DIAGNOSTIC - MAT"));
    }

    #[test]
    fn test_read_csv_blank_school() {
        let file = write_csv(
            "SCHOOL,DIAGNOSTIC - MAT,FORMATIVE I - MAT\n\
             ,50,75\n",
        );
        assert!(read_rows(file.path(), None, &columns()).is_err());
    }

    #[test]
    fn test_read_xlsx_rows() {
        let file = write_xlsx(&[("Alpha", 50.0, 75.0), ("Beta", 40.0, 50.0)]);
        let rows = read_rows(file.path(), None, &columns()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].school, "Alpha");
        assert_eq!(rows[1].diagnostic_score, 40.0);
    }

    #[test]
    fn test_read_xlsx_missing_sheet() {
        let file = write_xlsx(&[("Alpha", 50.0, 75.0)]);
        assert!(read_rows(file.path(), Some("Nope"), &columns()).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = read_rows(file.path(), None, &columns()).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }
}
