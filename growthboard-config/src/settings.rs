//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Score sheet sources, one per cohort
    #[validate]
    pub datasets: Vec<DatasetConfig>,

    /// Report service settings
    #[validate]
    pub report: ReportConfig,

    /// Graph rendering settings
    #[validate]
    pub graph: GraphRenderConfig,

    /// Static image output settings
    #[validate]
    pub images: ImageOutputConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// One tabular score source and the cohort it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatasetConfig {
    /// Path to the source file (.xlsx or .csv)
    #[validate(length(min = 1, message = "Dataset path cannot be empty"))]
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid dataset path"))]
    pub path: String,

    /// Cohort label attached to every row from this source
    #[validate(length(min = 1, message = "Cohort label cannot be empty"))]
    pub cohort: String,

    /// Worksheet to read for spreadsheet sources; first sheet when unset
    pub sheet: Option<String>,

    /// Column names carrying the required fields
    #[validate]
    pub columns: ColumnsConfig,
}

/// Required column names within a score source
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ColumnsConfig {
    /// Column holding the school identifier
    #[validate(length(min = 1, message = "School column name cannot be empty"))]
    pub school: String,

    /// Column holding the diagnostic (baseline) score
    #[validate(length(min = 1, message = "Diagnostic column name cannot be empty"))]
    pub diagnostic: String,

    /// Column holding the formative (follow-up) score
    #[validate(length(min = 1, message = "Formative column name cannot be empty"))]
    pub formative: String,
}

/// Report HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportConfig {
    /// Address the service binds to
    #[validate(length(min = 1, message = "Bind host cannot be empty"))]
    pub host: String,

    /// Port the service binds to
    #[validate(range(min = 1, message = "Port must be non-zero"))]
    pub port: u16,

    /// Default number of schools in top/bottom rankings
    #[validate(range(min = 1, max = 50, message = "Ranking size must be between 1 and 50"))]
    pub ranking_size: usize,
}

/// Graph rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GraphRenderConfig {
    /// Graph width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Graph height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be a valid hex color"))]
    pub background_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size for labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Whether to show grid lines
    pub show_grid: bool,
}

/// Static image output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImageOutputConfig {
    /// Directory chart PNGs are written into
    #[validate(length(min = 1, message = "Image output directory cannot be empty"))]
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid image output directory"))]
    pub directory: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use the compact single-line format
    pub compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: vec![
                DatasetConfig {
                    path: "data/2nd_year.xlsx".to_string(),
                    cohort: "2nd year".to_string(),
                    sheet: None,
                    columns: ColumnsConfig::default(),
                },
                DatasetConfig {
                    path: "data/5th_year.xlsx".to_string(),
                    cohort: "5th year".to_string(),
                    sheet: None,
                    columns: ColumnsConfig::default(),
                },
            ],
            report: ReportConfig::default(),
            graph: GraphRenderConfig::default(),
            images: ImageOutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            school: "SCHOOL".to_string(),
            diagnostic: "DIAGNOSTIC - MAT".to_string(),
            formative: "FORMATIVE I - MAT".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ranking_size: 5,
        }
    }
}

impl Default for GraphRenderConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            show_grid: true,
        }
    }
}

impl Default for ImageOutputConfig {
    fn default() -> Self {
        Self {
            directory: "images".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            compact: false,
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;

        let mut errors = validator::ValidationErrors::new();

        if self.datasets.is_empty() {
            let mut err = validator::ValidationError::new("no_datasets");
            err.message = Some("At least one dataset must be configured".into());
            errors.add("datasets", err);
        }

        // Cohort labels must be unique: every view is keyed on them
        let mut seen = std::collections::HashSet::new();
        for dataset in &self.datasets {
            if !seen.insert(dataset.cohort.as_str()) {
                let mut err = validator::ValidationError::new("duplicate_cohort_label");
                err.message = Some(format!("Duplicate cohort label: {}", dataset.cohort).into());
                errors.add("datasets", err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&LoggingConfig> for growthboard_common::LoggingConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            level: config.level.clone(),
            compact_format: config.compact,
            file_path: config.file.clone(),
            ..Self::default()
        }
    }
}
