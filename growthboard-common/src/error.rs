//! Error types and utilities for growthboard

use thiserror::Error;

/// Result type alias for growthboard operations
pub type Result<T> = std::result::Result<T, GrowthboardError>;

/// Main error type for growthboard operations
#[derive(Error, Debug)]
pub enum GrowthboardError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset ingest errors (reading score sheets)
    #[error("Ingest error: {message}")]
    Ingest {
        message: String,
        /// Source file the error originated from, when known
        source_path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Growth table shaping errors
    #[error("Table error: {message}")]
    Table {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record carries a zero diagnostic score, so growth is undefined
    #[error("Zero diagnostic score for school '{school}' in cohort '{cohort}'")]
    ZeroDiagnostic { school: String, cohort: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Workbook export errors
    #[error("Export error: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GrowthboardError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new ingest error
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest {
            message: msg.into(),
            source_path: None,
            source: None,
        }
    }

    /// Create a new ingest error tagged with the offending source file
    pub fn ingest_in(msg: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Ingest {
            message: msg.into(),
            source_path: Some(path.into()),
            source: None,
        }
    }

    /// Create a new ingest error tagged with the offending source file and cause
    pub fn ingest_with_source(
        msg: impl Into<String>,
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ingest {
            message: msg.into(),
            source_path: Some(path.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new table error
    pub fn table(msg: impl Into<String>) -> Self {
        Self::Table {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new zero-diagnostic error for a school row
    pub fn zero_diagnostic(school: impl Into<String>, cohort: impl Into<String>) -> Self {
        Self::ZeroDiagnostic {
            school: school.into(),
            cohort: cohort.into(),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new export error
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new export error with source
    pub fn export_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Export {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

// Error conversion implementations for external types

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to GrowthboardError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for GrowthboardError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = GrowthboardError::new("test message");
        assert_eq!(error.to_string(), "test message");
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let error = GrowthboardError::with_source("wrapper", io_error);
        assert_eq!(error.to_string(), "wrapper");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_domain_constructors() {
        let error = GrowthboardError::config("bad config");
        assert_eq!(error.to_string(), "Configuration error: bad config");

        let error = GrowthboardError::ingest_in("missing column", "scores.xlsx");
        assert!(matches!(
            error,
            GrowthboardError::Ingest {
                source_path: Some(_),
                ..
            }
        ));

        let error = GrowthboardError::zero_diagnostic("EMEF Central", "2nd year");
        assert_eq!(
            error.to_string(),
            "Zero diagnostic score for school 'EMEF Central' in cohort '2nd year'"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error: GrowthboardError = io_error.into();
        assert!(matches!(error, GrowthboardError::Io(_)));
    }

    #[test]
    fn test_validation_field() {
        let error = GrowthboardError::validation_field("must not be empty", "school");
        if let GrowthboardError::Validation { field, .. } = &error {
            assert_eq!(field.as_deref(), Some("school"));
        } else {
            panic!("expected validation error");
        }
    }
}
