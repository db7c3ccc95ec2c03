//! Configuration management for growthboard

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    ColumnsConfig, Config, DatasetConfig, GraphRenderConfig, ImageOutputConfig, LoggingConfig,
    ReportConfig,
};
