//! Configuration loading utilities

use crate::Config;
use growthboard_common::Result as GrowthboardResult;
use std::env;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for growthboard_common::GrowthboardError {
    fn from(err: ConfigError) -> Self {
        growthboard_common::GrowthboardError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;

        config
            .validate_all()
            .map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Load configuration from the default locations
    ///
    /// Checks `GROWTHBOARD_CONFIG_PATH`, then `growthboard.yaml` and
    /// `growthboard.yml` in the working directory, and falls back to the
    /// built-in defaults with environment overrides applied.
    pub fn load() -> GrowthboardResult<Config> {
        let config = if let Ok(config_path) = env::var("GROWTHBOARD_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("growthboard.yaml").exists() {
            Self::load_config("growthboard.yaml")?
        } else if Path::new("growthboard.yml").exists() {
            Self::load_config("growthboard.yml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config
                .validate_all()
                .map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GrowthboardResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(level) = env::var("GROWTHBOARD_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(host) = env::var("GROWTHBOARD_REPORT_HOST") {
            config.report.host = host;
        }

        if let Ok(port) = env::var("GROWTHBOARD_REPORT_PORT") {
            config.report.port = port.parse().map_err(|e| ConfigError::EnvParseError {
                var: "GROWTHBOARD_REPORT_PORT".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(dir) = env::var("GROWTHBOARD_IMAGE_DIR") {
            config.images.directory = dir;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID_YAML: &str = r##"
datasets:
  - path: data/2nd_year.xlsx
    cohort: 2nd year
    columns:
      school: SCHOOL
      diagnostic: DIAGNOSTIC - MAT
      formative: FORMATIVE I - MAT
  - path: data/5th_year.csv
    cohort: 5th year
    columns:
      school: SCHOOL
      diagnostic: DIAGNOSTIC - MAT
      formative: FORMATIVE I - MAT
report:
  host: 0.0.0.0
  port: 9090
  ranking_size: 5
graph:
  width: 900
  height: 600
  background_color: "#FFFFFF"
  font_family: sans-serif
  font_size: 12
  show_grid: true
images:
  directory: images
logging:
  level: info
  compact: false
"##;

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID_YAML);
        let config = ConfigLoader::load_config(file.path()).unwrap();
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.report.port, 9090);
        assert_eq!(config.datasets[1].cohort, "5th year");
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        let file = write_config("datasets: [");
        assert!(matches!(
            ConfigLoader::load_config(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let yaml = VALID_YAML.replace("font_size: 12", "font_size: 4");
        let file = write_config(&yaml);
        assert!(matches!(
            ConfigLoader::load_config(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ConfigLoader::load_config("definitely-not-here.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }
}
