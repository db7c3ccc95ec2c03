//! Common utilities and types for the growthboard report tooling

pub mod error;
pub mod logging;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{GrowthboardError, Result};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
pub use types::*;
