//! Score sheet ingest, growth computation and table shaping for growthboard

pub mod export;
pub mod growth;
pub mod ingest;
pub mod table;

// Re-export commonly used types
pub use export::GrowthWorkbookWriter;
pub use growth::{round2, GrowthCalculator, GrowthTable, SchoolGrowthRecord, ScoreRow};
pub use ingest::{read_rows, ColumnNames};
