//! Shared application state and growth table loading

use growthboard_common::Result;
use growthboard_config::{ColumnsConfig, Config};
use growthboard_data::{read_rows, ColumnNames, GrowthCalculator, GrowthTable};
use growthboard_graphs::GraphConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Shared state for the report service
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Growth table computed at startup
    pub table: Arc<GrowthTable>,
}

impl AppState {
    pub fn new(config: Config, table: GrowthTable) -> Self {
        Self {
            config: Arc::new(config),
            table: Arc::new(table),
        }
    }

    /// Default number of schools in top/bottom rankings
    pub fn ranking_size(&self) -> usize {
        self.config.report.ranking_size
    }
}

fn column_names(columns: &ColumnsConfig) -> ColumnNames {
    ColumnNames {
        school: columns.school.clone(),
        diagnostic: columns.diagnostic.clone(),
        formative: columns.formative.clone(),
    }
}

/// Ingest every configured dataset and merge the per-cohort growth tables
pub fn load_growth_table(config: &Config) -> Result<GrowthTable> {
    let mut tables = Vec::with_capacity(config.datasets.len());
    for dataset in &config.datasets {
        let rows = read_rows(
            Path::new(&dataset.path),
            dataset.sheet.as_deref(),
            &column_names(&dataset.columns),
        )?;
        let table = GrowthCalculator::compute(&rows, &dataset.cohort)?;
        info!(
            cohort = %dataset.cohort,
            records = table.len(),
            skipped = table.skipped_rows,
            "computed cohort growth"
        );
        tables.push(table);
    }
    Ok(GrowthCalculator::merge(tables))
}

/// Graph configuration derived from the application settings
pub fn base_graph_config(config: &Config) -> GraphConfig {
    GraphConfig {
        title: String::new(),
        width: config.graph.width,
        height: config.graph.height,
        background_color: config.graph.background_color.clone(),
        font_family: config.graph.font_family.clone(),
        font_size: config.graph.font_size,
        show_grid: config.graph.show_grid,
    }
}
