//! Static chart rendering into the image directory

use crate::state::base_graph_config;
use growthboard_common::{GrowthboardError, Result};
use growthboard_config::Config;
use growthboard_data::GrowthTable;
use growthboard_graphs::{GraphRenderer, GrowthRankingGraph, ScoreHeatmapGraph};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name slug for a cohort label
fn cohort_slug(cohort: &str) -> String {
    cohort
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Render the ranking charts and per-cohort heatmaps as PNG files
///
/// Returns the paths written, in order: top ranking, bottom ranking,
/// then one heatmap per cohort.
pub fn render_images(config: &Config, table: &GrowthTable, output_dir: &Path) -> Result<Vec<PathBuf>> {
    if table.is_empty() {
        return Err(GrowthboardError::graph("No growth records to render"));
    }

    std::fs::create_dir_all(output_dir)?;

    let limit = config.report.ranking_size;
    let base = base_graph_config(config);
    let mut written = Vec::new();

    let top_path = output_dir.join(format!("top{limit}_growth.png"));
    GrowthRankingGraph::top(table, limit).render_to_file(
        &base.clone().with_title(format!("Top {limit} Schools by Growth")),
        &top_path,
    )?;
    written.push(top_path);

    let bottom_path = output_dir.join(format!("bottom{limit}_growth.png"));
    GrowthRankingGraph::bottom(table, limit).render_to_file(
        &base
            .clone()
            .with_title(format!("Bottom {limit} Schools by Growth")),
        &bottom_path,
    )?;
    written.push(bottom_path);

    for cohort in table.cohorts() {
        let graph = ScoreHeatmapGraph::new(table, &cohort);
        let mut graph_config = base.clone().with_title(format!("Scores: {cohort}"));
        graph_config.height = graph_config.height.max(120 + 40 * graph.records().len() as u32);

        let path = output_dir.join(format!("heatmap_{}.png", cohort_slug(&cohort)));
        graph.render_to_file(&graph_config, &path)?;
        written.push(path);
    }

    info!(count = written.len(), dir = %output_dir.display(), "rendered chart images");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use growthboard_data::SchoolGrowthRecord;

    fn record(school: &str, growth: f64, cohort: &str) -> SchoolGrowthRecord {
        SchoolGrowthRecord {
            school: school.to_string(),
            diagnostic_score: 50.0,
            formative_score: 50.0 + growth / 2.0,
            growth_percent: growth,
            cohort: cohort.to_string(),
        }
    }

    fn sample_table() -> GrowthTable {
        GrowthTable {
            records: vec![
                record("Alpha", 10.0, "2nd year"),
                record("Beta", -5.0, "2nd year"),
                record("Gamma", 25.0, "5th year"),
            ],
            skipped_rows: 0,
        }
    }

    #[test]
    fn test_cohort_slug() {
        assert_eq!(cohort_slug("2nd year"), "2nd_year");
        assert_eq!(cohort_slug("5th Year"), "5th_year");
    }

    #[test]
    fn test_render_images_writes_all_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();

        let written = render_images(&config, &sample_table(), dir.path()).unwrap();
        assert_eq!(written.len(), 4);
        assert!(dir.path().join("top5_growth.png").exists());
        assert!(dir.path().join("bottom5_growth.png").exists());
        assert!(dir.path().join("heatmap_2nd_year.png").exists());
        assert!(dir.path().join("heatmap_5th_year.png").exists());
    }

    #[test]
    fn test_render_images_empty_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        assert!(render_images(&config, &GrowthTable::default(), dir.path()).is_err());
    }
}
