//! Annotated score heatmaps per cohort

use crate::renderer::{parse_color, GraphRenderer};
use crate::GraphConfig;
use growthboard_common::{GrowthboardError, Result};
use growthboard_data::{GrowthTable, SchoolGrowthRecord};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const COLUMNS: [&str; 2] = ["Diagnostic", "Formative"];

/// Viridis anchor points, interpolated linearly in between
const VIRIDIS_ANCHORS: [(f64, (u8, u8, u8)); 5] = [
    (0.0, (68, 1, 84)),
    (0.25, (59, 82, 139)),
    (0.5, (33, 145, 140)),
    (0.75, (94, 201, 98)),
    (1.0, (253, 231, 37)),
];

/// Map a normalized value to the viridis color scale
pub fn viridis(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    for window in VIRIDIS_ANCHORS.windows(2) {
        let (start, start_color) = window[0];
        let (end, end_color) = window[1];
        if t <= end {
            let local = if end > start { (t - start) / (end - start) } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;
            return RGBColor(
                lerp(start_color.0, end_color.0),
                lerp(start_color.1, end_color.1),
                lerp(start_color.2, end_color.2),
            );
        }
    }
    let (_, last) = VIRIDIS_ANCHORS[VIRIDIS_ANCHORS.len() - 1];
    RGBColor(last.0, last.1, last.2)
}

fn luminance(color: &RGBColor) -> f64 {
    (0.299 * color.0 as f64 + 0.587 * color.1 as f64 + 0.114 * color.2 as f64) / 255.0
}

/// Heatmap of diagnostic and formative scores for one cohort
///
/// One row per school, one column per assessment, each cell colored on
/// the viridis scale and annotated with the score.
#[derive(Debug)]
pub struct ScoreHeatmapGraph {
    cohort: String,
    records: Vec<SchoolGrowthRecord>,
}

impl ScoreHeatmapGraph {
    /// Build a heatmap for the given cohort's records
    pub fn new(table: &GrowthTable, cohort: impl Into<String>) -> Self {
        let cohort = cohort.into();
        let records = table
            .records
            .iter()
            .filter(|record| record.cohort == cohort)
            .cloned()
            .collect();
        Self { cohort, records }
    }

    /// Cohort this heatmap covers
    pub fn cohort(&self) -> &str {
        &self.cohort
    }

    /// Records backing the heatmap
    pub fn records(&self) -> &[SchoolGrowthRecord] {
        &self.records
    }

    fn cell_value(record: &SchoolGrowthRecord, column: usize) -> f64 {
        match column {
            0 => record.diagnostic_score,
            _ => record.formative_score,
        }
    }

    /// Min and max across both score columns
    fn score_bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for record in &self.records {
            for column in 0..COLUMNS.len() {
                let value = Self::cell_value(record, column);
                min = min.min(value);
                max = max.max(value);
            }
        }
        if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        }
    }
}

impl GraphRenderer for ScoreHeatmapGraph {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        if self.records.is_empty() {
            return Err(GrowthboardError::graph(format!(
                "No records for cohort '{}' heatmap",
                self.cohort
            )));
        }

        root.fill(&parse_color(&config.background_color))?;

        let rows = self.records.len();
        let (min, max) = self.score_bounds();

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(120);
        if !config.title.is_empty() {
            builder.caption(
                &config.title,
                (config.font_family.as_str(), config.font_size + 6),
            );
        }
        let mut chart = builder
            .build_cartesian_2d(-0.5f64..(COLUMNS.len() as f64 - 0.5), -0.5f64..(rows as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(COLUMNS.len())
            .x_label_formatter(&|x| {
                let index = x.round();
                if (x - index).abs() > 0.01 || index < 0.0 || index >= COLUMNS.len() as f64 {
                    return String::new();
                }
                COLUMNS[index as usize].to_string()
            })
            .y_labels(rows)
            .y_label_formatter(&|y| {
                let index = y.round();
                if (y - index).abs() > 0.01 || index < 0.0 || index >= rows as f64 {
                    return String::new();
                }
                self.records[index as usize].school.clone()
            })
            .label_style((config.font_family.as_str(), config.font_size))
            .draw()?;

        for (row, record) in self.records.iter().enumerate() {
            for column in 0..COLUMNS.len() {
                let value = Self::cell_value(record, column);
                let normalized = (value - min) / (max - min);
                let fill = viridis(normalized);

                let x = column as f64;
                let y = row as f64;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    fill.filled(),
                )))?;

                // Dark cells get light annotations and vice versa
                let text_color = if luminance(&fill) < 0.5 { &WHITE } else { &BLACK };
                let style = (config.font_family.as_str(), config.font_size)
                    .into_font()
                    .color(text_color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart.draw_series(std::iter::once(Text::new(
                    format!("{value:.1}"),
                    (x, y),
                    style,
                )))?;
            }
        }

        Ok(())
    }
}
