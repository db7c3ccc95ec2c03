//! Top/bottom growth ranking bar charts

use crate::renderer::{parse_color, GraphRenderer};
use crate::GraphConfig;
use growthboard_common::{GrowthboardError, Result};
use growthboard_data::{GrowthTable, SchoolGrowthRecord};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Which end of the growth ranking a chart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingKind {
    /// Highest growth, best first
    Top,
    /// Lowest growth, worst first
    Bottom,
}

/// Vertical bar chart of the best or worst growing schools
///
/// Top rankings are drawn in greens, bottom rankings in reds, with the
/// strongest rank in the deepest shade. Each bar carries its growth
/// percentage as a label.
#[derive(Debug)]
pub struct GrowthRankingGraph {
    records: Vec<SchoolGrowthRecord>,
    kind: RankingKind,
}

const GREEN_BASE: RGBColor = RGBColor(44, 160, 44);
const RED_BASE: RGBColor = RGBColor(214, 39, 40);

impl GrowthRankingGraph {
    /// Chart of the `n` schools with the highest growth
    pub fn top(table: &GrowthTable, n: usize) -> Self {
        Self {
            records: table.top(n),
            kind: RankingKind::Top,
        }
    }

    /// Chart of the `n` schools with the lowest growth
    pub fn bottom(table: &GrowthTable, n: usize) -> Self {
        Self {
            records: table.bottom(n),
            kind: RankingKind::Bottom,
        }
    }

    /// Ranked records backing the chart
    pub fn records(&self) -> &[SchoolGrowthRecord] {
        &self.records
    }

    /// Bar color for a rank, deepest shade first
    fn bar_color(&self, index: usize) -> RGBColor {
        let base = match self.kind {
            RankingKind::Top => GREEN_BASE,
            RankingKind::Bottom => RED_BASE,
        };
        let steps = self.records.len().saturating_sub(1).max(1) as f64;
        let factor = 1.0 - 0.45 * (index as f64 / steps);
        shade(base, factor)
    }

    /// Y range covering all bars plus label headroom
    fn value_range(&self) -> (f64, f64) {
        let mut min = 0.0f64;
        let mut max = 0.0f64;
        for record in &self.records {
            min = min.min(record.growth_percent);
            max = max.max(record.growth_percent);
        }
        if (max - min).abs() < f64::EPSILON {
            return (min - 1.0, max + 1.0);
        }
        let padding = (max - min) * 0.15;
        let lower = if min < 0.0 { min - padding } else { min };
        (lower, max + padding)
    }
}

fn shade(base: RGBColor, factor: f64) -> RGBColor {
    let mix = |channel: u8| (channel as f64 * factor + 255.0 * (1.0 - factor)).round() as u8;
    RGBColor(mix(base.0), mix(base.1), mix(base.2))
}

fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let head: String = name.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

impl GraphRenderer for GrowthRankingGraph {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        if self.records.is_empty() {
            return Err(GrowthboardError::graph(
                "No growth records for ranking chart",
            ));
        }

        root.fill(&parse_color(&config.background_color))?;

        let count = self.records.len();
        let (y_min, y_max) = self.value_range();

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if !config.title.is_empty() {
            builder.caption(
                &config.title,
                (config.font_family.as_str(), config.font_size + 6),
            );
        }
        let mut chart =
            builder.build_cartesian_2d(-0.5f64..(count as f64 - 0.5), y_min..y_max)?;

        let mut mesh = chart.configure_mesh();
        if !config.show_grid {
            mesh.disable_mesh();
        }
        mesh.x_labels(count)
            .x_label_formatter(&|x| {
                let index = x.round();
                if (x - index).abs() > 0.01 || index < 0.0 || index >= count as f64 {
                    return String::new();
                }
                truncate_name(&self.records[index as usize].school, 14)
            })
            .y_desc("Growth %")
            .label_style((config.font_family.as_str(), config.font_size))
            .draw()?;

        for (i, record) in self.records.iter().enumerate() {
            let color = self.bar_color(i);
            let x = i as f64;
            let value = record.growth_percent;
            let (bar_bottom, bar_top) = (value.min(0.0), value.max(0.0));

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.35, bar_bottom), (x + 0.35, bar_top)],
                color.filled(),
            )))?;

            // Positive bars carry the label above, negative below
            let anchor = if value < 0.0 {
                Pos::new(HPos::Center, VPos::Top)
            } else {
                Pos::new(HPos::Center, VPos::Bottom)
            };
            let label_style = (config.font_family.as_str(), config.font_size)
                .into_font()
                .color(&BLACK)
                .pos(anchor);
            chart.draw_series(std::iter::once(Text::new(
                format!("{value:.2}"),
                (x, value),
                label_style,
            )))?;
        }

        Ok(())
    }
}
