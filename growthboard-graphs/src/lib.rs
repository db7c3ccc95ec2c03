//! Chart rendering for growthboard growth reports

pub mod heatmap;
pub mod ranking;
pub mod renderer;
pub mod types;

// Re-export commonly used types
pub use heatmap::{viridis, ScoreHeatmapGraph};
pub use ranking::{GrowthRankingGraph, RankingKind};
pub use renderer::{parse_color, GraphRenderer};
pub use types::GraphConfig;
