//! Report service and static rendering for growthboard

pub mod api;
pub mod render;
pub mod state;

pub use api::{create_report_router, start_report_server};
pub use render::render_images;
pub use state::{base_graph_config, load_growth_table, AppState};
