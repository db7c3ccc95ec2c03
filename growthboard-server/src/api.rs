//! HTTP report service endpoints
//!
//! Serves the growth table as JSON, rendered charts as PNG and the full
//! table as an xlsx download, plus a small HTML report page tying them
//! together.

use crate::state::{base_graph_config, AppState};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use growthboard_common::{CohortSelection, GrowthboardError};
use growthboard_data::{GrowthTable, GrowthWorkbookWriter, SchoolGrowthRecord};
use growthboard_graphs::{GraphRenderer, GrowthRankingGraph, ScoreHeatmapGraph};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// API error carrying a status code and a JSON message body
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<GrowthboardError> for ApiError {
    fn from(err: GrowthboardError) -> Self {
        error!(error = %err, "request failed");
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Query parameters for the growth table endpoint
#[derive(Debug, Deserialize)]
pub struct GrowthQuery {
    /// Cohort filter; "all" or absent for every cohort
    pub cohort: Option<String>,
    /// Comma-separated school names to keep
    pub schools: Option<String>,
    /// Sort order: "desc" (default), "asc" or "source"
    pub order: Option<String>,
}

/// Query parameters for ranking endpoints
#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    /// Cohort filter; "all" or absent for every cohort
    pub cohort: Option<String>,
    /// Number of schools in the ranking
    pub limit: Option<usize>,
}

/// Growth table response with summary values
#[derive(Debug, Serialize)]
pub struct GrowthResponse {
    pub records: Vec<SchoolGrowthRecord>,
    pub mean_growth: Option<f64>,
    pub skipped_rows: usize,
}

/// Service health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub schools: usize,
    pub cohorts: Vec<String>,
    pub skipped_rows: usize,
}

/// Create the report service router with all endpoints
pub fn create_report_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(report_page))
        .route("/health", get(get_health))
        .route("/api/cohorts", get(get_cohorts))
        .route("/api/growth", get(get_growth))
        .route("/api/growth/top", get(get_top))
        .route("/api/growth/bottom", get(get_bottom))
        .route("/charts/top.png", get(get_top_chart))
        .route("/charts/bottom.png", get(get_bottom_chart))
        .route("/charts/heatmap/:cohort", get(get_heatmap_chart))
        .route("/export.xlsx", get(get_export))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn cohort_selection(cohort: Option<&str>) -> CohortSelection {
    CohortSelection::parse(cohort.unwrap_or("all"))
}

fn apply_growth_query(table: &GrowthTable, query: &GrowthQuery) -> ApiResult<GrowthTable> {
    let mut filtered = table.filter_cohort(&cohort_selection(query.cohort.as_deref()));

    if let Some(schools) = &query.schools {
        let names: Vec<String> = schools
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        filtered = filtered.filter_schools(&names);
    }

    match query.order.as_deref() {
        None | Some("desc") => Ok(filtered.sorted_desc()),
        Some("asc") => {
            let mut sorted = filtered.sorted_desc();
            sorted.records.reverse();
            Ok(sorted)
        }
        Some("source") => Ok(filtered),
        Some(other) => Err(ApiError::bad_request(format!(
            "Unknown order '{other}', expected 'asc', 'desc' or 'source'"
        ))),
    }
}

async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        schools: state.table.school_names().len(),
        cohorts: state.table.cohorts(),
        skipped_rows: state.table.skipped_rows,
    })
}

async fn get_cohorts(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.table.cohorts())
}

async fn get_growth(
    Query(query): Query<GrowthQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<GrowthResponse>> {
    let table = apply_growth_query(&state.table, &query)?;
    Ok(Json(GrowthResponse {
        mean_growth: table.mean_growth(),
        skipped_rows: table.skipped_rows,
        records: table.records,
    }))
}

async fn get_top(
    Query(query): Query<RankingQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SchoolGrowthRecord>>> {
    let limit = query.limit.unwrap_or_else(|| state.ranking_size());
    let filtered = state
        .table
        .filter_cohort(&cohort_selection(query.cohort.as_deref()));
    Ok(Json(filtered.top(limit)))
}

async fn get_bottom(
    Query(query): Query<RankingQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SchoolGrowthRecord>>> {
    let limit = query.limit.unwrap_or_else(|| state.ranking_size());
    let filtered = state
        .table
        .filter_cohort(&cohort_selection(query.cohort.as_deref()));
    Ok(Json(filtered.bottom(limit)))
}

fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

async fn render_blocking<G>(graph: G, config: growthboard_graphs::GraphConfig) -> ApiResult<Vec<u8>>
where
    G: GraphRenderer + Send + 'static,
{
    tokio::task::spawn_blocking(move || graph.render_to_bytes(&config))
        .await
        .map_err(|_| ApiError::internal("Render task failed"))?
        .map_err(ApiError::from)
}

async fn get_top_chart(
    Query(query): Query<RankingQuery>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let limit = query.limit.unwrap_or_else(|| state.ranking_size());
    let filtered = state
        .table
        .filter_cohort(&cohort_selection(query.cohort.as_deref()));
    if filtered.is_empty() {
        return Err(ApiError::not_found("No growth records for ranking chart"));
    }

    let graph = GrowthRankingGraph::top(&filtered, limit);
    let config =
        base_graph_config(&state.config).with_title(format!("Top {limit} Schools by Growth"));
    let bytes = render_blocking(graph, config).await?;
    Ok(png_response(bytes))
}

async fn get_bottom_chart(
    Query(query): Query<RankingQuery>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let limit = query.limit.unwrap_or_else(|| state.ranking_size());
    let filtered = state
        .table
        .filter_cohort(&cohort_selection(query.cohort.as_deref()));
    if filtered.is_empty() {
        return Err(ApiError::not_found("No growth records for ranking chart"));
    }

    let graph = GrowthRankingGraph::bottom(&filtered, limit);
    let config =
        base_graph_config(&state.config).with_title(format!("Bottom {limit} Schools by Growth"));
    let bytes = render_blocking(graph, config).await?;
    Ok(png_response(bytes))
}

async fn get_heatmap_chart(
    Path(cohort): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let cohort = cohort
        .strip_suffix(".png")
        .unwrap_or(cohort.as_str())
        .to_string();
    if !state.table.cohorts().iter().any(|c| c == &cohort) {
        return Err(ApiError::not_found(format!("Unknown cohort '{cohort}'")));
    }

    let graph = ScoreHeatmapGraph::new(&state.table, &cohort);
    let rows = graph.records().len() as u32;
    let mut config = base_graph_config(&state.config).with_title(format!("Scores: {cohort}"));
    // Tall cohorts need taller images to keep rows readable
    config.height = config.height.max(120 + 40 * rows);
    let bytes = render_blocking(graph, config).await?;
    Ok(png_response(bytes))
}

async fn get_export(
    Query(query): Query<GrowthQuery>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let table = apply_growth_query(&state.table, &query)?;
    let bytes = tokio::task::spawn_blocking(move || {
        GrowthWorkbookWriter::default().render_to_bytes(&table)
    })
    .await
    .map_err(|_| ApiError::internal("Export task failed"))??;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"growth_report.xlsx\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

async fn report_page(State(state): State<AppState>) -> Html<String> {
    let table = state.table.sorted_desc();
    let mean = table
        .mean_growth()
        .map(|m| format!("{m:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Growthboard</title>\n</head>\n<body>\n<h1>School Growth Report</h1>\n",
    );
    page.push_str(&format!(
        "<p>{} schools across {} cohorts, mean growth {} ({} rows skipped)</p>\n",
        table.school_names().len(),
        table.cohorts().len(),
        mean,
        table.skipped_rows,
    ));

    page.push_str("<ul>\n<li><a href=\"/charts/top.png\">Top growth chart</a></li>\n\
                   <li><a href=\"/charts/bottom.png\">Bottom growth chart</a></li>\n");
    for cohort in table.cohorts() {
        page.push_str(&format!(
            "<li><a href=\"/charts/heatmap/{0}\">Score heatmap: {1}</a></li>\n",
            escape_html(&cohort),
            escape_html(&cohort),
        ));
    }
    page.push_str("<li><a href=\"/export.xlsx\">Download xlsx</a></li>\n</ul>\n");

    page.push_str(
        "<table border=\"1\">\n<tr><th>School</th><th>Diagnostic</th>\
         <th>Formative</th><th>Growth %</th><th>Cohort</th></tr>\n",
    );
    for record in &table.records {
        page.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>\n",
            escape_html(&record.school),
            record.diagnostic_score,
            record.formative_score,
            record.growth_percent,
            escape_html(&record.cohort),
        ));
    }
    page.push_str("</table>\n</body>\n</html>\n");

    Html(page)
}

/// Start the report service
pub async fn start_report_server(state: AppState, bind_address: &str) -> anyhow::Result<()> {
    info!("Starting report service on {}", bind_address);

    let app = create_report_router(state);
    let listener = tokio::net::TcpListener::bind(bind_address).await?;

    info!("Report service listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        return;
    }
    info!("Received shutdown signal, stopping report service");
}
