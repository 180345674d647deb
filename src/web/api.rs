// Chart and data endpoints
//
// Each handler reads the shared dataset, derives one sub-table and returns
// one chart, either as SVG or as its JSON specification.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

use super::{SharedState, layout};
use crate::chart::render::{render_pie_svg, render_scatter_svg};
use crate::chart::{PieChart, ScatterChart};
use crate::data::filter::{SelectionError, SiteSelection};
use crate::state::DatasetSummary;

/// Error returned to the browser as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload range: {0}")]
    Selection(#[from] SelectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Selection(_) => StatusCode::BAD_REQUEST,
        };
        log::warn!("Rejected chart request: {self}");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Query parameters shared by the chart endpoints: `?site=ALL&min=0&max=10000`.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub site: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ChartQuery {
    fn site(&self, state: &SharedState) -> SiteSelection {
        let site = SiteSelection::from_value(self.site.as_deref());
        if let SiteSelection::Site(name) = &site {
            if !state.dataset.has_site(name) {
                log::debug!("No launches recorded for site {name:?}");
            }
        }
        site
    }
}

fn pie_chart(state: &SharedState, query: &ChartQuery) -> PieChart {
    let site = query.site(state);
    log::debug!("Building pie chart for site {site}");
    state.pie(&site)
}

fn scatter_chart(state: &SharedState, query: &ChartQuery) -> Result<ScatterChart, ApiError> {
    let site = query.site(state);
    let range = state.payload_range(query.min, query.max)?;
    log::debug!(
        "Building scatter chart for site {site}, payload {}..={} kg",
        range.low(),
        range.high()
    );
    Ok(state.scatter(&site, &range))
}

fn svg_response(svg: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        svg,
    )
        .into_response()
}

pub async fn index_handler(State(state): State<SharedState>) -> Html<String> {
    Html(layout::index_page(&state))
}

pub async fn pie_svg_handler(
    State(state): State<SharedState>,
    Query(query): Query<ChartQuery>,
) -> Response {
    svg_response(render_pie_svg(&pie_chart(&state, &query)))
}

pub async fn scatter_svg_handler(
    State(state): State<SharedState>,
    Query(query): Query<ChartQuery>,
) -> Result<Response, ApiError> {
    let chart = scatter_chart(&state, &query)?;
    Ok(svg_response(render_scatter_svg(&chart)))
}

pub async fn pie_json_handler(
    State(state): State<SharedState>,
    Query(query): Query<ChartQuery>,
) -> Json<PieChart> {
    Json(pie_chart(&state, &query))
}

pub async fn scatter_json_handler(
    State(state): State<SharedState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ScatterChart>, ApiError> {
    scatter_chart(&state, &query).map(Json)
}

pub async fn summary_handler(State(state): State<SharedState>) -> Json<DatasetSummary> {
    Json(state.summary())
}
