// Dashboard HTTP server
//
// Serves the page layout plus the two chart endpoints it binds to.  The
// dataset is shared read-only; handlers never lock.

mod api;
mod layout;

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub type SharedState = Arc<AppState>;

/// Build the dashboard router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(api::index_handler))
        .route("/chart/pie.svg", get(api::pie_svg_handler))
        .route("/chart/scatter.svg", get(api::scatter_svg_handler))
        .route("/api/pie", get(api::pie_json_handler))
        .route("/api/scatter", get(api::scatter_json_handler))
        .route("/api/summary", get(api::summary_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Dashboard HTTP server
pub struct DashboardServer {
    state: SharedState,
}

impl DashboardServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.state.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;

        log::info!("Dashboard ready at http://{addr}");
        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::model::tests::sample_dataset;

    async fn spawn_server() -> String {
        let state = Arc::new(AppState::new(sample_dataset(), DashboardConfig::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
        let resp = reqwest::get(url).await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn index_serves_layout() {
        let base = spawn_server().await;
        let resp = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = resp.text().await.unwrap();
        assert!(body.contains("SpaceX Launch Records Dashboard"));
        assert!(body.contains("<option value='KSC LC-39A'>"));
    }

    #[tokio::test]
    async fn all_sites_pie_sums_to_total_successes() {
        let base = spawn_server().await;
        let (status, pie) = get_json(&format!("{base}/api/pie?site=ALL")).await;
        assert_eq!(status, 200);
        let total: u64 = pie["slices"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["value"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn missing_site_means_all() {
        let base = spawn_server().await;
        let (_, pie) = get_json(&format!("{base}/api/pie")).await;
        assert_eq!(pie["title"], "Total Successful Launches by Site");
    }

    #[tokio::test]
    async fn scatter_respects_site_and_range() {
        let base = spawn_server().await;
        let (status, chart) = get_json(&format!(
            "{base}/api/scatter?site=KSC%20LC-39A&min=3000&max=6070"
        ))
        .await;
        assert_eq!(status, 200);
        let points: Vec<&Value> = chart["series"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|s| s["points"].as_array().unwrap())
            .collect();
        assert_eq!(points.len(), 3);
        for p in points {
            assert_eq!(p["launch_site"], "KSC LC-39A");
            let payload = p["payload_mass_kg"].as_f64().unwrap();
            assert!((3000.0..=6070.0).contains(&payload));
        }
    }

    #[tokio::test]
    async fn svg_endpoints_set_content_type() {
        let base = spawn_server().await;
        for path in [
            "/chart/pie.svg?site=VAFB%20SLC-4E",
            "/chart/scatter.svg?site=ALL&min=0&max=10000",
        ] {
            let resp = reqwest::get(format!("{base}{path}")).await.unwrap();
            assert_eq!(resp.status(), 200, "{path}");
            assert_eq!(resp.headers()["content-type"], "image/svg+xml");
            assert!(resp.text().await.unwrap().starts_with("<svg"));
        }
    }

    #[tokio::test]
    async fn nan_bound_is_a_json_bad_request() {
        let base = spawn_server().await;
        let (status, body) = get_json(&format!("{base}/api/scatter?min=NaN&max=100")).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("payload range"));
    }

    #[tokio::test]
    async fn unparsable_bound_is_rejected() {
        let base = spawn_server().await;
        let resp = reqwest::get(format!("{base}/chart/scatter.svg?min=heavy"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn summary_describes_dataset() {
        let base = spawn_server().await;
        let (status, summary) = get_json(&format!("{base}/api/summary")).await;
        assert_eq!(status, 200);
        assert_eq!(summary["records"], 12);
        assert_eq!(summary["successes"], 5);
        assert_eq!(summary["payload_max"], 9600.0);
        assert_eq!(summary["sites"].as_array().unwrap().len(), 4);
    }
}
