mod chart;
mod color;
mod config;
mod data;
mod state;
mod web;

use config::DashboardConfig;
use state::AppState;
use web::DashboardServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_env();

    // The dataset is loaded exactly once; a bad file stops startup.
    let dataset = match data::loader::load_file(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load launch records: {e:#}");
            return Err(e);
        }
    };
    log::info!(
        "Loaded {} launch records ({} successful) from sites {:?}",
        dataset.len(),
        dataset.success_count(),
        dataset.sites
    );

    DashboardServer::new(AppState::new(dataset, config)).serve().await
}
