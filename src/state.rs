use serde::Serialize;

use crate::chart::{self, ChartColors, PieChart, ScatterChart};
use crate::color::Color;
use crate::config::DashboardConfig;
use crate::data::filter::{PayloadRange, SelectionError, SiteSelection};
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything a request handler needs.  Built once at startup and shared
/// read-only between requests.
pub struct AppState {
    pub dataset: LaunchDataset,
    pub colors: ChartColors,
    pub config: DashboardConfig,
}

/// Overview of the loaded dataset, served as JSON.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub successes: usize,
    pub sites: Vec<String>,
    pub booster_categories: Vec<(String, Color)>,
    pub payload_min: f64,
    pub payload_max: f64,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, config: DashboardConfig) -> Self {
        let colors = ChartColors::for_dataset(&dataset);
        Self {
            dataset,
            colors,
            config,
        }
    }

    pub fn pie(&self, site: &SiteSelection) -> PieChart {
        chart::success_pie(&self.dataset, &self.colors, site)
    }

    pub fn scatter(&self, site: &SiteSelection, range: &PayloadRange) -> ScatterChart {
        chart::payload_scatter(&self.dataset, &self.colors, site, range)
    }

    /// Resolve optional payload bounds against the dataset.  A missing bound
    /// falls back to the dataset's own minimum or maximum.
    pub fn payload_range(
        &self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<PayloadRange, SelectionError> {
        let full = PayloadRange::full(&self.dataset);
        PayloadRange::new(min.unwrap_or(full.low()), max.unwrap_or(full.high()))
    }

    /// Payload selector bounds: the configured slider extent, widened to the
    /// dataset bounds when the data falls outside it.
    pub fn slider_bounds(&self) -> (f64, f64) {
        let lo = (self.config.slider_min as f64).min(self.dataset.payload_min.floor());
        let hi = (self.config.slider_max as f64).max(self.dataset.payload_max.ceil());
        (lo, hi)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.dataset.len(),
            successes: self.dataset.success_count(),
            sites: self.dataset.sites.clone(),
            booster_categories: self.colors.boosters.legend_entries(),
            payload_min: self.dataset.payload_min,
            payload_max: self.dataset.payload_max,
        }
    }
}
