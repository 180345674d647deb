use std::collections::BTreeMap;

use serde::Serialize;

use super::ChartColors;
use crate::color::Color;
use crate::data::filter::{PayloadRange, SiteSelection, filtered_indices};
use crate::data::loader::COL_PAYLOAD_MASS;
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
    pub launch_site: String,
}

/// All points of one booster version category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Color,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Name of the column the series are split by.
    pub legend_title: String,
    /// The selected payload range; drawn as the x-axis extent.
    pub x_min: f64,
    pub x_max: f64,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.points().count()
    }

    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

/// Build the payload scatter: launches inside `range` (inclusive) from the
/// selected site(s), one series per booster version category.
pub fn payload_scatter(
    dataset: &LaunchDataset,
    colors: &ChartColors,
    site: &SiteSelection,
    range: &PayloadRange,
) -> ScatterChart {
    let mut by_category: BTreeMap<&str, Vec<ScatterPoint>> = BTreeMap::new();
    for i in filtered_indices(dataset, site, range) {
        let rec = &dataset.records[i];
        by_category
            .entry(rec.booster_version_category.as_str())
            .or_default()
            .push(ScatterPoint {
                payload_mass_kg: rec.payload_mass_kg,
                class: rec.outcome.class(),
                launch_site: rec.launch_site.clone(),
            });
    }

    let title = match site {
        SiteSelection::All => "Payload Mass vs. Launch Outcome for All Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload Mass vs. Launch Outcome for Site {name}"),
    };

    ScatterChart {
        title,
        x_label: COL_PAYLOAD_MASS.to_string(),
        y_label: "class".to_string(),
        legend_title: colors.boosters.column.clone(),
        x_min: range.low(),
        x_max: range.high(),
        series: by_category
            .into_iter()
            .map(|(category, points)| ScatterSeries {
                name: category.to_string(),
                color: colors.boosters.color_for(category),
                points,
            })
            .collect(),
    }
}
