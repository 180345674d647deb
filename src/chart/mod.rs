/// Chart layer: derived sub-tables → chart specifications → SVG.
///
/// `pie` and `scatter` are the two reactive handlers.  Both are pure
/// functions of the dataset and the current input values; `render` draws the
/// resulting specifications.

pub mod pie;
pub mod render;
pub mod scatter;

use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::data::loader::{COL_BOOSTER_CATEGORY, COL_LAUNCH_SITE};
use crate::data::model::LaunchDataset;

pub use pie::{PieChart, success_pie};
pub use scatter::{ScatterChart, payload_scatter};

/// Dataset-wide colour assignments shared by both charts.
#[derive(Debug, Clone)]
pub struct ChartColors {
    pub sites: ColorMap,
    pub boosters: ColorMap,
}

impl ChartColors {
    pub fn for_dataset(dataset: &LaunchDataset) -> Self {
        let sites: BTreeSet<String> = dataset.sites.iter().cloned().collect();
        ChartColors {
            sites: ColorMap::new(COL_LAUNCH_SITE, &sites),
            boosters: ColorMap::new(COL_BOOSTER_CATEGORY, &dataset.booster_categories),
        }
    }
}
