use std::collections::BTreeMap;

use serde::Serialize;

use super::ChartColors;
use crate::color::Color;
use crate::data::filter::{SiteSelection, records_for_site};
use crate::data::model::{LaunchDataset, LaunchOutcome};

// ---------------------------------------------------------------------------
// Success pie chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// Build the success pie for the selected site(s).
///
/// * `All` – one slice per launch site, valued by its number of successful
///   launches (sites without a success still get a zero slice).
/// * `Site` – the site's launches counted per outcome class, Failure first.
///   Only classes that occur get a slice.
pub fn success_pie(
    dataset: &LaunchDataset,
    colors: &ChartColors,
    site: &SiteSelection,
) -> PieChart {
    match site {
        SiteSelection::All => {
            let mut successes: BTreeMap<&str, usize> = dataset
                .sites
                .iter()
                .map(|s| (s.as_str(), 0))
                .collect();
            for rec in dataset.records.iter().filter(|r| r.outcome.is_success()) {
                *successes.entry(rec.launch_site.as_str()).or_default() += 1;
            }

            PieChart {
                title: "Total Successful Launches by Site".to_string(),
                slices: successes
                    .into_iter()
                    .map(|(site, value)| PieSlice {
                        label: site.to_string(),
                        value,
                        color: colors.sites.color_for(site),
                    })
                    .collect(),
            }
        }
        SiteSelection::Site(name) => {
            let mut counts: BTreeMap<LaunchOutcome, usize> = BTreeMap::new();
            for i in records_for_site(dataset, site) {
                *counts.entry(dataset.records[i].outcome).or_default() += 1;
            }

            PieChart {
                title: format!("Launch Outcomes for Site {name}"),
                slices: counts
                    .into_iter()
                    .map(|(outcome, value)| PieSlice {
                        label: format!("{outcome} ({})", outcome.class()),
                        value,
                        color: outcome_color(outcome),
                    })
                    .collect(),
            }
        }
    }
}

fn outcome_color(outcome: LaunchOutcome) -> Color {
    match outcome {
        LaunchOutcome::Failure => Color::FAILURE,
        LaunchOutcome::Success => Color::SUCCESS,
    }
}
