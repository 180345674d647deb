use std::fmt;

use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord};

/// Site-selector value that stands for every launch site.
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Filter predicates: site selection and payload range
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("payload range bound is not a number")]
    NotANumber,
}

/// Which launch sites a chart covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Interpret a selector value. `ALL` (or nothing) selects every site,
    /// anything else names a single site.
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_SITES) => SiteSelection::All,
            Some(site) => SiteSelection::Site(site.to_string()),
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.launch_site == *site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "{ALL_SITES}"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

/// Inclusive payload-mass interval in kilograms. Always `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Build a range from two bounds, swapping them if given in reverse.
    pub fn new(a: f64, b: f64) -> Result<Self, SelectionError> {
        if a.is_nan() || b.is_nan() {
            return Err(SelectionError::NotANumber);
        }
        Ok(PayloadRange {
            low: a.min(b),
            high: a.max(b),
        })
    }

    /// The range spanning every payload in the dataset.
    pub fn full(dataset: &LaunchDataset) -> Self {
        PayloadRange {
            low: dataset.payload_min,
            high: dataset.payload_max,
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

/// Return indices of launches from the selected site(s).
pub fn records_for_site(dataset: &LaunchDataset, site: &SiteSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| site.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of launches whose payload lies within `range`.
pub fn records_in_range(dataset: &LaunchDataset, range: &PayloadRange) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.payload_mass_kg))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of launches passing both the site and payload filters,
/// in file order.
pub fn filtered_indices(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Vec<usize> {
    records_in_range(dataset, range)
        .into_iter()
        .filter(|&i| site.matches(&dataset.records[i]))
        .collect()
}
