use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// LaunchOutcome – the 0/1 `class` column
// ---------------------------------------------------------------------------

/// Outcome class of a launch attempt. Ordered so that `Failure < Success`,
/// matching the numeric class values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaunchOutcome {
    Failure,
    Success,
}

impl LaunchOutcome {
    /// Numeric class value as stored in the data file.
    pub fn class(self) -> u8 {
        match self {
            LaunchOutcome::Failure => 0,
            LaunchOutcome::Success => 1,
        }
    }

    /// Interpret a numeric class value. Only 0 and 1 are valid.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(LaunchOutcome::Failure),
            1 => Some(LaunchOutcome::Success),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == LaunchOutcome::Success
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchOutcome::Failure => write!(f, "Failure"),
            LaunchOutcome::Success => write!(f, "Success"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the data file
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: LaunchOutcome,
    pub booster_version_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    /// All launches, in file order.
    pub records: Vec<LaunchRecord>,
    /// Sorted unique launch site names.
    pub sites: Vec<String>,
    /// Sorted unique booster version categories.
    pub booster_categories: BTreeSet<String>,
    /// Smallest payload mass in the dataset (0.0 when empty).
    pub payload_min: f64,
    /// Largest payload mass in the dataset (0.0 when empty).
    pub payload_max: f64,
}

impl LaunchDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: BTreeSet<String> = BTreeSet::new();
        let mut booster_categories: BTreeSet<String> = BTreeSet::new();
        let mut payload_min = f64::INFINITY;
        let mut payload_max = f64::NEG_INFINITY;

        for rec in &records {
            sites.insert(rec.launch_site.clone());
            booster_categories.insert(rec.booster_version_category.clone());
            payload_min = payload_min.min(rec.payload_mass_kg);
            payload_max = payload_max.max(rec.payload_mass_kg);
        }

        if records.is_empty() {
            payload_min = 0.0;
            payload_max = 0.0;
        }

        LaunchDataset {
            records,
            sites: sites.into_iter().collect(),
            booster_categories,
            payload_min,
            payload_max,
        }
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of successful launches across all sites.
    pub fn success_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }
}
