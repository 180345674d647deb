/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, site / booster index, payload bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site selection + payload range → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
