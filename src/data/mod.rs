/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CrossingDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ CrossingDataset  │  Vec<CrossingRecord>, year index
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐   ┌────────────┐
///   │  filter   │──▶│ aggregate   │  shares, series, heat points, titles
///   └──────────┘   └────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
