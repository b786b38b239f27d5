/// Data layer: digest types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  latest_dashboard_data.json  (file or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse document → Digest
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Digest   │  Vec<Article>, area / term option sets
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → visible indices (sorted)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  visible → sources / areas / dates tables
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod test_fixtures;
