/// Data layer: core types, loading, and cascading filters.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────────┐
///   │ store/loader  │  read once → Arc<Dataset>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   cascade     │  per dimension: candidates, reconciled selection
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   filter      │  selection → visible indices (FilteredView)
///   └──────────────┘
/// ```

pub mod cascade;
pub mod dimension;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
