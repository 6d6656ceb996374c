/// Data layer: core types, loading, and row filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  header order + Vec<Row>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  annotate / highlight markers → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
