/// Data layer: cell and table types, CSV loading, merging and writing.
///
/// Architecture:
/// ```text
///  dir/a.csv  dir/b.csv  ...        single.csv
///        │                               │
///        ▼                               │
///   ┌──────────┐                         │
///   │  loader   │  keys + value column   │
///   └──────────┘  renamed to file stem   │
///        │                               │
///        ▼                               │
///   ┌──────────┐                         │
///   │  merge    │  full outer join       │
///   └──────────┘  on key columns         │
///        │                               │
///        ▼                               ▼
///   ┌──────────────────────────────────────┐
///   │ Table  columns + rows of CellValue    │
///   └──────────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  CSV, no index column
///   └──────────┘
/// ```

pub mod loader;
pub mod merge;
pub mod model;
pub mod writer;
