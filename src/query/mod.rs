/// Query layer: column selection and SQL rendering.
///
/// Architecture:
/// ```text
///  rerun + PhotometrySelection
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  assemble alias → column mapping (ColumnSpec)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   sql     │  render "column AS alias" fragments and query templates
///   └──────────┘
/// ```
pub mod columns;
pub mod sql;
