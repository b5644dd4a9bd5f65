/// Data layer: core types, retrieval, decompression, parsing, naming.
///
/// Architecture:
/// ```text
///  https://… / file path
///        │
///        ▼
///   ┌──────────┐
///   │  fetch    │  raw bytes (gzip envelope)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  gunzip → temp file → Parquet → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  canonical, unique column names
///   └───────────┘
/// ```

pub mod error;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod normalize;

pub use error::{LoadError, LoadErrorKind};
pub use fetch::FetchOptions;
pub use loader::load_dataset;
pub use model::{Column, Dataset, Value};
