//! RFQ matcher vector search
//!
//! Catalog ingestion, embedding and flat nearest-neighbor index

mod catalog;
mod engine;
mod index;
mod types;

pub use catalog::{load_catalog, parse_quantity, read_catalog};
pub use engine::{BuildOptions, CatalogIndex};
pub use index::FlatIndex;
pub use types::{CatalogEntry, IndexStats, IndexedVector, Neighbor};
