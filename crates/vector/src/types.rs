use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the product catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Opaque product identifier
    pub sku: String,

    /// Brand, may be empty
    pub brand: String,

    /// Description, may be empty
    pub description: String,

    /// Monthly demand figure (defaults to 1)
    pub monthly_quantity: u64,
}

impl CatalogEntry {
    /// Text that represents this row in embedding space
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.brand, self.description)
    }
}

/// A catalog entry paired with its embedding
#[derive(Debug, Clone)]
pub struct IndexedVector {
    pub vector: Vec<f32>,
    pub source_entry: CatalogEntry,
}

/// Nearest-neighbor hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index slot (0-based, insertion order)
    pub slot: usize,

    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Catalog index statistics
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// Vectors held by the index
    pub indexed_entries: usize,

    /// Rows whose embedding failed
    pub skipped_entries: usize,

    /// Catalog rows read
    pub total_rows: usize,

    /// Embedding dimension
    pub dimension: usize,

    /// Embedding model used
    pub embedding_model: String,

    /// When the index was built
    pub built_at: DateTime<Utc>,
}
