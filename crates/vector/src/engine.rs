use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use rfqmatch_common::{normalize, Result, RfqMatchError};
use rfqmatch_embedding::Embedder;
use tracing::{debug, info, warn};

use crate::index::FlatIndex;
use crate::types::{CatalogEntry, IndexStats, IndexedVector, Neighbor};

/// Catalog index build options
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// In-flight embedding requests
    pub concurrency: usize,

    /// Required embedding dimension, if pinned by configuration
    pub expected_dimension: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            expected_dimension: None,
        }
    }
}

/// Immutable catalog search index
///
/// Built once at startup; slot `i` of the index maps to `entries[i]`.
#[derive(Debug)]
pub struct CatalogIndex {
    index: FlatIndex,
    entries: Vec<CatalogEntry>,
    total_rows: usize,
    embedding_model: String,
    built_at: DateTime<Utc>,
}

impl CatalogIndex {
    /// Embed every catalog row and build the index
    ///
    /// Rows whose embedding fails are skipped. Zero successful rows is an error.
    pub async fn build(
        rows: Vec<CatalogEntry>,
        embedder: &dyn Embedder,
        options: &BuildOptions,
    ) -> Result<Self> {
        let total_rows = rows.len();
        info!(
            "Building catalog index - {} rows, model={}, concurrency={}",
            total_rows,
            embedder.model(),
            options.concurrency
        );

        // `buffered` yields results in row order, so slots follow catalog order
        let results: Vec<(CatalogEntry, Result<Vec<f32>>)> = stream::iter(rows)
            .map(|entry| async move {
                let text = normalize(&entry.combined_text());
                let embedding = embedder.embed(&text).await;
                (entry, embedding)
            })
            .buffered(options.concurrency.max(1))
            .collect()
            .await;

        let mut dimension = options.expected_dimension;
        let mut indexed = Vec::with_capacity(results.len());

        for (row, (entry, embedding)) in results.into_iter().enumerate() {
            let vector = match embedding {
                Ok(vector) => vector,
                Err(e) => {
                    warn!("Skipping catalog row {} (SKU {}): {}", row, entry.sku, e);
                    continue;
                }
            };

            if vector.is_empty() {
                warn!("Skipping catalog row {} (SKU {}): empty embedding", row, entry.sku);
                continue;
            }

            let expected = *dimension.get_or_insert(vector.len());
            if vector.len() != expected {
                warn!(
                    "Skipping catalog row {} (SKU {}): embedding dimension {} != {}",
                    row,
                    entry.sku,
                    vector.len(),
                    expected
                );
                continue;
            }

            indexed.push(IndexedVector {
                vector,
                source_entry: entry,
            });
        }

        Self::from_indexed(indexed, total_rows, embedder.model())
    }

    /// Build from already-embedded rows
    pub fn from_indexed(
        indexed: Vec<IndexedVector>,
        total_rows: usize,
        embedding_model: impl Into<String>,
    ) -> Result<Self> {
        if indexed.is_empty() {
            return Err(RfqMatchError::catalog(
                "No embeddings generated. Check your API key or data format.",
            ));
        }

        let (vectors, entries): (Vec<Vec<f32>>, Vec<CatalogEntry>) = indexed
            .into_iter()
            .map(|iv| (iv.vector, iv.source_entry))
            .unzip();

        let index = FlatIndex::from_vectors(&vectors)?;
        let skipped = total_rows.saturating_sub(entries.len());

        info!(
            "Catalog index built - {} vectors (dim={}), {} rows skipped",
            index.len(),
            index.dim(),
            skipped
        );

        Ok(Self {
            index,
            entries,
            total_rows,
            embedding_model: embedding_model.into(),
            built_at: Utc::now(),
        })
    }

    /// Nearest catalog slots for a query vector
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let hits = self.index.search(query, k)?;
        debug!("Index search returned {} neighbors (k={})", hits.len(), k);
        Ok(hits)
    }

    /// Catalog entry stored at an index slot
    pub fn entry(&self, slot: usize) -> Option<&CatalogEntry> {
        self.entries.get(slot)
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension
    pub fn dimension(&self) -> usize {
        self.index.dim()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            indexed_entries: self.len(),
            skipped_entries: self.total_rows.saturating_sub(self.len()),
            total_rows: self.total_rows,
            dimension: self.dimension(),
            embedding_model: self.embedding_model.clone(),
            built_at: self.built_at,
        }
    }
}
