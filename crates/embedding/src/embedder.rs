use async_trait::async_trait;
use rfqmatch_common::Result;

/// Common trait for embedding providers
///
/// An `Err` is a per-item embedding failure: callers skip the item
/// rather than abort the surrounding operation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model name the vectors come from
    fn model(&self) -> &str;
}

/// Collapse newlines to spaces and trim, as sent to the provider
pub fn prepare_input(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}
