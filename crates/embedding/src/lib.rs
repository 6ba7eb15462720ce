//! RFQ matcher embedding integration
//!
//! Embedder trait and OpenAI-compatible embeddings client

mod client;
mod embedder;
mod types;

pub use client::OpenAiClient;
pub use embedder::{prepare_input, Embedder};
pub use types::{EmbedData, EmbedRequest, EmbedResponse};
