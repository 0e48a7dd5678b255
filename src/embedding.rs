//! Embedding capability trait.

use async_trait::async_trait;

use crate::error::Result;

/// A capability that maps text to a fixed-dimension vector.
///
/// Implementations wrap concrete embedding backends behind a unified async
/// interface; the pipeline never names a model. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially, preserving input order;
/// backends with native batching should override it, but must keep the
/// output aligned with the input order.
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::EmbeddingProvider;
///
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of inputs, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
