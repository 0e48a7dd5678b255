//! Generation capability trait.

use async_trait::async_trait;

use crate::error::Result;

/// Token budgets passed through to the generator.
///
/// Enforcement (input truncation, output cap) belongs to the concrete
/// backend; the pipeline only carries the numbers from its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Maximum prompt tokens the backend should accept before truncating.
    pub max_input_tokens: usize,
    /// Maximum tokens the backend should generate.
    pub max_output_tokens: usize,
}

/// A capability that produces an answer string from a prompt.
///
/// Like [`EmbeddingProvider`](crate::embedding::EmbeddingProvider), this
/// hides the concrete model so the pipeline can be exercised with a
/// deterministic fake in tests.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for the given prompt.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}
