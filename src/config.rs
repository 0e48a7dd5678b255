//! Configuration for the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default separator list, coarsest to finest.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

/// Configuration parameters for the pipeline.
///
/// These affect retrieval breadth and prompt size, never the alignment
/// invariants between the index and the metadata store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Target maximum chunk size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Separators tried coarsest-first when splitting documents.
    pub separators: Vec<String>,
    /// Number of nearest chunks to retrieve per query.
    pub top_k: usize,
    /// Character cap for retrieved snippets.
    pub snippet_len: usize,
    /// Input token budget hint passed to the generator.
    pub max_input_tokens: usize,
    /// Output token budget hint passed to the generator.
    pub max_output_tokens: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 600,
            chunk_overlap: 50,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            top_k: 5,
            snippet_len: 200,
            max_input_tokens: 512,
            max_output_tokens: 150,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the target maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Replace the separator list. Order is coarsest to finest.
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of nearest chunks retrieved per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the character cap for retrieved snippets.
    pub fn snippet_len(mut self, len: usize) -> Self {
        self.config.snippet_len = len;
        self
    }

    /// Set the input token budget hint for the generator.
    pub fn max_input_tokens(mut self, tokens: usize) -> Self {
        self.config.max_input_tokens = tokens;
        self
    }

    /// Set the output token budget hint for the generator.
    pub fn max_output_tokens(mut self, tokens: usize) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `snippet_len == 0`
    /// - any separator is empty
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.snippet_len == 0 {
            return Err(RagError::Config("snippet_len must be greater than zero".to_string()));
        }
        if self.config.separators.iter().any(|s| s.is_empty()) {
            return Err(RagError::Config("separators must not be empty strings".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_settings() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 600);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.snippet_len, 200);
    }

    #[test]
    fn builder_rejects_overlap_not_below_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build();
        assert!(matches!(err, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        let err = RagConfig::builder().top_k(0).build();
        assert!(matches!(err, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_rejects_zero_chunk_size() {
        let err = RagConfig::builder().chunk_size(0).build();
        assert!(matches!(err, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_accepts_custom_separators() {
        let config = RagConfig::builder().separators(["\n\n", " "]).build().unwrap();
        assert_eq!(config.separators, vec!["\n\n".to_string(), " ".to_string()]);
    }
}
