//! Query-time retrieval: embed, search, join against metadata.

use std::sync::Arc;

use tracing::{error, info};

use crate::corpus::Corpus;
use crate::document::RetrievedChunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Retrieves the chunks most similar to a query.
///
/// Embeds the query, searches the corpus index, and joins each `(id,
/// distance)` hit against the metadata store to produce ranked
/// [`RetrievedChunk`]s, most relevant first.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    corpus: Arc<Corpus>,
    snippet_len: usize,
}

impl Retriever {
    /// Create a retriever over a loaded corpus.
    ///
    /// `snippet_len` caps the character length of returned snippets.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, corpus: Arc<Corpus>, snippet_len: usize) -> Self {
        Self { embedder, corpus, snippet_len }
    }

    /// Retrieve up to `k` chunks for the query, ascending by distance.
    ///
    /// `k` is clamped to the corpus size; an empty corpus yields an empty
    /// list, never an error.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidArgument`] if `k` is zero.
    /// - [`RagError::Embedding`] if the embedder fails or returns a vector
    ///   of the wrong dimension.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(RagError::InvalidArgument("k must be greater than zero".to_string()));
        }

        let embedding = self.embedder.embed(query).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;
        if embedding.len() != self.corpus.dimension() {
            return Err(RagError::Embedding {
                provider: "query embedder".to_string(),
                message: format!(
                    "returned dimension {} but the index expects {}",
                    embedding.len(),
                    self.corpus.dimension()
                ),
            });
        }

        let hits = self.corpus.index().search(&embedding, k)?;
        let mut retrieved = Vec::with_capacity(hits.len());
        for (id, distance) in hits {
            let chunk = self.corpus.store().get(id)?;
            retrieved.push(RetrievedChunk {
                title: chunk.title.clone(),
                snippet: snippet(&chunk.text, self.snippet_len),
                distance,
            });
        }

        info!(results = retrieved.len(), "retrieval completed");
        Ok(retrieved)
    }
}

/// Produce a bounded excerpt: newlines become spaces, the result is trimmed
/// and cut at `cap` characters with an ellipsis when anything was dropped.
fn snippet(text: &str, cap: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    let flat = flat.trim();
    match flat.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}...", flat[..byte_idx].trim_end()),
        None => flat.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_returned_whole() {
        assert_eq!(snippet("The sky is blue.", 200), "The sky is blue.");
    }

    #[test]
    fn newlines_are_normalized_to_spaces() {
        assert_eq!(snippet("line one\nline two\r\nline three", 200), "line one line two  line three");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let text = "a".repeat(300);
        let s = snippet(&text, 200);
        assert_eq!(s.len(), 203);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(300);
        let s = snippet(&text, 200);
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), 203);
    }
}
