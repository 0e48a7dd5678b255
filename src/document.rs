//! Data types for documents, chunks, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A normalized source record produced by an upstream document extractor.
///
/// The pipeline only requires `title` and `text`; any additional fields a
/// Document Source emits are carried through as opaque string metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Human-readable title of the source record.
    pub title: String,
    /// The full text content. Never empty for a valid document.
    pub text: String,
    /// Opaque key-value metadata passed through from the source record.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A bounded slice of a [`Document`]'s text.
///
/// Chunks inherit the parent title and record their position in the
/// document's chunk sequence. Text is trimmed before emission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Title inherited from the parent document.
    pub title: String,
    /// The trimmed chunk text.
    pub text: String,
    /// 0-based position of this chunk within its document's chunk sequence.
    pub seq: usize,
}

/// A search result: one retrieved chunk with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Title of the chunk's source document.
    pub title: String,
    /// A bounded-length, newline-normalized excerpt of the chunk text.
    pub snippet: String,
    /// Euclidean distance to the query vector. Lower is more similar.
    pub distance: f32,
}

/// Summary of one build run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildReport {
    /// Number of documents successfully ingested.
    pub documents: usize,
    /// Number of chunks embedded and indexed.
    pub chunks: usize,
    /// Number of malformed source records skipped.
    pub skipped_records: usize,
}

/// The outcome of one query invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The generated answer.
    pub answer: String,
    /// The chunks that grounded the answer, most relevant first.
    pub retrieved: Vec<RetrievedChunk>,
}
