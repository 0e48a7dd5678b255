//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`],
//! which splits text hierarchically on a prioritized separator list
//! (paragraph breaks, then line breaks, then sentence ends, then spaces)
//! while carrying a configurable overlap between consecutive chunks.

use crate::config::RagConfig;
use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce trimmed [`Chunk`]s in document reading order.
/// Empty or whitespace-only input yields no chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text recursively on a coarsest-first separator list.
///
/// Segments are merged up to `chunk_size`; a segment that still exceeds the
/// budget is re-split with the next finer separator, and text with no
/// separator match at the finest level is hard-split at `chunk_size`. When a
/// chunk is emitted, its trailing `chunk_overlap` characters seed the next
/// chunk so context survives the boundary.
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(600, 50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a chunker with the default separator list
    /// (`"\n\n"`, `"\n"`, `"."`, `" "`).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: crate::config::DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a chunker with a custom separator list, coarsest first.
    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: Vec<String>,
    ) -> Self {
        Self { chunk_size, chunk_overlap, separators }
    }

    /// Create a chunker from a validated [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separators: config.separators.clone(),
        }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        let separators: Vec<&str> = self.separators.iter().map(String::as_str).collect();
        let raw = split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &separators);

        raw.into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(seq, text)| Chunk { title: document.title.clone(), text, seq })
            .collect()
    }
}

/// Split text on the first separator, merge segments up to `chunk_size`,
/// and recurse with finer separators for oversize segments. Each emitted
/// chunk's trailing `chunk_overlap` characters are prepended to the next.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }
    if separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining = &separators[1..];
    let segments = split_keeping_separator(text, separator);

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if !current.is_empty() && current.len() + segment.len() > chunk_size {
            let carry = flush(&mut chunks, current, chunk_size, chunk_overlap, remaining);
            current = carry;
        }
        current.push_str(segment);
    }

    if !current.is_empty() {
        flush(&mut chunks, current, chunk_size, chunk_overlap, remaining);
    }

    chunks
}

/// Emit a full chunk (recursing if it still exceeds the budget) and return
/// the overlap carry for the next chunk.
fn flush(
    chunks: &mut Vec<String>,
    current: String,
    chunk_size: usize,
    chunk_overlap: usize,
    remaining: &[&str],
) -> String {
    if current.len() > chunk_size {
        chunks.extend(split_and_merge(&current, chunk_size, chunk_overlap, remaining));
    } else {
        chunks.push(current);
    }
    chunks.last().map(|last| overlap_tail(last, chunk_overlap).to_string()).unwrap_or_default()
}

/// Split text at a separator, keeping the separator attached to the
/// preceding segment so no characters are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Hard character-based splitting with overlap, for text with no separator
/// match at the finest level.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_char_boundary(text, (start + chunk_size).min(text.len()));
        if end <= start {
            // chunk_size smaller than one char; take the char anyway
            end = ceil_char_boundary(text, start + 1);
        }
        chunks.push(text[start..end].to_string());
        if end == text.len() {
            break;
        }
        start = ceil_char_boundary(text, start + step);
    }

    chunks
}

/// The trailing `overlap` bytes of `text`, snapped to a char boundary.
fn overlap_tail(text: &str, overlap: usize) -> &str {
    if overlap == 0 || text.is_empty() {
        return "";
    }
    let start = ceil_char_boundary(text, text.len().saturating_sub(overlap));
    &text[start..]
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
