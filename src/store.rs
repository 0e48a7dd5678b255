//! Ordered chunk metadata store, index-aligned to the vector index.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// An ordered store of [`Chunk`] records.
///
/// Position `i` holds the chunk whose embedding has id `i` in the parallel
/// [`FlatL2Index`](crate::index::FlatL2Index). That alignment is established
/// by [`Corpus::append`](crate::corpus::Corpus::append) during the build and
/// never re-validated at query time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetadataStore {
    chunks: Vec<Chunk>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append chunks in order, preserving insertion positions.
    pub fn append(&mut self, chunks: &[Chunk]) {
        self.chunks.extend_from_slice(chunks);
    }

    /// Return the chunk at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::OutOfRange`] if `id` is not a valid position.
    /// Search ids are bounded by store length by construction, so hitting
    /// this from the query path indicates a corruption bug.
    pub fn get(&self, id: usize) -> Result<&Chunk> {
        self.chunks.get(id).ok_or(RagError::OutOfRange { id, len: self.chunks.len() })
    }

    /// The number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over chunks in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Serialize the full ordered sequence to a file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Persist`] on I/O or encoding failure.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| persist_err(path, &e))?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(|e| persist_err(path, &e))
    }

    /// Deserialize a store previously written by [`persist`](Self::persist).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Persist`] on I/O or decoding failure.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| persist_err(path, &e))?;
        bincode::deserialize_from(BufReader::new(file)).map_err(|e| persist_err(path, &e))
    }
}

fn persist_err(path: &Path, err: &dyn std::fmt::Display) -> RagError {
    RagError::Persist { path: path.display().to_string(), message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, seq: usize) -> Chunk {
        Chunk { title: "t".to_string(), text: text.to_string(), seq }
    }

    #[test]
    fn append_preserves_order() {
        let mut store = MetadataStore::new();
        store.append(&[chunk("a", 0), chunk("b", 1)]);
        store.append(&[chunk("c", 0)]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap().text, "a");
        assert_eq!(store.get(2).unwrap().text, "c");
    }

    #[test]
    fn out_of_range_id_is_an_error() {
        let store = MetadataStore::new();
        assert!(matches!(store.get(0), Err(RagError::OutOfRange { id: 0, len: 0 })));
    }
}
