//! The built corpus: one vector index plus its aligned metadata store.
//!
//! [`Corpus`] is the single owner of the id-alignment invariant: chunks and
//! their embeddings enter through one [`append`](Corpus::append) call that
//! updates both members or neither, so positions can never drift.

use std::path::Path;

use tracing::info;

use crate::document::Chunk;
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;
use crate::store::MetadataStore;

/// A searchable corpus: vectors and their parallel chunk records.
///
/// Append-only during a build, read-only afterwards. A corpus update means
/// a full rebuild producing wholly new artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    index: FlatL2Index,
    store: MetadataStore,
}

impl Corpus {
    /// Create an empty corpus for vectors of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `dimension` is zero.
    pub fn new(dimension: usize) -> Result<Self> {
        Ok(Self { index: FlatL2Index::new(dimension)?, store: MetadataStore::new() })
    }

    /// Append chunks and their embeddings as one transaction.
    ///
    /// `chunks[i]` must be the text that produced `embeddings[i]`; this
    /// call gives it id `i` relative to the current count in both the index
    /// and the store. Nothing is appended on error.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidArgument`] if the slices differ in length.
    /// - [`RagError::DimensionMismatch`] if any embedding has the wrong
    ///   dimension.
    pub fn append(&mut self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(RagError::InvalidArgument(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }
        // index.add validates every dimension before appending anything,
        // so the store append below cannot leave the two out of step
        self.index.add(embeddings)?;
        self.store.append(chunks);
        Ok(())
    }

    /// The shared vector dimension.
    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// The number of indexed chunks.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the corpus holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The underlying vector index.
    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    /// The underlying metadata store.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Write both artifacts: the index file and the metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Persist`] on I/O or encoding failure.
    pub fn persist(&self, index_path: &Path, metadata_path: &Path) -> Result<()> {
        self.index.persist(index_path)?;
        self.store.persist(metadata_path)?;
        info!(
            chunks = self.len(),
            index = %index_path.display(),
            metadata = %metadata_path.display(),
            "persisted corpus artifacts"
        );
        Ok(())
    }

    /// Load both artifacts produced by the same build.
    ///
    /// Refuses artifact pairs whose lengths disagree, since a mismatched
    /// pair would silently corrupt answers.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Persist`] on I/O or decoding failure, or if the
    /// two artifacts are not aligned.
    pub fn load(index_path: &Path, metadata_path: &Path) -> Result<Self> {
        let index = FlatL2Index::load(index_path)?;
        let store = MetadataStore::load(metadata_path)?;
        if index.count() != store.len() {
            return Err(RagError::Persist {
                path: metadata_path.display().to_string(),
                message: format!(
                    "artifact mismatch: index holds {} vectors, metadata holds {} chunks",
                    index.count(),
                    store.len()
                ),
            });
        }
        info!(chunks = store.len(), "loaded corpus artifacts");
        Ok(Self { index, store })
    }
}
