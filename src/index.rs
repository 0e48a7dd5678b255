//! Flat brute-force L2 vector index.
//!
//! [`FlatL2Index`] stores fixed-dimension vectors contiguously, assigns
//! 0-based insertion ids, and answers nearest-neighbor queries by exhaustive
//! Euclidean distance. Exact search is part of the contract: an approximate
//! index would change ranking order.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RagError, Result};

/// An append-only flat index over fixed-dimension vectors.
///
/// Ids are assigned sequentially from 0 in insertion order and are
/// contiguous, so they double as positions in the parallel
/// [`MetadataStore`](crate::store::MetadataStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    /// Vectors stored back to back; vector `i` occupies
    /// `data[i * dimension .. (i + 1) * dimension]`.
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Allocate an empty index for vectors of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `dimension` is zero.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(RagError::Config("index dimension must be greater than zero".to_string()));
        }
        Ok(Self { dimension, data: Vec::new() })
    }

    /// The dimension every stored and queried vector must have.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of stored vectors.
    pub fn count(&self) -> usize {
        self.data.len() / self.dimension
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append vectors in input order, assigning each the next sequential id.
    ///
    /// The operation is all-or-nothing: dimensions are validated up front,
    /// so a mismatch partway through the input leaves the index unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if any vector's length
    /// differs from the index dimension.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(RagError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }
        self.data.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Return the `min(k, count)` stored vectors nearest to `query`,
    /// as `(id, distance)` pairs in ascending Euclidean distance.
    ///
    /// Ties are broken by ascending id so results are deterministic. An
    /// empty index yields an empty result, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the query vector's length
    /// differs from the index dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(id, vector)| (id, l2_distance(query, vector)))
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        debug!(k, results = scored.len(), "index search");
        Ok(scored)
    }

    /// Serialize the full index (dimension + vectors) to a file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Persist`] on I/O or encoding failure.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| persist_err(path, &e))?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(|e| persist_err(path, &e))
    }

    /// Deserialize an index previously written by [`persist`](Self::persist).
    ///
    /// A round trip preserves search results bit for bit.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Persist`] on I/O or decoding failure, or if the
    /// decoded index is internally inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| persist_err(path, &e))?;
        let index: Self =
            bincode::deserialize_from(BufReader::new(file)).map_err(|e| persist_err(path, &e))?;
        if index.dimension == 0 || index.data.len() % index.dimension != 0 {
            return Err(RagError::Persist {
                path: path.display().to_string(),
                message: format!(
                    "corrupt index: {} floats is not a multiple of dimension {}",
                    index.data.len(),
                    index.dimension
                ),
            });
        }
        Ok(index)
    }
}

/// Euclidean distance between two equal-length vectors.
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

fn persist_err(path: &Path, err: &dyn std::fmt::Display) -> RagError {
    RagError::Persist { path: path.display().to_string(), message: err.to_string() }
}
