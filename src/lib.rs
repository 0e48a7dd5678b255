//! Retrieval-augmented question answering over normalized text documents.
//!
//! The pipeline ingests `{title, text}` JSONL records, splits them into
//! overlapping chunks, embeds the chunks, stores the vectors in a flat L2
//! index with an aligned metadata store, and at query time retrieves the
//! nearest chunks to ground a generated answer.
//!
//! Two flows:
//!
//! - **Build**: [`RagPipeline::build_from_dir`] — documents → chunks →
//!   embeddings → persisted index + metadata artifacts.
//! - **Query**: [`RagPipeline::answer`] — question → retrieval → prompt →
//!   generated answer.
//!
//! The embedding and generation models are capability traits
//! ([`EmbeddingProvider`], [`Generator`]); any backend can be plugged in,
//! and tests run with deterministic fakes.

pub mod chunking;
pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod source;
pub mod store;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{DEFAULT_SEPARATORS, RagConfig, RagConfigBuilder};
pub use corpus::Corpus;
pub use document::{BuildReport, Chunk, Document, QueryResponse, RetrievedChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::{GenerationOptions, Generator};
pub use index::FlatL2Index;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::PromptBuilder;
pub use retriever::Retriever;
pub use store::MetadataStore;
