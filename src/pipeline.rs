//! Pipeline orchestration.
//!
//! The [`RagPipeline`] composes an [`EmbeddingProvider`], a [`Generator`],
//! a [`Chunker`], and a [`PromptBuilder`] around two flows:
//!
//! - **Build**: documents → chunks → embeddings → [`Corpus`] → persisted
//!   artifacts. Sequential and non-resumable; persistence is strictly the
//!   last step, so a half-built index is never written.
//! - **Query**: load corpus → embed question → retrieve → prompt → generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragpipe::{RagPipeline, RagConfig, RecursiveChunker};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! let report = pipeline.build_from_dir(&jsonl_dir, &index_path, &meta_path).await?;
//! let response = pipeline.answer(&index_path, &meta_path, "What changed?").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::corpus::Corpus;
use crate::document::{BuildReport, Document, QueryResponse};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::{GenerationOptions, Generator};
use crate::prompt::PromptBuilder;
use crate::retriever::Retriever;
use crate::source;

/// The pipeline orchestrator.
///
/// Construct one per process via [`RagPipeline::builder()`] and reuse it
/// across builds and queries; the capabilities it holds are loaded once.
pub struct RagPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn Generator>,
    chunker: Arc<dyn Chunker>,
    prompt: PromptBuilder,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Build an in-memory corpus from documents: chunk → embed → index.
    ///
    /// Chunks are embedded and appended in document reading order, which is
    /// what keeps vector ids aligned with metadata positions. Documents
    /// whose text chunks to nothing are counted but add no chunks.
    ///
    /// # Errors
    ///
    /// Aborts on the first failure ([`RagError::Config`] for a zero
    /// embedder dimension, [`RagError::Embedding`],
    /// [`RagError::DimensionMismatch`]); the log records how far the build
    /// got before the error.
    pub async fn build(&self, documents: &[Document]) -> Result<(Corpus, BuildReport)> {
        let mut corpus = Corpus::new(self.embedder.dimensions())?;
        let mut report = BuildReport::default();

        for document in documents {
            let chunks = self.chunker.chunk(document);
            report.documents += 1;
            if chunks.is_empty() {
                continue;
            }

            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
                error!(
                    title = %document.title,
                    documents = report.documents,
                    chunks = report.chunks,
                    error = %e,
                    "embedding failed during build"
                );
            })?;

            // one transaction per document: both stores advance together
            corpus.append(&chunks, &embeddings).inspect_err(|e| {
                error!(title = %document.title, error = %e, "indexing failed during build");
            })?;
            report.chunks += chunks.len();
        }

        info!(documents = report.documents, chunks = report.chunks, "built corpus");
        Ok((corpus, report))
    }

    /// Build from documents and persist both artifacts.
    ///
    /// Persistence happens only after every chunk is embedded and indexed;
    /// a failed build writes nothing.
    pub async fn build_and_persist(
        &self,
        documents: &[Document],
        index_path: &Path,
        metadata_path: &Path,
    ) -> Result<BuildReport> {
        let (corpus, report) = self.build(documents).await?;
        corpus.persist(index_path, metadata_path)?;
        Ok(report)
    }

    /// Build from a directory of `*.jsonl` files and persist both artifacts.
    ///
    /// Malformed records are skipped and counted in the report; only I/O
    /// failures or pipeline-stage failures abort the build.
    pub async fn build_from_dir(
        &self,
        jsonl_dir: &Path,
        index_path: &Path,
        metadata_path: &Path,
    ) -> Result<BuildReport> {
        let (documents, skipped) = source::load_dir(jsonl_dir)?;
        let mut report = self.build_and_persist(&documents, index_path, metadata_path).await?;
        report.skipped_records = skipped;
        Ok(report)
    }

    /// Run one query against a loaded corpus.
    ///
    /// Stateless: embed → search → join metadata → prompt → generate. A
    /// failure at any stage yields an error, never a partial answer.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidArgument`] for an empty question.
    /// - [`RagError::Embedding`] / [`RagError::Generation`] when a
    ///   capability fails.
    pub async fn query(&self, corpus: &Arc<Corpus>, question: &str) -> Result<QueryResponse> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidArgument("question must not be empty".to_string()));
        }

        let retriever =
            Retriever::new(self.embedder.clone(), corpus.clone(), self.config.snippet_len);
        let retrieved = retriever.retrieve(question, self.config.top_k).await?;

        let prompt = self.prompt.build(question, &retrieved);
        let options = GenerationOptions {
            max_input_tokens: self.config.max_input_tokens,
            max_output_tokens: self.config.max_output_tokens,
        };
        let answer = self.generator.generate(&prompt, &options).await.inspect_err(|e| {
            error!(error = %e, "generation failed during query");
        })?;

        info!(retrieved = retrieved.len(), "query completed");
        Ok(QueryResponse { answer, retrieved })
    }

    /// Load the persisted artifacts and run one query against them.
    ///
    /// Each invocation reloads the corpus; callers holding many queries can
    /// load a [`Corpus`] once and use [`query`](Self::query) directly.
    pub async fn answer(
        &self,
        index_path: &Path,
        metadata_path: &Path,
        question: &str,
    ) -> Result<QueryResponse> {
        let corpus = Arc::new(Corpus::load(index_path, metadata_path)?);
        self.query(&corpus, question).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config`, `embedding_provider`, and `generator` are required. The
/// chunker defaults to a [`RecursiveChunker`] derived from the config, and
/// the prompt builder defaults to the standard template.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn Generator>>,
    chunker: Option<Arc<dyn Chunker>>,
    prompt: Option<PromptBuilder>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding capability.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the generation capability.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override the default chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Override the default prompt template.
    pub fn prompt_builder(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Build the [`RagPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| RagError::Config("generator is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(RecursiveChunker::from_config(&config)));
        let prompt = self.prompt.unwrap_or_default();

        Ok(RagPipeline { config, embedder, generator, chunker, prompt })
    }
}
