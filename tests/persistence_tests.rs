//! Round-trip persistence tests for the corpus artifacts.

use std::collections::HashMap;
use std::sync::Arc;

use ragpipe::{
    Chunk, Corpus, Document, EmbeddingProvider, FlatL2Index, GenerationOptions, Generator,
    MetadataStore, RagConfig, RagError, RagPipeline,
};

/// Deterministic hash-direction embedder, good enough for round-trip
/// comparisons where only reproducibility matters.
struct HashEmbedder {
    dimensions: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> ragpipe::Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

struct StaticGenerator;

#[async_trait::async_trait]
impl Generator for StaticGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> ragpipe::Result<String> {
        Ok("answer".to_string())
    }
}

fn doc(title: &str, text: &str) -> Document {
    Document { title: title.to_string(), text: text.to_string(), metadata: HashMap::new() }
}

fn pipeline() -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(80).chunk_overlap(10).build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder { dimensions: 24 }))
        .generator(Arc::new(StaticGenerator))
        .build()
        .unwrap()
}

#[tokio::test]
async fn reload_reproduces_search_results_bit_for_bit() {
    let documents = vec![
        doc("R1", "Signups dipped after the pricing page change. Users mention confusion."),
        doc("R2", "Search latency improved this week. Indexing pipeline was rebuilt."),
        doc("R3", "Mobile crashes spiked on the new release. Rollback is in progress."),
    ];
    let pipeline = pipeline();
    let (corpus, _) = pipeline.build(&documents).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.bin");
    corpus.persist(&index_path, &metadata_path).unwrap();

    let reloaded = Corpus::load(&index_path, &metadata_path).unwrap();
    assert_eq!(reloaded.len(), corpus.len());
    assert_eq!(reloaded.dimension(), corpus.dimension());

    let probe = HashEmbedder { dimensions: 24 }.embed("pricing confusion").await.unwrap();
    let before = corpus.index().search(&probe, 5).unwrap();
    let after = reloaded.index().search(&probe, 5).unwrap();
    // same ids, same distances, same order
    assert_eq!(before, after);

    // metadata content survives exactly
    for id in 0..corpus.len() {
        assert_eq!(corpus.store().get(id).unwrap(), reloaded.store().get(id).unwrap());
    }
}

#[tokio::test]
async fn alignment_holds_after_reload() {
    let pipeline = pipeline();
    let documents =
        vec![doc("A", &"alpha beta gamma delta. ".repeat(20)), doc("B", "short one")];
    let (corpus, _) = pipeline.build(&documents).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.bin");
    corpus.persist(&index_path, &metadata_path).unwrap();

    let reloaded = Corpus::load(&index_path, &metadata_path).unwrap();
    assert_eq!(reloaded.index().count(), reloaded.store().len());
}

#[tokio::test]
async fn queries_work_against_reloaded_artifacts() {
    let pipeline = pipeline();
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.bin");

    let report = pipeline
        .build_and_persist(&[doc("A", "The sky is blue.")], &index_path, &metadata_path)
        .await
        .unwrap();
    assert_eq!(report.chunks, 1);

    let response = pipeline.answer(&index_path, &metadata_path, "sky").await.unwrap();
    assert_eq!(response.answer, "answer");
    assert_eq!(response.retrieved.len(), 1);
    assert_eq!(response.retrieved[0].title, "A");
}

#[test]
fn mismatched_artifact_pair_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.bin");

    let mut index = FlatL2Index::new(4).unwrap();
    index.add(&[vec![0.0; 4], vec![1.0; 4]]).unwrap();
    index.persist(&index_path).unwrap();

    let mut store = MetadataStore::new();
    store.append(&[Chunk { title: "t".to_string(), text: "only one".to_string(), seq: 0 }]);
    store.persist(&metadata_path).unwrap();

    let err = Corpus::load(&index_path, &metadata_path);
    assert!(matches!(err, Err(RagError::Persist { .. })));
}

#[test]
fn missing_artifacts_are_persist_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::load(&dir.path().join("nope.bin"), &dir.path().join("also_nope.bin"));
    assert!(matches!(err, Err(RagError::Persist { .. })));
}
