//! End-to-end pipeline tests with a deterministic embedding backend.
//!
//! The scripted embedder maps each window text onto a two-axis topic
//! vector by keyword counting, so semantic transitions in the input
//! produce known distance spikes and the expected chunk boundaries.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use semsplit::document;
use semsplit::embedding::{Embedder, EmbeddingError};
use semsplit::tokens::TokenCounter;
use semsplit::{SegmentStrategy, SemanticSplitter};
use semsplit_core::{DetectorConfig, Metadata, SourceDocument, SplitConfig};

const CAT_WORDS: &[&str] = &["Cats"];
const MARKET_WORDS: &[&str] = &["Markets", "Stocks", "Bonds"];

/// Projects window text onto (cat, market) axes by keyword count.
struct TopicEmbedder;

#[async_trait]
impl Embedder for TopicEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| {
                let cats: usize = CAT_WORDS.iter().map(|w| t.matches(w).count()).sum();
                let markets: usize = MARKET_WORDS.iter().map(|w| t.matches(w).count()).sum();
                vec![cats as f32, markets as f32]
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        2
    }
}

struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

fn splitter(config: SplitConfig) -> SemanticSplitter {
    SemanticSplitter::new(config, Arc::new(TopicEmbedder), Arc::new(WordCounter)).unwrap()
}

fn two_topic_text() -> &'static str {
    "Cats sleep all day. Cats chase mice. Cats purr loudly. \
     Markets fell sharply. Stocks lost value. Bonds rallied again."
}

#[tokio::test]
async fn percentile_detector_splits_at_the_topic_shift() {
    let config = SplitConfig {
        buffer_size: 1,
        detector: DetectorConfig::Percentile { percentile: 80.0 },
        min_sentence_chars: 1,
        ..Default::default()
    };
    let doc = SourceDocument::new(two_topic_text(), Metadata::new());

    let chunks = splitter(config)
        .split(&doc, &SegmentStrategy::Sentence { min_chars: 1 })
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2, "chunks: {chunks:?}");
    assert!(chunks[0].content.contains("Cats purr loudly."));
    assert!(!chunks[0].content.contains("Markets"));
    assert!(chunks[1].content.starts_with("Markets fell sharply."));
    assert!(chunks[1].content.ends_with("Bonds rallied again."));
}

#[tokio::test]
async fn curvature_detector_splits_at_the_topic_shift() {
    // buffer_size 0 keeps windows equal to atoms, so the distance
    // signal is a clean step with a single sharp spike at the shift.
    let config = SplitConfig {
        buffer_size: 0,
        detector: DetectorConfig::Curvature {
            threshold_factor: 0.5,
        },
        min_sentence_chars: 1,
        ..Default::default()
    };
    let text = "Cats sleep all day. Cats chase mice. Cats purr loudly. \
                Markets fell sharply. Stocks lost value. Bonds rallied again. \
                Markets reopened calm.";
    let doc = SourceDocument::new(text, Metadata::new());

    let chunks = splitter(config)
        .split(&doc, &SegmentStrategy::Sentence { min_chars: 1 })
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2, "chunks: {chunks:?}");
    assert!(chunks[0].content.trim().ends_with("Cats purr loudly."));
    assert!(chunks[1].content.starts_with("Markets"));
}

#[tokio::test]
async fn chunks_reconstruct_the_document_text() {
    let config = SplitConfig {
        buffer_size: 1,
        detector: DetectorConfig::Percentile { percentile: 80.0 },
        min_sentence_chars: 1,
        ..Default::default()
    };
    let doc = SourceDocument::new(two_topic_text(), Metadata::new());

    let chunks = splitter(config)
        .split(&doc, &SegmentStrategy::Sentence { min_chars: 1 })
        .await
        .unwrap();

    let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(rebuilt, two_topic_text());
}

#[tokio::test]
async fn every_chunk_carries_the_document_metadata() {
    let mut metadata = Metadata::new();
    metadata.insert("file_name".into(), serde_json::json!("cats.txt"));
    metadata.insert("source".into(), serde_json::json!("/data/cats.txt"));
    let doc = SourceDocument::new(two_topic_text(), metadata);

    let config = SplitConfig {
        buffer_size: 1,
        detector: DetectorConfig::Percentile { percentile: 80.0 },
        min_sentence_chars: 1,
        ..Default::default()
    };
    let chunks = splitter(config)
        .split(&doc, &SegmentStrategy::Sentence { min_chars: 1 })
        .await
        .unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.metadata.get("file_name"), Some(&serde_json::json!("cats.txt")));
        assert_eq!(chunk.metadata.get("source"), Some(&serde_json::json!("/data/cats.txt")));
    }
}

#[tokio::test]
async fn code_document_flows_through_structural_segmentation() {
    let src = b"fn alpha() -> u32 {\n    1\n}\n\nfn beta() -> u32 {\n    2\n}\n";
    let (doc, kind) = document::extract(src, Path::new("lib.rs")).unwrap();
    assert_eq!(doc.metadata.get("suffix"), Some(&serde_json::json!(".rs")));

    let config = SplitConfig {
        buffer_size: 1,
        detector: DetectorConfig::Percentile { percentile: 80.0 },
        ..Default::default()
    };
    let chunks = splitter(config).split_document(&doc, kind).await.unwrap();

    // Both windows cover the whole file, so the distance is zero and
    // the file stays one chunk.
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.contains("fn alpha"));
    assert!(chunks[0].content.contains("fn beta"));
}

#[tokio::test]
async fn split_files_reads_and_chunks_supported_files() {
    let dir = std::env::temp_dir().join("semsplit-split-files-test");
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("topics.txt");
    std::fs::write(&file, two_topic_text()).unwrap();

    let config = SplitConfig {
        buffer_size: 1,
        detector: DetectorConfig::Percentile { percentile: 80.0 },
        min_sentence_chars: 1,
        ..Default::default()
    };
    let chunks = splitter(config).split_files(&[file.clone()]).await.unwrap();

    assert_eq!(chunks.len(), 2);
    for chunk in &chunks {
        assert_eq!(chunk.metadata.get("file_name"), Some(&serde_json::json!("topics.txt")));
    }
    std::fs::remove_file(&file).ok();
}

#[tokio::test]
async fn blank_and_unreadable_files_yield_an_empty_chunk_list() {
    let dir = std::env::temp_dir().join("semsplit-blank-files-test");
    std::fs::create_dir_all(&dir).unwrap();
    let blank = dir.join("blank.txt");
    std::fs::write(&blank, "   \n\t  ").unwrap();
    let missing = dir.join("never-written.txt");

    let chunks = splitter(SplitConfig::default())
        .split_files(&[blank.clone(), missing])
        .await
        .unwrap();

    // Nothing chunkable is a valid empty result, not a failure.
    assert!(chunks.is_empty());
    std::fs::remove_file(&blank).ok();
}

#[tokio::test]
async fn worker_payload_round_trips_through_the_wire_envelope() {
    let config = SplitConfig {
        buffer_size: 1,
        detector: DetectorConfig::Percentile { percentile: 80.0 },
        min_sentence_chars: 1,
        ..Default::default()
    };
    let doc = SourceDocument::new(two_topic_text(), Metadata::new());
    let chunks = splitter(config)
        .split(&doc, &SegmentStrategy::Sentence { min_chars: 1 })
        .await
        .unwrap();

    let msg = semsplit_wire::Message::new(semsplit_wire::SPLIT_RESULT, &chunks).unwrap();
    let decoded: Vec<semsplit_core::Chunk> = msg.decode().unwrap();
    assert_eq!(decoded, chunks);
}
