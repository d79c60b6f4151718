//! Splitter orchestration.
//!
//! `SemanticSplitter` wires the pipeline stages together: segment the
//! document into atoms, build overlapping context windows, embed them
//! in token-budgeted batches, derive the consecutive-window distance
//! sequence, detect boundaries, assemble chunks. Only the embedding
//! stage touches the network; everything else is synchronous.

pub mod assemble;
pub mod breakpoint;
pub mod distance;
pub mod window;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use semsplit_core::{Chunk, SourceDocument, SplitConfig, SplitError};

use crate::document::{self, DocumentKind};
use crate::embedding::{batcher, pool, Embedder};
use crate::segment::{self, SegmentStrategy};
use crate::tokens::TokenCounter;

pub use window::CombinedWindow;

pub struct SemanticSplitter {
    config: SplitConfig,
    embedder: Arc<dyn Embedder>,
    counter: Arc<dyn TokenCounter>,
}

impl SemanticSplitter {
    /// Rejects invalid configuration before any work is accepted.
    pub fn new(
        config: SplitConfig,
        embedder: Arc<dyn Embedder>,
        counter: Arc<dyn TokenCounter>,
    ) -> Result<Self, SplitError> {
        config.validate()?;
        Ok(Self {
            config,
            embedder,
            counter,
        })
    }

    /// Split every file in the list, collecting all chunks in file
    /// order.
    ///
    /// Per-file input trouble degrades instead of failing the run: an
    /// unreadable or unsupported file is skipped with a warning, and a
    /// file with no extractable text (blank, scanned PDF) contributes
    /// zero chunks. A list of only such files yields an empty chunk
    /// list, not an error. Remote and configuration errors still abort
    /// the whole run.
    pub async fn split_files(&self, files: &[PathBuf]) -> Result<Vec<Chunk>, SplitError> {
        let mut chunks = Vec::new();
        for file in files {
            let bytes = match tokio::fs::read(file).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let (doc, kind) = match document::extract(&bytes, file) {
                Ok(extracted) => extracted,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "skipping file");
                    continue;
                }
            };
            if doc.is_blank() {
                tracing::warn!(file = %file.display(), "no extractable text");
                continue;
            }

            let file_chunks = self.split_document(&doc, kind).await?;
            tracing::info!(file = %file.display(), chunks = file_chunks.len(), "split file");
            chunks.extend(file_chunks);
        }
        Ok(chunks)
    }

    /// Split a document using the strategy implied by its kind (and,
    /// for code, the `suffix` recorded by extraction).
    pub async fn split_document(
        &self,
        document: &SourceDocument,
        kind: DocumentKind,
    ) -> Result<Vec<Chunk>, SplitError> {
        let suffix = document.metadata.get("suffix").and_then(Value::as_str);
        let strategy =
            SegmentStrategy::for_document(kind, suffix, self.config.min_sentence_chars);
        self.split(document, &strategy).await
    }

    /// Run the full pipeline. Fails as a whole on any embedding error;
    /// no partial chunk list is ever returned.
    pub async fn split(
        &self,
        document: &SourceDocument,
        strategy: &SegmentStrategy,
    ) -> Result<Vec<Chunk>, SplitError> {
        let atoms = segment::segment(&document.text, strategy);
        if atoms.is_empty() {
            return Ok(Vec::new());
        }
        // A lone atom can only form a single chunk; skip the remote
        // round-trip entirely.
        if atoms.len() == 1 {
            return Ok(assemble::assemble(&atoms, &[], &document.metadata));
        }

        let windows = window::build_windows(&atoms, self.config.buffer_size);
        let texts: Vec<String> = windows.into_iter().map(|w| w.combined_text).collect();

        let batches = batcher::pack(&texts, self.counter.as_ref(), self.config.max_batch_tokens);
        tracing::debug!(
            atoms = atoms.len(),
            batches = batches.len(),
            "dispatching windows for embedding"
        );

        let vectors = pool::embed_ordered(
            Arc::clone(&self.embedder),
            &texts,
            batches,
            self.config.concurrency,
        )
        .await
        .map_err(|e| SplitError::Remote(e.to_string()))?;

        let distances = distance::distance_sequence(&vectors);
        let boundaries = breakpoint::detect(&distances, &self.config.detector, atoms.len());
        tracing::debug!(boundaries = boundaries.len(), "assembling chunks");

        Ok(assemble::assemble(&atoms, &boundaries, &document.metadata))
    }
}
