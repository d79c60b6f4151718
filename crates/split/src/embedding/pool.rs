//! Bounded-concurrency, order-preserving batch embedding.
//!
//! Batches are dispatched up to `width` at a time, but results are
//! collected in dispatch order regardless of completion order, so the
//! flattened vector list lines up positionally with the input texts.

use std::ops::Range;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use super::traits::{Embedder, EmbeddingError};

/// Embed all `texts`, grouped by `batches`, with at most `width`
/// requests in flight. One vector per input text, in input order.
///
/// Any failed batch fails the whole call; in-flight siblings are
/// dropped and no partial result is returned.
pub async fn embed_ordered(
    embedder: Arc<dyn Embedder>,
    texts: &[String],
    batches: Vec<Range<usize>>,
    width: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let per_batch: Vec<Vec<Vec<f32>>> = stream::iter(batches)
        .map(|range| {
            let embedder = Arc::clone(&embedder);
            async move {
                let slice: Vec<&str> = texts[range.clone()].iter().map(String::as_str).collect();
                let vectors = embedder.embed_batch(&slice).await?;
                if vectors.len() != slice.len() {
                    return Err(EmbeddingError::BatchLengthMismatch {
                        sent: slice.len(),
                        received: vectors.len(),
                    });
                }
                Ok(vectors)
            }
        })
        .buffered(width.max(1))
        .try_collect()
        .await?;

    Ok(per_batch.into_iter().flatten().collect())
}
