//! Semantic document chunking engine.
//!
//! Ingests raw documents (plain text, PDF, source code) and partitions
//! them into semantically coherent chunks for embedding-based
//! retrieval. The pipeline per document:
//!
//! 1. Segment the text into atoms (sentences, top-level statements, or
//!    the whole document).
//! 2. Build one combined window per atom from its symmetric neighbor
//!    context.
//! 3. Pack the window texts into batches under a hard token budget and
//!    embed them through the external oracle with a bounded,
//!    order-preserving worker pool.
//! 4. Compute pairwise cosine distances between adjacent windows.
//! 5. Detect breakpoints in the distance signal (percentile threshold
//!    or curvature sign-flip).
//! 6. Reassemble atoms between breakpoints into final chunks carrying
//!    the document metadata.
//!
//! Atoms and windows live for one call and are discarded after
//! assembly; nothing is cached across documents.

pub mod document;
pub mod embedding;
pub mod segment;
pub mod splitter;
pub mod tokens;

pub use segment::{Atom, SegmentStrategy};
pub use splitter::SemanticSplitter;
