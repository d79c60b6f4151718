use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Free-form document metadata, inherited verbatim by every chunk.
pub type Metadata = HashMap<String, Value>;

/// A raw document as produced by a reader: extracted text plus metadata
/// describing its origin (file name, source path, page count, suffix).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub text: String,
    pub metadata: Metadata,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// True when the document contains no non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One semantically coherent chunk of a document.
///
/// Serializes as `{"page_content": ..., "metadata": ...}` — the record
/// shape consumers of the worker payload expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "page_content")]
    pub content: String,
    pub metadata: Metadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}
