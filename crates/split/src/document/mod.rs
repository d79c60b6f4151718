//! Document readers: turn raw file bytes into text plus metadata.
//!
//! Readers are deliberately thin — extraction quality is not the hard
//! problem here. Each reader produces a [`SourceDocument`] whose
//! metadata is inherited verbatim by every chunk of that document.

mod code;
mod pdf;
mod txt;

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use walkdir::WalkDir;

use semsplit_core::document::{Metadata, SourceDocument};

use crate::segment::Grammar;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a document should be segmented downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Prose: sentence segmentation.
    Text,
    /// PDF: extracted to prose, sentence segmentation.
    Pdf,
    /// Source code: structural segmentation via a registered grammar.
    Code,
}

/// Classify a file extension. Returns `None` for unsupported types.
pub fn kind_for(extension: &str) -> Option<DocumentKind> {
    match extension {
        "txt" | "text" | "md" | "markdown" => Some(DocumentKind::Text),
        "pdf" => Some(DocumentKind::Pdf),
        ext if Grammar::from_suffix(ext).is_some() => Some(DocumentKind::Code),
        _ => None,
    }
}

/// Extract text from file bytes based on the file extension.
pub fn extract(bytes: &[u8], path: &Path) -> Result<(SourceDocument, DocumentKind), ExtractionError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let kind = kind_for(&ext).ok_or_else(|| ExtractionError::UnsupportedType(ext.clone()))?;

    let mut metadata = Metadata::new();
    metadata.insert("file_name".into(), Value::from(filename));
    metadata.insert("source".into(), Value::from(path.to_string_lossy().into_owned()));

    let text = match kind {
        DocumentKind::Text => txt::extract_txt(bytes),
        DocumentKind::Pdf => {
            let pages = pdf::extract_pdf(bytes)?;
            metadata.insert("total_pages".into(), Value::from(pages.len()));
            pages.join("\n\n")
        }
        DocumentKind::Code => {
            metadata.insert("suffix".into(), Value::from(format!(".{ext}")));
            code::extract_code(bytes)
        }
    };

    Ok((SourceDocument::new(text, metadata), kind))
}

/// Expand a path into the supported files beneath it, in stable order.
///
/// A file path yields itself (it must be a supported type); a directory
/// yields every supported file under it. An input that resolves to zero
/// files is the caller's hard failure, not ours.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    if path.is_file() {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if kind_for(&ext).is_none() {
            return Err(ExtractionError::UnsupportedType(ext));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .is_some_and(|ext| kind_for(&ext).is_some())
        })
        .collect();
    files.sort();
    Ok(files)
}
