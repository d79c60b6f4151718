//! Atomic unit segmentation.
//!
//! Turns raw document text into an ordered sequence of minimal units
//! ("atoms") that the splitter later regroups at semantic boundaries.
//! Three strategies, selected by document kind:
//!
//! - sentence: regex split on sentence-final punctuation (Latin and
//!   CJK), with a merge floor so single-character fragments don't
//!   dominate the distance signal with noise
//! - structural: one atom per top-level node of a tree-sitter parse,
//!   byte-exact source slices
//! - whole-document: a single atom
//!
//! Atom order is document order and is never re-sorted; the positional
//! index assigned here is immutable.

use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::{Language, Parser};

use crate::document::DocumentKind;

/// Minimal indivisible text unit produced by segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub text: String,
    /// Position in the document, assigned at segmentation time.
    pub index: usize,
}

// ── Grammars ──────────────────────────────────────────────────

/// Source languages with a registered tree-sitter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Rust,
    Python,
    TypeScript,
    Go,
}

impl Grammar {
    /// Guess the grammar from a file extension (without the dot).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.trim_start_matches('.') {
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "ts" | "tsx" | "js" | "jsx" => Some(Self::TypeScript),
            "go" => Some(Self::Go),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::Rust => Language::from(tree_sitter_rust::LANGUAGE),
            Self::Python => Language::from(tree_sitter_python::LANGUAGE),
            Self::TypeScript => Language::from(tree_sitter_typescript::LANGUAGE_TYPESCRIPT),
            Self::Go => Language::from(tree_sitter_go::LANGUAGE),
        }
    }
}

// ── Strategy ──────────────────────────────────────────────────

/// How to cut a document into atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStrategy {
    /// Sentence-boundary splitting with a minimum merged length.
    Sentence { min_chars: usize },
    /// Grammar-aware splitting at top-level declarations/statements.
    Structural { grammar: Grammar },
    /// A single atom covering the whole text.
    WholeDocument,
}

impl SegmentStrategy {
    /// Pick the strategy for a document kind.
    ///
    /// Structural segmentation needs a registered grammar for the
    /// file's suffix; without one it degrades to whole-document rather
    /// than failing.
    pub fn for_document(kind: DocumentKind, suffix: Option<&str>, min_chars: usize) -> Self {
        match kind {
            DocumentKind::Text | DocumentKind::Pdf => Self::Sentence { min_chars },
            DocumentKind::Code => match suffix.and_then(Grammar::from_suffix) {
                Some(grammar) => Self::Structural { grammar },
                None => {
                    tracing::warn!(
                        suffix = suffix.unwrap_or(""),
                        "no grammar registered, treating file as a single atom"
                    );
                    Self::WholeDocument
                }
            },
        }
    }
}

// ── Segmentation ──────────────────────────────────────────────

/// Segment text into atoms using the given strategy.
///
/// Empty or whitespace-only input yields an empty sequence.
pub fn segment(text: &str, strategy: &SegmentStrategy) -> Vec<Atom> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let parts = match strategy {
        SegmentStrategy::Sentence { min_chars } => split_sentences(text, *min_chars),
        SegmentStrategy::Structural { grammar } => top_level_slices(text, *grammar)
            .unwrap_or_else(|| vec![text.to_string()]),
        SegmentStrategy::WholeDocument => vec![text.to_string()],
    };

    parts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Atom { text, index })
        .collect()
}

/// Sentence-final punctuation boundary: ASCII terminators require
/// trailing whitespace (so `3.14` and `e.g.` inside a clause survive);
/// full-width CJK terminators end a sentence on their own since CJK
/// prose carries no inter-sentence spaces.
fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.?!]\s+|[。？！]").expect("sentence boundary regex"))
}

/// Split on sentence boundaries, then merge consecutive fragments while
/// the running merged length (in chars) stays below `min_chars`.
fn split_sentences(text: &str, min_chars: usize) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut start = 0;
    for m in sentence_boundary().find_iter(text) {
        fragments.push(&text[start..m.end()]);
        start = m.end();
    }
    if start < text.len() {
        fragments.push(&text[start..]);
    }

    let mut merged: Vec<String> = Vec::with_capacity(fragments.len());
    let mut buf = String::new();
    for frag in fragments {
        buf.push_str(frag);
        if buf.trim().chars().count() >= min_chars {
            merged.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        if buf.trim().is_empty() {
            // Trailing whitespace belongs to the last sentence.
            if let Some(last) = merged.last_mut() {
                last.push_str(&buf);
            }
        } else {
            merged.push(buf);
        }
    }
    merged
}

/// One verbatim source slice per top-level node of the parse tree.
///
/// Returns `None` when the parser cannot be initialized or produces no
/// usable nodes, letting the caller fall back to a single atom.
fn top_level_slices(source: &str, grammar: Grammar) -> Option<Vec<String>> {
    let mut parser = Parser::new();
    parser.set_language(&grammar.language()).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();

    let mut slices = Vec::with_capacity(root.child_count());
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        let slice = &source[child.byte_range()];
        if !slice.trim().is_empty() {
            slices.push(slice.to_string());
        }
    }

    if slices.is_empty() {
        None
    } else {
        Some(slices)
    }
}
