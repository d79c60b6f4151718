//! Chunk assembly from atoms and boundaries.

use semsplit_core::{Chunk, Metadata};

use crate::segment::Atom;

/// Concatenate atoms between consecutive boundaries into chunks.
///
/// `boundaries` is strictly increasing in `(0, atoms.len())`; 0 and
/// `atoms.len()` are implicit. Atoms partition exactly into the
/// resulting runs. Chunks whose trimmed content is empty are dropped
/// afterwards as a post-filter; the partition itself never shifts to
/// absorb them. Every chunk inherits the full document metadata map
/// unchanged.
pub fn assemble(atoms: &[Atom], boundaries: &[usize], metadata: &Metadata) -> Vec<Chunk> {
    if atoms.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;
    for &boundary in boundaries.iter().chain(std::iter::once(&atoms.len())) {
        let content: String = atoms[start..boundary]
            .iter()
            .map(|a| a.text.as_str())
            .collect();
        start = boundary;
        if content.trim().is_empty() {
            continue;
        }
        chunks.push(Chunk {
            content,
            metadata: metadata.clone(),
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn atoms(parts: &[&str]) -> Vec<Atom> {
        parts
            .iter()
            .enumerate()
            .map(|(index, text)| Atom {
                text: text.to_string(),
                index,
            })
            .collect()
    }

    fn meta() -> Metadata {
        let mut m = Metadata::new();
        m.insert("file_name".into(), json!("doc.txt"));
        m
    }

    #[test]
    fn boundaries_partition_the_atoms() {
        let chunks = assemble(&atoms(&["a. ", "b. ", "c. ", "d."]), &[1, 3], &meta());
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a. ", "b. c. ", "d."]);
    }

    #[test]
    fn no_boundaries_single_chunk() {
        let chunks = assemble(&atoms(&["a. ", "b."]), &[], &meta());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "a. b.");
    }

    #[test]
    fn concatenation_reconstructs_the_document() {
        let source = atoms(&["One. ", "Two. ", "Three."]);
        let chunks = assemble(&source, &[2], &meta());
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, "One. Two. Three.");
    }

    #[test]
    fn metadata_is_inherited_verbatim() {
        let chunks = assemble(&atoms(&["a. ", "b."]), &[1], &meta());
        for chunk in &chunks {
            assert_eq!(chunk.metadata.get("file_name"), Some(&json!("doc.txt")));
        }
    }

    #[test]
    fn blank_chunks_are_dropped_without_shifting_the_partition() {
        let chunks = assemble(&atoms(&["a.", "   ", "b."]), &[1, 2], &meta());
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a.", "b."]);
    }

    #[test]
    fn empty_atoms_yield_no_chunks() {
        assert!(assemble(&[], &[], &meta()).is_empty());
    }
}
