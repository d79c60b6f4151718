//! Overlapping context windows over the atom sequence.

use crate::segment::Atom;

/// One combined window per atom position. The window text is the atom
/// plus up to `buffer_size` neighbors on each side, concatenated in
/// document order with no separators. Embeddings for windows live in a
/// parallel `Vec`, positionally aligned by `source_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedWindow {
    pub source_index: usize,
    pub combined_text: String,
}

/// Build one window per atom, clipped at sequence bounds (no padding).
///
/// `buffer_size = 0` degenerates to one window per atom with no
/// context.
pub fn build_windows(atoms: &[Atom], buffer_size: usize) -> Vec<CombinedWindow> {
    atoms
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let lo = i.saturating_sub(buffer_size);
            let hi = (i + buffer_size + 1).min(atoms.len());
            let combined_text = atoms[lo..hi].iter().map(|a| a.text.as_str()).collect();
            CombinedWindow {
                source_index: i,
                combined_text,
            }
        })
        .collect()
}
