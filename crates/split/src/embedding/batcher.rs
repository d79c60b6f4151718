//! Token-budgeted batch packing.
//!
//! Window texts are packed greedily, in order, into contiguous batches
//! whose summed token count stays within the endpoint's per-request
//! budget. A single text that alone exceeds the budget still ships as
//! its own batch; the endpoint, not this side, decides whether to
//! truncate or reject it.

use std::ops::Range;

use crate::tokens::TokenCounter;

/// Pack `texts` into contiguous index ranges, each within `max_tokens`.
///
/// Ranges cover every index exactly once and appear in input order, so
/// concatenating per-batch results reconstructs the input ordering.
pub fn pack(texts: &[String], counter: &dyn TokenCounter, max_tokens: usize) -> Vec<Range<usize>> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut budget_used = 0;

    for (i, text) in texts.iter().enumerate() {
        let cost = counter.count(text);
        if i > start && budget_used + cost > max_tokens {
            batches.push(start..i);
            start = i;
            budget_used = 0;
        }
        budget_used += cost;
    }
    if start < texts.len() {
        batches.push(start..texts.len());
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One token per whitespace-separated word.
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn packs_within_budget() {
        let texts = strings(&["a b", "c d", "e f", "g h"]);
        let batches = pack(&texts, &WordCounter, 4);
        assert_eq!(batches, vec![0..2, 2..4]);
    }

    #[test]
    fn oversized_text_gets_own_batch() {
        let texts = strings(&["a", "one two three four five", "b"]);
        let batches = pack(&texts, &WordCounter, 3);
        assert_eq!(batches, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn batches_cover_all_indices_in_order() {
        let texts = strings(&["a b c", "d", "e f", "g", "h i j k"]);
        let batches = pack(&texts, &WordCounter, 4);
        let mut covered = Vec::new();
        for range in &batches {
            covered.extend(range.clone());
        }
        assert_eq!(covered, (0..texts.len()).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(pack(&[], &WordCounter, 10).is_empty());
    }

    #[test]
    fn everything_fits_in_one_batch() {
        let texts = strings(&["a", "b", "c"]);
        let batches = pack(&texts, &WordCounter, 100);
        assert_eq!(batches, vec![0..3]);
    }
}
