//! Token counting for batch budgeting.
//!
//! Batch sizes are constrained by what the remote embedding endpoint
//! accepts per request, which is measured in tokens, not bytes. The
//! counter here uses the cl100k_base vocabulary, which matches the
//! OpenAI embedding model family.

use tiktoken_rs::CoreBPE;

use semsplit_core::SplitError;

/// Counts tokens the way the embedding endpoint will.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// cl100k_base tokenizer, shared across the whole run.
pub struct Cl100kCounter {
    bpe: CoreBPE,
}

impl Cl100kCounter {
    pub fn new() -> Result<Self, SplitError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| SplitError::Config(semsplit_core::ConfigError::Tokenizer(e.to_string())))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for Cl100kCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}
