pub mod batcher;
pub mod openai;
pub mod pool;
pub mod traits;

pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};
