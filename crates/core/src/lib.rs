pub mod config;
pub mod document;
pub mod error;

pub use config::{load_dotenv, ConfigError, DetectorConfig, EmbeddingConfig, SplitConfig};
pub use document::*;
pub use error::*;
