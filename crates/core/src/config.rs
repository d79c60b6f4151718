use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Invalid splitter parameters, rejected at configuration time.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("percentile must be in (0, 100], got {0}")]
    PercentileOutOfRange(f64),

    #[error("threshold factor must be in [0, 1], got {0}")]
    ThresholdFactorOutOfRange(f64),

    #[error("max batch tokens must be > 0")]
    ZeroBatchBudget,

    #[error("embedding concurrency must be > 0")]
    ZeroConcurrency,

    #[error("missing embedding API key (set SEMSPLIT_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("tokenizer initialization failed: {0}")]
    Tokenizer(String),

    #[error("invalid proxy URL {url}: {reason}")]
    InvalidProxy { url: String, reason: String },
}

// ── Breakpoint detector ───────────────────────────────────────

/// Which breakpoint detection strategy to run over the distance sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DetectorConfig {
    /// Split where the distance exceeds the p-th percentile of all distances.
    Percentile { percentile: f64 },
    /// Split at significant sign flips in the distance signal's curvature.
    Curvature { threshold_factor: f64 },
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Percentile { percentile } => {
                if percentile <= 0.0 || percentile > 100.0 || percentile.is_nan() {
                    return Err(ConfigError::PercentileOutOfRange(percentile));
                }
            }
            Self::Curvature { threshold_factor } => {
                if !(0.0..=1.0).contains(&threshold_factor) || threshold_factor.is_nan() {
                    return Err(ConfigError::ThresholdFactorOutOfRange(threshold_factor));
                }
            }
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::Percentile { percentile: 95.0 }
    }
}

// ── Splitter configuration ────────────────────────────────────

/// Immutable configuration for the semantic splitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Symmetric neighbor radius when building combined windows.
    /// 0 degenerates to one window per atom with no context.
    pub buffer_size: usize,
    /// Breakpoint detection strategy and its tuning parameter.
    pub detector: DetectorConfig,
    /// Hard token budget per embedding request.
    pub max_batch_tokens: usize,
    /// Width of the embedding worker pool (independent of input size).
    pub concurrency: usize,
    /// Sentence fragments shorter than this are merged with the next one.
    pub min_sentence_chars: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1,
            detector: DetectorConfig::default(),
            max_batch_tokens: 8191,
            concurrency: 5,
            min_sentence_chars: 50,
        }
    }
}

impl SplitConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        let detector = match env_or("SEMSPLIT_DETECTOR", "percentile").as_str() {
            "curvature" => DetectorConfig::Curvature {
                threshold_factor: env_f64("SEMSPLIT_THRESHOLD_FACTOR", 0.5),
            },
            _ => DetectorConfig::Percentile {
                percentile: env_f64("SEMSPLIT_PERCENTILE", 95.0),
            },
        };
        Self {
            buffer_size: env_usize("SEMSPLIT_BUFFER_SIZE", 1),
            detector,
            max_batch_tokens: env_usize("SEMSPLIT_MAX_BATCH_TOKENS", 8191),
            concurrency: env_usize("SEMSPLIT_CONCURRENCY", 5),
            min_sentence_chars: env_usize("SEMSPLIT_MIN_SENTENCE_CHARS", 50),
        }
    }

    /// Reject invalid parameters before any segmentation work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        if self.max_batch_tokens == 0 {
            return Err(ConfigError::ZeroBatchBudget);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}

// ── Embedding service configuration ───────────────────────────

/// Connection settings for the external embedding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
    /// Optional HTTP(S) proxy URL for the embedding client.
    pub proxy: Option<String>,
}

impl EmbeddingConfig {
    /// Build from environment. `SEMSPLIT_API_KEY` wins over `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_opt("SEMSPLIT_API_KEY")
            .or_else(|| env_opt("OPENAI_API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;
        Ok(Self {
            api_key,
            base_url: env_or("SEMSPLIT_API_BASE", "https://api.openai.com"),
            model: env_or("SEMSPLIT_EMBED_MODEL", "text-embedding-ada-002"),
            dimensions: env_usize("SEMSPLIT_EMBED_DIMENSIONS", 1536),
            proxy: env_opt("SEMSPLIT_PROXY").or_else(|| env_opt("HTTPS_PROXY")),
        })
    }
}
