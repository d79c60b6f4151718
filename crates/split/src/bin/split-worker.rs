//! split-worker — one-shot semantic splitting worker.
//!
//! Reads a file or directory, splits every supported document into
//! semantic chunks, delivers the full chunk list as a single JSON
//! payload to the result endpoint, waits for the acknowledge reply and
//! exits. ctrl-c / SIGINT aborts the run cleanly.
//!
//! Configuration comes from `SEMSPLIT_*` environment variables (via
//! `SplitConfig::from_env`), with CLI flags layered on top per knob.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::info;

use semsplit::document;
use semsplit::embedding::OpenAiEmbedder;
use semsplit::tokens::Cl100kCounter;
use semsplit::SemanticSplitter;
use semsplit_core::{DetectorConfig, EmbeddingConfig, SplitConfig};
use semsplit_wire::{Message, ResultClient, Transport};

// ── CLI ─────────────────────────────────────────────────────────────

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DetectorKind {
    Percentile,
    Curvature,
}

/// Semantic document splitter — one-shot worker.
#[derive(Parser, Debug)]
#[command(name = "split-worker", version, about)]
struct Cli {
    /// File or directory to split.
    #[arg(long)]
    path: PathBuf,

    /// Result endpoint (tcp://host:port or ipc://name).
    #[arg(long, env = "SEMSPLIT_ENDPOINT", default_value = "tcp://127.0.0.1:7765")]
    endpoint: String,

    /// Breakpoint detection strategy.
    #[arg(long, value_enum)]
    detector: Option<DetectorKind>,

    /// Percentile threshold (percentile strategy).
    #[arg(long)]
    percentile: Option<f64>,

    /// Slope-change threshold factor in [0, 1] (curvature strategy).
    #[arg(long)]
    threshold_factor: Option<f64>,

    /// Symmetric context window radius, in atoms.
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Token budget per embedding request.
    #[arg(long)]
    max_batch_tokens: Option<usize>,

    /// Embedding requests in flight at once.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Minimum merged sentence length, in chars.
    #[arg(long)]
    min_sentence_chars: Option<usize>,

    /// Seconds to wait for the result acknowledge.
    #[arg(long, default_value_t = 30)]
    ack_timeout: u64,
}

impl Cli {
    /// Overlay the given flags on an env-seeded base config.
    fn split_config(&self, base: SplitConfig) -> SplitConfig {
        let base_percentile = match base.detector {
            DetectorConfig::Percentile { percentile } => percentile,
            DetectorConfig::Curvature { .. } => 95.0,
        };
        let base_factor = match base.detector {
            DetectorConfig::Curvature { threshold_factor } => threshold_factor,
            DetectorConfig::Percentile { .. } => 0.5,
        };
        let detector = match (self.detector, base.detector) {
            (Some(DetectorKind::Percentile), _) | (None, DetectorConfig::Percentile { .. }) => {
                DetectorConfig::Percentile {
                    percentile: self.percentile.unwrap_or(base_percentile),
                }
            }
            (Some(DetectorKind::Curvature), _) | (None, DetectorConfig::Curvature { .. }) => {
                DetectorConfig::Curvature {
                    threshold_factor: self.threshold_factor.unwrap_or(base_factor),
                }
            }
        };
        SplitConfig {
            buffer_size: self.buffer_size.unwrap_or(base.buffer_size),
            detector,
            max_batch_tokens: self.max_batch_tokens.unwrap_or(base.max_batch_tokens),
            concurrency: self.concurrency.unwrap_or(base.concurrency),
            min_sentence_chars: self.min_sentence_chars.unwrap_or(base.min_sentence_chars),
        }
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    semsplit_core::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(())
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Reject bad parameters before touching any file.
    let config = cli.split_config(SplitConfig::from_env());
    config.validate()?;
    let embedding = EmbeddingConfig::from_env()?;

    let embedder = Arc::new(OpenAiEmbedder::new(embedding)?);
    let counter = Arc::new(Cl100kCounter::new()?);
    let splitter = SemanticSplitter::new(config, embedder, counter)?;

    let files = document::discover(&cli.path)?;
    if files.is_empty() {
        bail!("no supported files under {}", cli.path.display());
    }
    info!(path = %cli.path.display(), files = files.len(), "starting split run");

    // Blank or unreadable files contribute zero chunks; an empty
    // payload is still a valid result for the caller.
    let chunks = splitter.split_files(&files).await?;

    let transport = Transport::parse(&cli.endpoint)
        .with_context(|| format!("invalid endpoint {}", cli.endpoint))?;
    let client = ResultClient::connect(&transport).await?;
    let msg = Message::new(semsplit_wire::SPLIT_RESULT, &chunks)?;
    let ack = client
        .deliver(msg, Duration::from_secs(cli.ack_timeout))
        .await?;

    info!(
        chunks = chunks.len(),
        ack = %ack.topic,
        "result delivered and acknowledged"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_env_seeded_base() {
        let cli = Cli::try_parse_from([
            "split-worker",
            "--path",
            "/data/docs",
            "--detector",
            "curvature",
            "--threshold-factor",
            "0.25",
            "--buffer-size",
            "3",
        ])
        .unwrap();
        let config = cli.split_config(SplitConfig::default());
        assert_eq!(config.buffer_size, 3);
        assert!(matches!(
            config.detector,
            DetectorConfig::Curvature {
                threshold_factor
            } if threshold_factor == 0.25
        ));
    }

    #[test]
    fn unset_flags_fall_back_to_the_base() {
        let cli = Cli::try_parse_from(["split-worker", "--path", "/data/docs"]).unwrap();
        let base = SplitConfig {
            buffer_size: 2,
            max_batch_tokens: 4000,
            detector: DetectorConfig::Percentile { percentile: 70.0 },
            ..Default::default()
        };
        let config = cli.split_config(base);
        assert_eq!(config.buffer_size, 2);
        assert_eq!(config.max_batch_tokens, 4000);
        assert!(matches!(
            config.detector,
            DetectorConfig::Percentile { percentile } if percentile == 70.0
        ));
    }

    #[test]
    fn knob_flag_applies_without_switching_strategy() {
        let cli =
            Cli::try_parse_from(["split-worker", "--path", "/d", "--percentile", "80"]).unwrap();
        let config = cli.split_config(SplitConfig::default());
        assert!(matches!(
            config.detector,
            DetectorConfig::Percentile { percentile } if percentile == 80.0
        ));
    }
}
