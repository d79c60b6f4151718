use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use semsplit_core::{ConfigError, EmbeddingConfig};

use super::traits::{Embedder, EmbeddingError};

/// OpenAI-compatible embedding backend.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    /// An unparseable proxy URL is a configuration error, rejected here
    /// rather than silently proceeding unproxied.
    pub fn new(config: EmbeddingConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().timeout(std::time::Duration::from_secs(120));
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| ConfigError::InvalidProxy {
                url: proxy_url.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }
        Ok(Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url,
            dimensions: config.dimensions,
        })
    }
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbedRequest {
            model: self.model.clone(),
            input: texts.iter().map(|t| t.to_string()).collect(),
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        let mut resp: EmbedResponse = response.json().await?;

        // The API may return items out of order; restore input order.
        resp.data.sort_by_key(|item| item.index);

        let embeddings: Vec<Vec<f32>> = resp.data.into_iter().map(|item| item.embedding).collect();

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::BatchLengthMismatch {
                sent: texts.len(),
                received: embeddings.len(),
            });
        }

        // Validate dimensions on first vector.
        if let Some(first) = embeddings.first() {
            if first.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: first.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(proxy: Option<&str>) -> EmbeddingConfig {
        EmbeddingConfig {
            api_key: "key".into(),
            base_url: "https://api.openai.com".into(),
            model: "text-embedding-ada-002".into(),
            dimensions: 1536,
            proxy: proxy.map(str::to_string),
        }
    }

    #[test]
    fn rejects_invalid_proxy_url() {
        let result = OpenAiEmbedder::new(config(Some("::not a url::")));
        assert!(matches!(result, Err(ConfigError::InvalidProxy { .. })));
    }

    #[test]
    fn accepts_valid_proxy_url() {
        assert!(OpenAiEmbedder::new(config(Some("http://127.0.0.1:8080"))).is_ok());
    }

    #[test]
    fn no_proxy_is_fine() {
        assert!(OpenAiEmbedder::new(config(None)).is_ok());
    }
}
