use crate::config::EmbeddingConfig;
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;

/// Turns text into an embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

pub struct EmbeddingService {
    client: Client,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    pub fn new(sdk_config: &SdkConfig, config: EmbeddingConfig) -> Self {
        log::info!("Initializing embedding service with {}", config.model_id);

        Self {
            client: Client::new(sdk_config),
            config,
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::to_vec(&TitanEmbeddingRequest {
            input_text: text.to_string(),
        })?;

        let output = self
            .client
            .invoke_model()
            .model_id(&self.config.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .with_context(|| format!("failed to invoke {}", self.config.model_id))?;

        parse_embedding(output.body().as_ref())
    }
}

pub(crate) fn parse_embedding(body: &[u8]) -> Result<Vec<f32>> {
    let response: TitanEmbeddingResponse = serde_json::from_slice(body)?;
    Ok(response.embedding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_input_text_field() {
        let body = serde_json::to_value(TitanEmbeddingRequest {
            input_text: "What is <3?".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "inputText": "What is <3?" }));
    }

    #[test]
    fn parses_embedding_response() {
        let body = br#"{"embedding":[0.25,-1.0,3.5],"inputTextTokenCount":4}"#;
        assert_eq!(parse_embedding(body).unwrap(), vec![0.25, -1.0, 3.5]);
    }

    #[test]
    fn rejects_response_without_embedding() {
        assert!(parse_embedding(br#"{"message":"throttled"}"#).is_err());
    }
}
