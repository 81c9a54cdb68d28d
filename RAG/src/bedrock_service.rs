use crate::config::InferenceConfig;
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;

/// Produces a completion for a fully rendered prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct BedrockService {
    client: Client,
    config: InferenceConfig,
}

impl BedrockService {
    pub fn new(sdk_config: &SdkConfig, config: InferenceConfig) -> Self {
        log::info!("Initializing inference service with {}", config.model_id);

        Self {
            client: Client::new(sdk_config),
            config,
        }
    }

    fn build_request(&self, prompt: &str) -> ClaudeCompletionRequest {
        ClaudeCompletionRequest {
            prompt: claude_prompt(prompt),
            temperature: self.config.temperature,
            top_k: self.config.top_k,
            top_p: self.config.top_p,
            max_tokens_to_sample: self.config.max_tokens_to_sample,
            stop_sequences: self.config.stop_sequences.clone(),
        }
    }
}

#[async_trait]
impl Generator for BedrockService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = serde_json::to_vec(&self.build_request(prompt))?;

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

        let response: ClaudeCompletionResponse = serde_json::from_slice(output.body().as_ref())?;
        if let Some(reason) = &response.stop_reason {
            log::debug!("Completion stopped: {}", reason);
        }

        Ok(response.completion)
    }
}

/// Anthropic text completions need the prompt to open with `\n\nHuman:`
/// and close with `\n\nAssistant:`.
pub fn claude_prompt(prompt: &str) -> String {
    let mut body = prompt.trim_end();
    if let Some(stripped) = body.strip_suffix("Assistant:") {
        body = stripped.trim_end();
    }

    let prefix = if body.starts_with("\n\nHuman:") {
        ""
    } else if body.starts_with("Human:") {
        "\n\n"
    } else {
        "\n\nHuman: "
    };

    format!("{}{}\n\nAssistant:", prefix, body)
}
