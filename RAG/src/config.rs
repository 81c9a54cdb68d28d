use std::env;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_INDEX_NAME: &str = "rag";

/// Process-level settings, read from the environment (and `.env`) with defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub region: String,
    pub index_name: String,
    pub account_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            region: env::var("AWS_REGION_NAME").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            index_name: env::var("RAG_INDEX_NAME")
                .unwrap_or_else(|_| DEFAULT_INDEX_NAME.to_string()),
            account_id: env::var("AWS_ACCOUNT_ID").ok().filter(|id| !id.is_empty()),
        }
    }

    pub fn with_overrides(mut self, region: Option<String>, index_name: Option<String>) -> Self {
        if let Some(region) = region {
            self.region = region;
        }
        if let Some(index_name) = index_name {
            self.index_name = index_name;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub model_id: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: "amazon.titan-embed-text-v1".to_string(),
        }
    }
}

/// Connection and mapping settings for the OpenSearch k-NN index.
///
/// `http_auth` is `(username, password)`; the username is the index name.
/// `vector_field`, `text_field` and `metadata_field` name the `_source`
/// fields the index was populated with.
#[derive(Debug, Clone)]
pub struct VectorSearchConfig {
    pub index_name: String,
    pub opensearch_url: String,
    pub http_auth: (String, String),
    pub is_aoss: bool,
    pub vector_field: String,
    pub text_field: String,
    pub metadata_field: String,
}

impl VectorSearchConfig {
    pub fn new(index_name: &str, endpoint: &str, password: String) -> Self {
        Self {
            index_name: index_name.to_string(),
            opensearch_url: format!("https://{}", endpoint),
            http_auth: (index_name.to_string(), password),
            is_aoss: false,
            vector_field: "vector_field".to_string(),
            text_field: "text".to_string(),
            metadata_field: "metadata".to_string(),
        }
    }
}

/// Model id and decoding parameters for the generation call.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub model_id: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_tokens_to_sample: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_id: "anthropic.claude-v2".to_string(),
            temperature: 0.0,
            top_k: 250,
            top_p: 0.999,
            max_tokens_to_sample: 300,
            stop_sequences: vec!["Human".to_string()],
        }
    }
}
