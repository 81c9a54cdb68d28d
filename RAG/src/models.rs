use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    /// The `text` entry of the metadata, or an empty string when absent or not a string.
    pub fn metadata_text(&self) -> &str {
        self.metadata
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub result: String,
    pub source_documents: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitanEmbeddingRequest {
    #[serde(rename = "inputText")]
    pub input_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitanEmbeddingResponse {
    pub embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaudeCompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_tokens_to_sample: u32,
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaudeCompletionResponse {
    pub completion: String,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_score", default)]
    pub score: Option<f32>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}
