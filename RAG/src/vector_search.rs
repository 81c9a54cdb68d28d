use crate::config::VectorSearchConfig;
use crate::embedding_service::Embedder;
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Returns the `k` documents most similar to a query, best match first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

/// Looks up the HTTPS hostname of an OpenSearch domain.
///
/// VPC-only domains have no public `Endpoint`; their `vpc` entry is used instead.
pub async fn get_opensearch_endpoint(
    sdk_config: &SdkConfig,
    domain_name: &str,
    region: &str,
) -> Result<String> {
    let conf = aws_sdk_opensearch::config::Builder::from(sdk_config)
        .region(Region::new(region.to_string()))
        .build();
    let client = aws_sdk_opensearch::Client::from_conf(conf);

    let output = client
        .describe_domains()
        .domain_names(domain_name)
        .send()
        .await
        .with_context(|| format!("failed to describe OpenSearch domain {}", domain_name))?;

    let status = output
        .domain_status_list()
        .first()
        .ok_or_else(|| anyhow::anyhow!("OpenSearch domain {} not found", domain_name))?;

    status
        .endpoint()
        .map(str::to_string)
        .or_else(|| status.endpoints().and_then(|e| e.get("vpc")).cloned())
        .ok_or_else(|| anyhow::anyhow!("OpenSearch domain {} has no endpoint", domain_name))
}

pub struct VectorSearchService {
    client: Client,
    embedder: Arc<dyn Embedder>,
    config: VectorSearchConfig,
}

impl VectorSearchService {
    pub fn new(config: VectorSearchConfig, embedder: Arc<dyn Embedder>) -> Self {
        log::info!(
            "Using OpenSearch index {} at {} (serverless: {})",
            config.index_name,
            config.opensearch_url,
            config.is_aoss
        );

        Self {
            client: Client::new(),
            embedder,
            config,
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/{}/_search",
            self.config.opensearch_url.trim_end_matches('/'),
            self.config.index_name
        )
    }

    fn build_query(&self, embedding: &[f32], k: usize) -> Value {
        let mut knn = Map::new();
        knn.insert(
            self.config.vector_field.clone(),
            json!({ "vector": embedding, "k": k }),
        );

        json!({
            "size": k,
            "query": { "knn": knn },
        })
    }

    fn to_documents(&self, response: SearchResponse) -> Vec<Document> {
        response
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let mut source = hit.source;
                let page_content = match source.remove(&self.config.text_field) {
                    Some(Value::String(text)) => text,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                let metadata = match source.remove(&self.config.metadata_field) {
                    Some(Value::Object(metadata)) => metadata,
                    _ => Map::new(),
                };
                Document::new(page_content, metadata)
            })
            .collect()
    }
}

#[async_trait]
impl Retriever for VectorSearchService {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let embedding = self.embedder.embed_query(query).await?;
        let (username, password) = &self.config.http_auth;

        let response = self
            .client
            .post(self.search_url())
            .basic_auth(username, Some(password))
            .json(&self.build_query(&embedding, k))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!("OpenSearch search error: {}", error_text));
        }

        let search_response: SearchResponse = response.json().await?;
        let documents = self.to_documents(search_response);

        log::info!("Found {} similar documents", documents.len());
        Ok(documents)
    }
}
