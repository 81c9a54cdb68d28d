pub mod models;
pub mod config;
pub mod cli;
pub mod credentials;
pub mod secret_service;
pub mod embedding_service;
pub mod vector_search;
pub mod bedrock_service;
pub mod prompt;
pub mod query_service;

pub use models::*;
pub use bedrock_service::{BedrockService, Generator};
pub use embedding_service::{Embedder, EmbeddingService};
pub use query_service::QueryService;
pub use secret_service::SecretService;
pub use vector_search::{Retriever, VectorSearchService};
