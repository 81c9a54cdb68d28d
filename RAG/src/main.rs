use anyhow::Result;
use bedrock_rag::cli::Cli;
use bedrock_rag::config::{AppConfig, EmbeddingConfig, InferenceConfig, VectorSearchConfig};
use bedrock_rag::query_service::{log_answer, select_question};
use bedrock_rag::{credentials, vector_search};
use bedrock_rag::{BedrockService, EmbeddingService, QueryService, SecretService, VectorSearchService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let (cli, ignored) = Cli::parse_known();
    let config = AppConfig::from_env().with_overrides(cli.region, cli.index_name);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_target(false)
        .init();

    log::info!("Starting");
    if !ignored.is_empty() {
        log::debug!("Ignoring unrecognized arguments: {:?}", ignored);
    }

    let base_config = credentials::load_base_config(&config.region).await;
    let account_id = match config.account_id {
        Some(id) => id,
        None => credentials::account_id(&base_config).await?,
    };
    let bedrock_config = credentials::resolve(&base_config, &config.region, &account_id).await?;

    let generator = Arc::new(BedrockService::new(&bedrock_config, InferenceConfig::default()));
    let embedder = Arc::new(EmbeddingService::new(&bedrock_config, EmbeddingConfig::default()));

    let endpoint =
        vector_search::get_opensearch_endpoint(&base_config, &config.index_name, &config.region)
            .await?;
    let password = SecretService::new(&base_config, &config.region)
        .get_secret(&config.index_name)
        .await?;
    let retriever = Arc::new(VectorSearchService::new(
        VectorSearchConfig::new(&config.index_name, &endpoint, password),
        embedder,
    ));

    let question = select_question(&cli.ask);
    let query_service = QueryService::new(retriever, generator);
    let answer = query_service.ask(&question).await?;

    log_answer(&answer);
    Ok(())
}
