use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use carbonpilot::application::ports::{
    Embedder, JobRepository, LlmClient, RecommendationRepository, TextExtractor, TextSplitter,
    UploadRepository, VectorStore,
};
use carbonpilot::application::services::{
    IngestionService, RecommendationService, RetrievalService,
};
use carbonpilot::infrastructure::llm::{OpenAiChatClient, OpenAiEmbedder};
use carbonpilot::infrastructure::observability::{TracingConfig, init_tracing};
use carbonpilot::infrastructure::persistence::repositories::{
    PgJobRepository, PgRecommendationRepository, PgUploadRepository,
};
use carbonpilot::infrastructure::persistence::vector_store::QdrantAdapter;
use carbonpilot::infrastructure::persistence::{create_pool, run_migrations};
use carbonpilot::infrastructure::text_processing::{OverlapChunker, PdfExtractor};
use carbonpilot::presentation::config::Settings;
use carbonpilot::presentation::router::create_router;
use carbonpilot::presentation::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or_else(|_| settings.environment.json_logs());
    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            json_format: json_logs,
        },
        settings.server.port,
    );

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    run_migrations(&pool).await?;

    let extractor: Arc<dyn TextExtractor> = Arc::new(PdfExtractor::new());
    let chunker: Arc<dyn TextSplitter> = Arc::new(OverlapChunker::new(
        settings.chunking.max_chunk_chars,
        settings.chunking.overlap_chars,
    )?);
    let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(
        settings.llm.api_key.clone(),
        settings.llm.embedding_model.clone(),
        settings.llm.embedding_batch_size,
    ));
    let llm_client: Arc<dyn LlmClient> = Arc::new(OpenAiChatClient::new(
        settings.llm.api_key.clone(),
        settings.llm.chat_model.clone(),
    ));
    let vector_store: Arc<dyn VectorStore> = Arc::new(
        QdrantAdapter::new(&settings.qdrant.url, settings.qdrant.collection_name.clone()).await?,
    );

    let upload_repository: Arc<dyn UploadRepository> =
        Arc::new(PgUploadRepository::new(pool.clone()));
    let job_repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));
    let recommendation_repository: Arc<dyn RecommendationRepository> =
        Arc::new(PgRecommendationRepository::new(pool.clone()));

    let ingestion_service = Arc::new(IngestionService::new(
        extractor,
        chunker,
        Arc::clone(&embedder),
        Arc::clone(&vector_store),
        upload_repository,
        job_repository,
        settings.qdrant.collection_name.clone(),
    ));
    let retrieval_service = Arc::new(RetrievalService::new(
        embedder,
        Arc::clone(&llm_client),
        vector_store,
        settings.llm.top_k,
    ));
    let recommendation_service = Arc::new(RecommendationService::new(
        llm_client,
        Arc::clone(&recommendation_repository),
    ));

    let state = AppState::new(
        ingestion_service,
        retrieval_service,
        recommendation_service,
        recommendation_repository,
    );

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
