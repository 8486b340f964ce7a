use std::sync::Arc;

use uuid::Uuid;

use carbonpilot::application::ports::{
    Embedder, LlmClient, SearchFilter, VectorStore,
};
use carbonpilot::application::services::RetrievalService;
use carbonpilot::domain::{Chunk, Upload, VectorRecord};
use carbonpilot::infrastructure::llm::{MockEmbedder, MockLlmClient};
use carbonpilot::infrastructure::persistence::vector_store::RecordingVectorStore;

async fn seed_upload(
    store: &RecordingVectorStore,
    embedder: &MockEmbedder,
    owner_id: Uuid,
    text: &str,
) -> Upload {
    let upload = Upload::new(
        "notes.pdf".to_string(),
        owner_id,
        Uuid::new_v4(),
        "carbon_documents".to_string(),
    );
    let chunk = Chunk::new(0, 1, text);
    let embedding = embedder.embed(text).await.unwrap();
    store
        .upsert(&[VectorRecord::from_chunk(&upload, &chunk, embedding)])
        .await
        .unwrap();
    upload
}

#[tokio::test]
async fn given_empty_index_when_querying_then_stock_answer_is_returned() {
    let embedder = Arc::new(MockEmbedder::new(16));
    let llm = Arc::new(MockLlmClient::new());
    let store = Arc::new(RecordingVectorStore::new());

    let service = RetrievalService::new(
        embedder as Arc<dyn Embedder>,
        Arc::clone(&llm) as Arc<dyn LlmClient>,
        store as Arc<dyn VectorStore>,
        5,
    );

    let response = service.query("where did emissions spike?", None).await.unwrap();

    assert_eq!(response.answer, "No relevant context found.");
    assert!(response.sources.is_empty());
    assert!(llm.prompts().is_empty());
}

#[tokio::test]
async fn given_indexed_chunks_when_querying_then_context_reaches_the_model() {
    let embedder = Arc::new(MockEmbedder::new(16));
    let llm = Arc::new(MockLlmClient::replying("Depot four idled its generators."));
    let store = Arc::new(RecordingVectorStore::new());

    seed_upload(
        &store,
        &embedder,
        Uuid::new_v4(),
        "depot four generators idled overnight through february",
    )
    .await;

    let service = RetrievalService::new(
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::clone(&llm) as Arc<dyn LlmClient>,
        store as Arc<dyn VectorStore>,
        5,
    );

    let response = service.query("what idled overnight?", None).await.unwrap();

    assert_eq!(response.answer, "Depot four idled its generators.");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].file_name, "notes.pdf");
    assert_eq!(response.sources[0].page, 1);

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("depot four generators idled overnight"));
    assert!(prompts[0].contains("what idled overnight?"));
}

#[tokio::test]
async fn given_tenant_filter_when_querying_then_other_owners_chunks_are_invisible() {
    let embedder = Arc::new(MockEmbedder::new(16));
    let llm = Arc::new(MockLlmClient::replying("answer"));
    let store = Arc::new(RecordingVectorStore::new());

    let owner = Uuid::new_v4();
    seed_upload(&store, &embedder, owner, "owned content about boilers").await;
    seed_upload(&store, &embedder, Uuid::new_v4(), "foreign content about kilns").await;

    let service = RetrievalService::new(
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        llm as Arc<dyn LlmClient>,
        store as Arc<dyn VectorStore>,
        5,
    );

    let filter = SearchFilter {
        owner_id: Some(owner),
        group_id: None,
    };
    let response = service.query("boilers?", Some(&filter)).await.unwrap();

    assert_eq!(response.sources.len(), 1);
    assert!(response.sources[0].text_excerpt.contains("owned content"));
}
