mod mock_embedder;
mod mock_llm_client;
mod openai_chat_client;
mod openai_embedder;

pub use mock_embedder::MockEmbedder;
pub use mock_llm_client::MockLlmClient;
pub use openai_chat_client::OpenAiChatClient;
pub use openai_embedder::OpenAiEmbedder;
