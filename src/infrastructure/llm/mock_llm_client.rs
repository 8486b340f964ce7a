use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};

/// Scripted LLM for tests: replays queued responses in order, then
/// repeats the last one. Prompts are recorded for assertions.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<String, LlmClientError>>>,
    last_response: Mutex<Option<String>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn replying(response: impl Into<String>) -> Self {
        let client = Self::new();
        client.push_response(response);
        client
    }

    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            last_response: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_response(&self, response: impl Into<String>) {
        let response = response.into();
        *self.last_response.lock().unwrap() = Some(response.clone());
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: LlmClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(scripted) = self.responses.lock().unwrap().pop_front() {
            return scripted;
        }
        if let Some(last) = self.last_response.lock().unwrap().clone() {
            return Ok(last);
        }
        Ok("Mock answer".to_string())
    }
}
