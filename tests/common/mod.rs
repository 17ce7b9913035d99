#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nvfoundry::models::types::{GenerationText, PromptText};
use nvfoundry::traits::prompt_generator::PromptGenerator;

/// Stub backend that returns every prompt text back as its generation.
pub struct EchoGenerator {
    calls: AtomicUsize,
}

impl EchoGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of batch calls the backend has received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptGenerator for EchoGenerator {
    async fn generate_prompt(
        &self,
        prompts: &[PromptText],
    ) -> Result<Vec<GenerationText>, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompts
            .iter()
            .map(|p| GenerationText::from(p.as_str()))
            .collect())
    }
}

/// Stub backend whose call always rejects with the given message.
pub struct FailingGenerator {
    pub message: String,
}

#[async_trait]
impl PromptGenerator for FailingGenerator {
    async fn generate_prompt(
        &self,
        _prompts: &[PromptText],
    ) -> Result<Vec<GenerationText>, Box<dyn std::error::Error + Send + Sync>> {
        Err(self.message.clone().into())
    }
}

/// Stub backend that violates the one-generation-per-prompt contract by
/// always answering with a single generation.
pub struct MiscountingGenerator;

#[async_trait]
impl PromptGenerator for MiscountingGenerator {
    async fn generate_prompt(
        &self,
        _prompts: &[PromptText],
    ) -> Result<Vec<GenerationText>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(vec![GenerationText::from("only one")])
    }
}

/// OpenAI-style chat completion body with the given message text.
pub fn chat_completion_body(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "test_model",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": text
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

/// Mounts a chat-completions endpoint answering every request with `text`.
pub async fn mount_chat_completions(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path_regex(r".*/chat/completions$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(text)))
        .mount(server)
        .await;
}
