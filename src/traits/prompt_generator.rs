use async_trait::async_trait;

use crate::models::types::{GenerationText, PromptText};

/// Defines the interface to an external text-generation backend
/// (e.g. an OpenAI-compatible chat endpoint).
///
/// This trait allows consumers to abstract over different backend
/// implementations (e.g., real HTTP clients, stubs for testing).
///
/// Any implementation must be thread-safe (`Send + Sync`). A call takes one
/// ordered batch of prompts and must return exactly one generation per
/// prompt, in the same order. Failures from the backend propagate unchanged.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    /// Sends an ordered prompt batch in one call and returns the ordered
    /// generations.
    async fn generate_prompt(
        &self,
        prompts: &[PromptText],
    ) -> Result<Vec<GenerationText>, Box<dyn std::error::Error + Send + Sync>>;
}
