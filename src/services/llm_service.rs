use std::future::Future;
use std::sync::Arc;

use crate::models::types::{ModelName, PROMPT_INPUT, PromptBatch, PromptText};
use crate::services::chat_model::FoundationChatModel;
use crate::services::settings::{LlmConfig, ModelOptions, resolve_api_key_from_env};
use crate::traits::prompt_generator::PromptGenerator;
use tracing::info;

/// Drives a future to completion on a throwaway current-thread runtime.
/// Must not be called from within an async context.
fn block_on<T>(
    future: impl Future<Output = T>,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Factory for clients bound to a foundation chat model. Holds the resolved
/// API key and the default generation options shared by every client it
/// produces. Immutable once constructed.
pub struct FoundationService {
    api_key: Option<String>,
    defaults: ModelOptions,
    base_url: Option<String>,
    proxy: Option<String>,
    request_timeout_secs: Option<u64>,
    log_prompt_preview_chars: Option<usize>,
}

impl FoundationService {
    /// Resolves the effective API key once: the explicit argument when
    /// provided, else the `NVIDIA_API_KEY` environment variable, else absent.
    /// Default options are stored as-is, without validation.
    pub fn new(api_key: Option<&str>, defaults: ModelOptions) -> Self {
        Self {
            api_key: resolve_api_key_from_env(api_key),
            defaults,
            base_url: None,
            proxy: None,
            request_timeout_secs: None,
            log_prompt_preview_chars: None,
        }
    }

    pub fn from_config(llm: &LlmConfig) -> Self {
        Self {
            api_key: resolve_api_key_from_env(llm.api_key.as_deref()),
            defaults: llm.model_options(),
            base_url: llm.base_url.clone(),
            proxy: llm.proxy.clone(),
            request_timeout_secs: llm.request_timeout_secs,
            log_prompt_preview_chars: llm.log_prompt_preview_chars,
        }
    }

    /// The API key resolved at construction, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns a new client bound to `model_name`, with the service defaults
    /// overridden key-by-key by `overrides`. The model name is not validated
    /// here; a bad name surfaces as whatever error the backend raises.
    pub fn get_client(&self, model_name: &str, overrides: ModelOptions) -> FoundationClient {
        let model = ModelName::from(model_name);
        let options = self.defaults.overridden_by(&overrides);
        let generator = FoundationChatModel::builder()
            .model(model.clone())
            .options(options.clone())
            .maybe_api_key(self.api_key.clone())
            .maybe_base_url(self.base_url.clone())
            .maybe_proxy(self.proxy.clone())
            .maybe_request_timeout_secs(self.request_timeout_secs)
            .maybe_log_prompt_preview_chars(self.log_prompt_preview_chars)
            .build();
        FoundationClient::new(Arc::new(generator), model, options)
    }

    /// Same as [`get_client`](Self::get_client) but with an injected backend,
    /// for callers that bring their own [`PromptGenerator`] binding.
    pub fn get_client_with(
        &self,
        generator: Arc<dyn PromptGenerator>,
        model_name: &str,
        overrides: ModelOptions,
    ) -> FoundationClient {
        FoundationClient::new(
            generator,
            ModelName::from(model_name),
            self.defaults.overridden_by(&overrides),
        )
    }
}

/// Client bound to a single model. Wraps a [`PromptGenerator`] and exposes
/// the generate operations; stateless beyond its immutable configuration,
/// each call is independent.
pub struct FoundationClient {
    generator: Arc<dyn PromptGenerator>,
    model: ModelName,
    options: ModelOptions,
}

impl FoundationClient {
    pub fn new(generator: Arc<dyn PromptGenerator>, model: ModelName, options: ModelOptions) -> Self {
        Self {
            generator,
            model,
            options,
        }
    }

    pub fn model(&self) -> &ModelName {
        &self.model
    }

    /// The merged generation options this client was bound with.
    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Declares the expected shape of a batch-input mapping: always exactly
    /// `["prompt"]`.
    pub fn input_names(&self) -> Vec<String> {
        vec![PROMPT_INPUT.to_string()]
    }

    /// Sends a single prompt and returns the single response text. Errors
    /// raised by the backend propagate unchanged.
    pub async fn generate_async(
        &self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        info!(model = %self.model, prompt_len = prompt.len(), "generate: start");
        let prompts = [PromptText::from(prompt)];
        let mut generations = self.generator.generate_prompt(&prompts).await?;
        if generations.len() != 1 {
            return Err(format!(
                "backend returned {} generations for 1 prompt",
                generations.len()
            )
            .into());
        }
        let text = generations.remove(0).into_inner();
        info!(model = %self.model, generated_len = text.len(), "generate: done");
        Ok(text)
    }

    /// Sends the ordered `"prompt"` sequence of `inputs` in one backend call
    /// and returns the response texts in input order, one per prompt. A batch
    /// missing the `"prompt"` key is an error; an empty sequence yields an
    /// empty result without calling the backend.
    pub async fn generate_batch_async(
        &self,
        inputs: &PromptBatch,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let prompts = inputs
            .prompts()
            .ok_or_else(|| format!("batch input is missing the \"{PROMPT_INPUT}\" key"))?;
        if prompts.is_empty() {
            return Ok(Vec::new());
        }
        info!(model = %self.model, prompt_count = prompts.len(), "generate_batch: start");
        let prompt_texts: Vec<PromptText> = prompts
            .iter()
            .map(|p| PromptText::from(p.as_str()))
            .collect();
        let generations = self.generator.generate_prompt(&prompt_texts).await?;
        if generations.len() != prompt_texts.len() {
            return Err(format!(
                "backend returned {} generations for {} prompts",
                generations.len(),
                prompt_texts.len()
            )
            .into());
        }
        info!(model = %self.model, generation_count = generations.len(), "generate_batch: done");
        Ok(generations.into_iter().map(|g| g.into_inner()).collect())
    }

    /// Blocking variant of [`generate_async`](Self::generate_async). Must not
    /// be called from within an async context.
    pub fn generate(&self, prompt: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        block_on(self.generate_async(prompt))?
    }

    /// Blocking variant of [`generate_batch_async`](Self::generate_batch_async).
    /// Must not be called from within an async context.
    pub fn generate_batch(
        &self,
        inputs: &PromptBatch,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        block_on(self.generate_batch_async(inputs))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::GenerationText;
    use async_trait::async_trait;

    struct UpperGenerator;

    #[async_trait]
    impl PromptGenerator for UpperGenerator {
        async fn generate_prompt(
            &self,
            prompts: &[PromptText],
        ) -> Result<Vec<GenerationText>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(prompts
                .iter()
                .map(|p| GenerationText::from(p.as_str().to_uppercase()))
                .collect())
        }
    }

    #[test]
    fn input_names_is_fixed() {
        let client = FoundationClient::new(
            Arc::new(UpperGenerator),
            ModelName::from("test_model"),
            ModelOptions::default(),
        );
        assert_eq!(client.input_names(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn client_keeps_bound_model_and_options() {
        let options = ModelOptions::builder().temperature(0.5).build();
        let client = FoundationClient::new(
            Arc::new(UpperGenerator),
            ModelName::from("test_model"),
            options.clone(),
        );
        assert_eq!(client.model().as_str(), "test_model");
        assert_eq!(client.options(), &options);
        assert_eq!(client.generate_async("abc").await.unwrap(), "ABC");
    }
}
