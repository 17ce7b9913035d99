use crate::models::types::{GenerationText, ModelName, PromptText};
use crate::services::settings::{DEFAULT_BASE_URL, LlmConfig, ModelOptions, resolve_api_key_from_env};
use crate::traits::prompt_generator::PromptGenerator;
use async_trait::async_trait;

use ai_lib::ConnectionOptions;
use ai_lib::prelude::*;
use bon::Builder;
use futures_util::future::try_join_all;
use tokio::sync::Mutex;
use tracing::info;

/// Lazily-built handle onto the wrapped chat client.
struct Engine {
    cloud: AiClient,
}

/// Production [`PromptGenerator`] bound to an OpenAI-compatible foundation
/// endpoint via ai-lib. The wrapped client owns transport, auth and retry;
/// this type only shapes requests and unwraps responses.
#[derive(Builder)]
pub struct FoundationChatModel {
    pub model: ModelName,
    pub options: ModelOptions,
    api_key: Option<String>,
    base_url: Option<String>,
    proxy: Option<String>,
    request_timeout_secs: Option<u64>,
    log_prompt_preview_chars: Option<usize>,
    #[builder(default)]
    engine: Mutex<Option<Engine>>,
}

impl FoundationChatModel {
    pub fn from_config(llm: &LlmConfig) -> Self {
        Self {
            model: ModelName::from(llm.model.clone().unwrap_or_default()),
            options: llm.model_options(),
            api_key: resolve_api_key_from_env(llm.api_key.as_deref()),
            base_url: llm.base_url.clone(),
            proxy: llm.proxy.clone(),
            request_timeout_secs: llm.request_timeout_secs,
            log_prompt_preview_chars: llm.log_prompt_preview_chars,
            engine: Mutex::new(None),
        }
    }

    async fn ensure_engine(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.engine.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let base_url = self
            .base_url
            .clone()
            .or_else(|| Some(DEFAULT_BASE_URL.to_string()));

        info!(
            base_url = %base_url.as_deref().unwrap_or("None"),
            proxy = %self.proxy.as_deref().unwrap_or("None"),
            timeout = %self.request_timeout_secs.map_or("None".to_string(), |t| t.to_string()),
            "foundation: initializing chat client"
        );

        let client = AiClient::with_options(
            Provider::OpenAI,
            ConnectionOptions {
                base_url,
                proxy: self.proxy.clone(),
                api_key: self.api_key.clone(),
                timeout: self.request_timeout_secs.map(std::time::Duration::from_secs),
                disable_proxy: false,
            },
        )?;
        *guard = Some(Engine { cloud: client });
        Ok(())
    }

    fn request_for(&self, model_name: &str, prompt: &PromptText) -> ChatCompletionRequest {
        let mut req = ChatCompletionRequest::new(
            model_name.to_string(),
            vec![Message {
                role: Role::User,
                content: Content::new_text(prompt.as_str().to_string()),
                function_call: None,
            }],
        );
        if let Some(t) = self.options.temperature {
            req = req.with_temperature(t);
        }
        if let Some(m) = self.options.max_tokens {
            req = req.with_max_tokens(m);
        }
        req
    }
}

#[async_trait]
impl PromptGenerator for FoundationChatModel {
    async fn generate_prompt(
        &self,
        prompts: &[PromptText],
    ) -> Result<Vec<GenerationText>, Box<dyn std::error::Error + Send + Sync>> {
        if prompts.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_engine().await?;
        let guard = self.engine.lock().await;
        let engine = guard.as_ref().expect("engine initialized");
        let client = &engine.cloud;

        let model_name = if self.model.is_empty() {
            client.default_chat_model().to_string()
        } else {
            self.model.as_str().to_string()
        };

        let preview_len: usize = self.log_prompt_preview_chars.unwrap_or(200);
        let prompt_preview: String = prompts[0].as_str().chars().take(preview_len).collect();
        info!(
            model = %model_name,
            prompt_count = prompts.len(),
            prompt_preview = %prompt_preview,
            "foundation: chat request"
        );

        // One request per prompt inside the single batch call; try_join_all
        // keeps the result order aligned with the prompt order.
        let responses = try_join_all(
            prompts
                .iter()
                .map(|p| client.chat_completion(self.request_for(&model_name, p))),
        )
        .await?;

        let mut generations = Vec::with_capacity(responses.len());
        for resp in &responses {
            let choice = resp
                .choices
                .first()
                .ok_or("chat response contained no choices")?;
            generations.push(GenerationText::from(choice.message.content.as_text()));
        }

        if let Some(first) = generations.first() {
            let response_preview: String = first.as_str().chars().take(preview_len).collect();
            info!(
                model = %model_name,
                generation_count = generations.len(),
                response_preview = %response_preview,
                "foundation: chat response"
            );
        }
        Ok(generations)
    }
}
