use bon::Builder;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Environment variable consulted when no explicit API key is given.
pub const API_KEY_ENV: &str = "NVIDIA_API_KEY";

/// Default chat endpoint (OpenAI-compatible).
pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LlmConfig {
    pub model: Option<String>,
    // connection options handed to the wrapped client
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub proxy: Option<String>,
    pub request_timeout_secs: Option<u64>,
    // generation defaults applied to every client unless overridden
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    // Logging options
    pub log_prompt_preview_chars: Option<usize>,
}

impl LlmConfig {
    /// Default generation options carried by this config.
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Generation knobs forwarded to the wrapped chat request. Unset fields are
/// left to the backend's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Builder)]
pub struct ModelOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ModelOptions {
    /// Shallow key-wise override: a field set in `overrides` wins, an unset
    /// one falls back to `self`.
    pub fn overridden_by(&self, overrides: &ModelOptions) -> ModelOptions {
        ModelOptions {
            temperature: overrides.temperature.or(self.temperature),
            max_tokens: overrides.max_tokens.or(self.max_tokens),
        }
    }
}

/// Resolves the effective API key: the explicit argument when provided,
/// otherwise the value of [`API_KEY_ENV`] per the injected lookup, otherwise
/// absent. The lookup is a parameter so the precedence matrix is testable
/// without touching process state.
pub fn resolve_api_key<F>(explicit: Option<&str>, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match explicit {
        Some(key) => Some(key.to_string()),
        None => env(API_KEY_ENV),
    }
}

/// [`resolve_api_key`] against the process environment.
pub fn resolve_api_key_from_env(explicit: Option<&str>) -> Option<String> {
    resolve_api_key(explicit, |name| std::env::var(name).ok())
}

pub fn load_config<P: AsRef<Path>>(
    path: P,
) -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
    let content = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}
