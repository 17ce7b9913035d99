pub mod models;
pub mod services;
pub mod traits;

use tracing::info;

use crate::models::types::PromptBatch;
use crate::services::llm_service::FoundationService;
use crate::services::settings::{AppConfig, ModelOptions, load_config};

/// High-level entrypoint: load config, init logging, run the prompts.
pub async fn run_with_config_path(
    path: &str,
    model_override: Option<String>,
    prompts: Vec<String>,
) -> anyhow::Result<()> {
    let cfg: AppConfig = load_config(path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {}", path, e))?;

    // Initialize structured logging (default to info if RUST_LOG not set)
    let log_spec = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_spec))
        .with_target(false)
        .compact()
        .try_init();

    run_prompts(cfg, model_override, prompts).await
}

/// Builds the service and client from config and runs one prompt or an
/// ordered batch, printing one generation per line in input order.
pub async fn run_prompts(
    cfg: AppConfig,
    model_override: Option<String>,
    prompts: Vec<String>,
) -> anyhow::Result<()> {
    let model = model_override
        .or_else(|| cfg.llm.model.clone())
        .unwrap_or_default();
    info!(model = %model, prompt_count = prompts.len(), "nvfoundry starting");

    let service = FoundationService::from_config(&cfg.llm);
    let client = service.get_client(&model, ModelOptions::default());

    if prompts.len() == 1 {
        let text = client
            .generate_async(&prompts[0])
            .await
            .map_err(|e| anyhow::anyhow!("generation failed: {e}"))?;
        println!("{}", text);
    } else {
        let batch = PromptBatch::from_prompts(prompts);
        let texts = client
            .generate_batch_async(&batch)
            .await
            .map_err(|e| anyhow::anyhow!("batch generation failed: {e}"))?;
        for text in texts {
            println!("{}", text);
        }
    }
    Ok(())
}
