use clap::Parser;
use dotenv::dotenv;
use nvfoundry::run_with_config_path;

/// Nvfoundry - command-line front end for the foundation-model chat adapter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Model name override (falls back to llm.model from the config)
    #[arg(short, long)]
    model: Option<String>,

    /// Prompt to send; repeat the flag for an ordered batch
    #[arg(short, long, required = true)]
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from `.env` file into std::env (optional)
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Load config, init logging and run
    run_with_config_path(&args.config, args.model, args.prompt).await
}
