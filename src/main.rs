//! Transcript Translator
//!
//! Entry point for the HTTP service and the one-shot file translation command.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use transcript_translator::cli::{Args, Commands};
use transcript_translator::completion::OpenAiClient;
use transcript_translator::config::Config;
use transcript_translator::logging;
use transcript_translator::server::{self, AppState};
use transcript_translator::transcript::{validate_segments, TranscriptSegment};
use transcript_translator::translate::{BatchTranslator, ScriptDetector, Translator};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = logging::init(args.verbose, &std::env::current_dir()?)?;
    info!("Starting Transcript Translator");

    let mut config = load_config(&args)?;

    match args.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

            let state = AppState {
                translator: Arc::new(build_translator(&config)?),
            };
            server::serve(addr, state).await?;
        }
        Commands::Translate { input, output } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut segments: Vec<TranscriptSegment> = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a transcript", input.display()))?;
            validate_segments(&segments)?;

            build_translator(&config)?.translate(&mut segments).await?;

            let rendered = serde_json::to_string_pretty(&segments)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote translated transcript to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Check => {
            OpenAiClient::new(config.completion.clone())?
                .check_availability()
                .await?;
            println!(
                "Completion service at {} serves model '{}'",
                config.completion.host, config.completion.model
            );
        }
        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Default configuration written to {}", output.display());
        }
    }

    Ok(())
}

/// Defaults, then the config file, then `.env` and `OPEN_AI_*` variables
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }
    config.apply_env_overrides(|name| std::env::var(name).ok());
    config.validate()?;

    if config.completion.api_key.is_empty() {
        warn!("No completion API key configured; requests with foreign text will likely be rejected");
    }
    info!(
        "Completion service: {} (model {}), detection policy: {:?}",
        config.completion.host, config.completion.model, config.detection.policy
    );

    Ok(config)
}

fn build_translator(config: &Config) -> Result<BatchTranslator<OpenAiClient>> {
    let client = OpenAiClient::new(config.completion.clone())?;
    Ok(BatchTranslator::new(client, ScriptDetector::new(config.detection.policy)))
}
