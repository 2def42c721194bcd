//! Charades CLI
//!
//! `charades [generate|offline|stats|reset]`, printing JSON to stdout.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use charades::generator::build_generator;
use charades::{CharadesConfig, StatementGenerator, WordRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = CharadesConfig::from_env().context("Invalid configuration")?;
    let registry = Arc::new(WordRegistry::from_config(&config));
    let command = std::env::args().nth(1).unwrap_or_else(|| "generate".to_string());

    match command.as_str() {
        "generate" | "offline" => {
            // Fallback content only when asked for; a missing generator is an error.
            let offline = command == "offline" || config.offline;
            let generator = if offline { None } else { build_generator(&config.llm)? };
            let statements = StatementGenerator::new(registry.clone(), generator, &config);

            let statement = statements.generate_for(offline).await?;
            println!("{}", serde_json::to_string_pretty(&statement)?);
        }
        "stats" => {
            let count = registry.count().await;
            let stats = json!({
                "backend": registry.backend_name(),
                "used_words": count,
                "data_dir": config.data_dir.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        "reset" => {
            registry.clear().await?;
            info!("Word history cleared");
        }
        other => bail!("Unknown command '{}'. Expected generate, offline, stats or reset", other),
    }

    Ok(())
}
