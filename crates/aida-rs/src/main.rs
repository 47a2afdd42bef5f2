//! `aida` binary: loads config, seeds the knowledge base, and serves HTTP.

use aida_rs::config::{AidaConfig, LoadOptions};
use aida_rs::core::{ProviderSettings, build_assistant};
use aida_rs::server::build_rocket;
use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the AIDA server.
#[derive(Debug, Parser)]
#[command(name = "aida", version)]
struct Cli {
    /// Extra aida.json5 file layered over the user and project files
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to bind
    #[arg(long)]
    address: Option<String>,
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
    /// OpenAI chat model, wins over OPENAI_MODEL
    #[arg(long)]
    model: Option<String>,
    /// Use the local hashing embedder and extractive answers
    #[arg(long)]
    offline: bool,
}

/// Command-line flags win over every config source.
fn apply_overrides(mut config: AidaConfig, cli: &Cli) -> AidaConfig {
    if let Some(address) = cli.address.as_ref() {
        config.server.address = address.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(model) = cli.model.as_ref() {
        config.generation.model = model.clone();
    }
    config
}

fn load_config(cli: &Cli) -> anyhow::Result<AidaConfig> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let options = LoadOptions::discover(&cwd).with_explicit_file(cli.config.clone());
    let resolved = AidaConfig::resolve(options).context("failed to load config")?;
    for info in &resolved.sources {
        match info.path.as_ref() {
            Some(path) => debug!("config source {} ({})", info.source, path.display()),
            None => debug!("config source {}", info.source),
        }
    }
    Ok(resolved.config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aida_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting aida (config_set={}, offline={})",
        cli.config.is_some(),
        cli.offline
    );
    let config = apply_overrides(load_config(&cli)?, &cli);
    config.validate().context("invalid config")?;

    let settings = ProviderSettings::from_env().offline(cli.offline);
    let assistant = build_assistant(&config, &settings)
        .await
        .context("failed to build assistant")?;

    let _rocket = build_rocket(Arc::new(assistant), &config.server)
        .launch()
        .await
        .context("http server failed")?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, apply_overrides};
    use aida_rs::config::{AidaConfig, LoadOptions};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from(["aida", "--port", "9001", "--model", "gpt-4o-mini", "--offline"]);
        let config = apply_overrides(AidaConfig::default(), &cli);
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert!(cli.offline);
    }

    #[test]
    fn config_is_untouched_without_flags() {
        let mut base = AidaConfig::default();
        base.generation.model = "from-file".to_string();
        let config = apply_overrides(base, &Cli::parse_from(["aida"]));
        assert_eq!(config.generation.model, "from-file");
        assert_eq!(config.server.port, 8000);
    }
}
