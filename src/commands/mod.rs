pub mod classify;
pub mod resolve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::Configuration;
use common::cli::{CommonArgs, CommonCommands, utils};
use prom_client::{ClientOptions, PrometheusClient};
use resolver::LabelValuesStrategy;

/// metricfind: resolve dashboard variable queries against Prometheus
#[derive(Parser)]
#[command(name = "metricfind", version, about)]
pub struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a variable query into its options
    Resolve(resolve::ResolveArgs),
    /// Show which query form a query is classified as
    Classify(classify::ClassifyArgs),
    /// Show version information and exit
    Version,
    #[command(flatten)]
    Common(CommonCommands),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        utils::init_logging(&self.common);

        match self.command {
            Commands::Resolve(args) => {
                let config = utils::load_config(self.common.config.as_ref())?;
                utils::validate_config(&config)?;
                args.run(&config).await
            }
            Commands::Classify(args) => args.run(),
            Commands::Version => {
                println!("{}", version_info());
                Ok(())
            }
            Commands::Common(command) => {
                let config = utils::load_config(self.common.config.as_ref())?;
                utils::handle_common_command(&command, &config)
            }
        }
    }
}

fn version_info() -> String {
    format!(
        "{} {} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION")
    )
}

/// HTTP client for the configured backend
pub fn build_client(config: &Configuration) -> Result<PrometheusClient> {
    let options = ClientOptions {
        timeout: Some(config.backend.timeout),
        bearer_token: config.backend.bearer_token.clone(),
    };
    PrometheusClient::new(&config.backend.url, &options).context("Failed to create backend client")
}

/// Configured strategy, or the one matching the version the backend reports
pub async fn label_values_strategy(
    config: &Configuration,
    client: &PrometheusClient,
) -> LabelValuesStrategy {
    match config.backend.configured_strategy() {
        Some(strategy) => {
            tracing::debug!("Using configured label values strategy {strategy:?}");
            strategy
        }
        None => {
            client
                .detect_label_values_strategy(config.backend.flavor)
                .await
        }
    }
}
