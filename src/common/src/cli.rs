use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments shared by every subcommand
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

impl CommonArgs {
    /// Log level selected by the flags; quiet wins over verbose
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Subcommands that only look at the configuration
#[derive(Subcommand, Debug, Clone)]
pub enum CommonCommands {
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Stands in for secrets when configuration is printed
    pub const REDACTED: &str = "<redacted>";

    /// Initialize logging based on CLI arguments
    ///
    /// `RUST_LOG` is honored unless `--verbose` or `--quiet` is given. Logs
    /// go to stderr so resolved options can be piped.
    pub fn init_logging(args: &CommonArgs) {
        let level = args.log_level();
        let filter = if args.verbose || args.quiet {
            EnvFilter::new(level)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Render configuration in human-readable or JSON format
    pub fn render_config(config: &Configuration, json: bool) -> Result<String> {
        if json {
            let mut redacted = config.clone();
            if redacted.backend.bearer_token.is_some() {
                redacted.backend.bearer_token = Some(REDACTED.to_string());
            }
            return serde_json::to_string_pretty(&redacted)
                .context("Failed to serialize configuration to JSON");
        }

        let backend = &config.backend;
        let mut lines = vec![
            "metricfind Configuration:".to_string(),
            "=========================".to_string(),
            format!("Backend URL: {}", backend.url),
            format!("Backend flavor: {}", backend.flavor),
            format!(
                "Backend version: {}",
                backend.version.as_deref().unwrap_or("(probe build info)")
            ),
        ];
        match backend.labels_match_api {
            Some(enabled) => lines.push(format!("Label values match[]: {enabled} (forced)")),
            None => lines.push("Label values match[]: by version".to_string()),
        }
        lines.push(format!(
            "Request timeout: {}",
            humantime::format_duration(backend.timeout)
        ));
        lines.push(format!(
            "Bearer token: {}",
            if backend.bearer_token.is_some() {
                "set"
            } else {
                "not set"
            }
        ));
        Ok(lines.join("\n"))
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        let backend = &config.backend;
        if backend.url.is_empty() {
            anyhow::bail!("Backend URL cannot be empty");
        }

        if !backend.url.starts_with("http://") && !backend.url.starts_with("https://") {
            anyhow::bail!("Backend URL must use http or https: {}", backend.url);
        }

        if backend.timeout.is_zero() {
            anyhow::bail!("Backend timeout must be greater than zero");
        }

        if let Some(token) = &backend.bearer_token {
            if token.trim().is_empty() {
                anyhow::bail!("Bearer token cannot be blank when set");
            }
        }

        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Run a configuration-only command
    pub fn handle_common_command(command: &CommonCommands, config: &Configuration) -> Result<()> {
        match command {
            CommonCommands::Config { json } => {
                println!("{}", render_config(config, *json)?);
            }
            CommonCommands::Validate => {
                validate_config(config)?;
                println!("Configuration is valid");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use std::time::Duration;

    fn args(verbose: bool, quiet: bool) -> CommonArgs {
        CommonArgs {
            config: None,
            verbose,
            quiet,
        }
    }

    #[test]
    fn test_log_level() {
        assert_eq!(args(false, false).log_level(), "info");
        assert_eq!(args(true, false).log_level(), "debug");
        assert_eq!(args(false, true).log_level(), "warn");
        assert_eq!(args(true, true).log_level(), "warn");
    }

    #[test]
    fn test_validate_default_config() {
        assert!(utils::validate_config(&Configuration::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = Configuration::default();
        config.backend.url = String::new();

        let err = utils::validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("URL cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        let mut config = Configuration::default();
        config.backend.url = "ftp://prometheus:9090".to_string();

        assert!(utils::validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Configuration::default();
        config.backend.timeout = Duration::ZERO;

        let err = utils::validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_render_config_text() {
        let mut config = Configuration::default();
        config.backend.bearer_token = Some("secret".to_string());

        let text = utils::render_config(&config, false).unwrap();
        assert!(text.contains("Backend URL: http://localhost:9090"));
        assert!(text.contains("Backend flavor: prometheus"));
        assert!(text.contains("Request timeout: 30s"));
        assert!(text.contains("Bearer token: set"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_render_config_json() {
        let json = utils::render_config(&Configuration::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["backend"]["url"], "http://localhost:9090");
        assert_eq!(value["backend"]["flavor"], "prometheus");
        assert_eq!(value["backend"]["timeout"], "30s");
    }

    #[test]
    fn test_render_config_json_redacts_token() {
        let mut config = Configuration::default();
        config.backend.bearer_token = Some("s3cr3t".to_string());

        let json = utils::render_config(&config, true).unwrap();
        assert!(!json.contains("s3cr3t"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["backend"]["bearer_token"], utils::REDACTED);
        assert_eq!(config.backend.bearer_token.as_deref(), Some("s3cr3t"));
    }
}
