use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use common::Configuration;
use resolver::{ResultItem, Resolver, TimeRange, VariableContext};

/// A point in time relative to the moment the command runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeArg {
    /// `now`, or `now-<duration>`
    Relative(Duration),
    /// RFC 3339 timestamp
    Absolute(DateTime<Utc>),
}

impl TimeArg {
    pub fn at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match self {
            TimeArg::Absolute(time) => Ok(*time),
            TimeArg::Relative(offset) => {
                let offset = chrono::Duration::from_std(*offset)
                    .with_context(|| format!("Offset out of range: {offset:?}"))?;
                now.checked_sub_signed(offset)
                    .context("Relative time is out of range")
            }
        }
    }
}

impl FromStr for TimeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "now" {
            return Ok(TimeArg::Relative(Duration::ZERO));
        }
        if let Some(offset) = s.strip_prefix("now-") {
            return humantime::parse_duration(offset)
                .map(TimeArg::Relative)
                .map_err(|e| format!("invalid duration {offset:?}: {e}"));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|time| TimeArg::Absolute(time.with_timezone(&Utc)))
            .map_err(|e| format!("expected now, now-<duration> or an RFC 3339 time: {e}"))
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected <name>=<value>, got {s:?}")),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One option per line
    #[default]
    Text,
    /// JSON array of `{text, expandable}`
    Json,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Variable query, e.g. `label_values(up, job)`
    query: String,

    /// Start of the time range
    #[arg(long, default_value = "now-1h")]
    from: TimeArg,

    /// End of the time range
    #[arg(long, default_value = "now")]
    to: TimeArg,

    /// Template variable, may be repeated
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl ResolveArgs {
    pub async fn run(self, config: &Configuration) -> Result<()> {
        let range = self.range(Utc::now())?;
        let vars: VariableContext = self
            .vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let client = super::build_client(config)?;
        let strategy = super::label_values_strategy(config, &client).await;
        let resolver = Resolver::new(client, strategy);

        log::info!(
            "Resolving {:?} against {} from {} to {} ({:?})",
            self.query,
            config.backend.url,
            range.from,
            range.to,
            resolver.strategy()
        );
        let items = resolver
            .resolve_with(&self.query, range, &vars)
            .await
            .with_context(|| format!("Failed to resolve {:?}", self.query))?;

        println!("{}", render(&items, self.format)?);
        Ok(())
    }

    fn range(&self, now: DateTime<Utc>) -> Result<TimeRange> {
        let from = self.from.at(now)?;
        let to = self.to.at(now)?;
        if from > to {
            anyhow::bail!("Time range starts after it ends: {from} > {to}");
        }
        Ok(TimeRange::new(from, to))
    }
}

fn render(items: &[ResultItem], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            serde_json::to_string_pretty(items).context("Failed to serialize options to JSON")
        }
    }
}
