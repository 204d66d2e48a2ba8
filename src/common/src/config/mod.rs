use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use resolver::{BackendFlavor, LabelValuesStrategy};
use serde::{Deserialize, Serialize};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "metricfind.toml";

/// Prefix of environment overrides, e.g. `METRICFIND__BACKEND__URL`
pub const ENV_PREFIX: &str = "METRICFIND__";

/// Connection to the Prometheus-compatible backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Base URL, without the `/api/v1` suffix
    pub url: String,
    /// Backend implementation, used with `version` to pick the label values strategy
    pub flavor: BackendFlavor,
    /// Backend version; probed from build info when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Force (or forbid) `match[]` on the label values endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels_match_api: Option<bool>,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:9090"),
            flavor: BackendFlavor::default(),
            version: None,
            labels_match_api: None,
            timeout: Duration::from_secs(30),
            bearer_token: None,
        }
    }
}

impl BackendConfig {
    /// Strategy decided by configuration alone
    ///
    /// An explicit `labels_match_api` wins over `flavor` and `version`.
    /// Returns `None` when neither is set and the version has to be probed.
    pub fn configured_strategy(&self) -> Option<LabelValuesStrategy> {
        match (self.labels_match_api, &self.version) {
            (Some(enabled), _) => Some(LabelValuesStrategy::from_support(enabled)),
            (None, Some(version)) => Some(self.flavor.label_values_strategy(Some(version))),
            (None, None) => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Configuration {
    /// Backend connection settings
    pub backend: BackendConfig,
}

impl Configuration {
    /// Defaults, then `metricfind.toml`, then `METRICFIND__` environment variables
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(CONFIG_FILE))
            .extract()
            .map_err(Box::new)
    }

    /// Like [`Configuration::load`] with an explicit configuration file
    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        if !path.is_file() {
            return Err(Box::new(figment::Error::from(format!(
                "configuration file not found: {}",
                path.display()
            ))));
        }
        Self::figment(Toml::file_exact(path))
            .extract()
            .map_err(Box::new)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();

        assert_eq!(config.backend.url, "http://localhost:9090");
        assert_eq!(config.backend.flavor, BackendFlavor::Prometheus);
        assert_eq!(config.backend.timeout, Duration::from_secs(30));
        assert!(config.backend.version.is_none());
        assert!(config.backend.bearer_token.is_none());
    }

    #[test]
    fn test_configless_operation() {
        Jail::expect_with(|_jail| {
            let config = Configuration::load().map_err(|e| *e)?;
            assert_eq!(config, Configuration::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [backend]
                url = "https://mimir.example.com/prometheus"
                flavor = "mimir"
                version = "2.10.3"
                timeout = "5s"
                "#,
            )?;

            let config = Configuration::load().map_err(|e| *e)?;
            assert_eq!(config.backend.url, "https://mimir.example.com/prometheus");
            assert_eq!(config.backend.flavor, BackendFlavor::Mimir);
            assert_eq!(config.backend.version.as_deref(), Some("2.10.3"));
            assert_eq!(config.backend.timeout, Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn test_env_var_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [backend]
                url = "http://from-file:9090"
                "#,
            )?;
            jail.set_env("METRICFIND__BACKEND__URL", "http://from-env:9090");
            jail.set_env("METRICFIND__BACKEND__LABELS_MATCH_API", "true");
            jail.set_env("METRICFIND__BACKEND__TIMEOUT", "1m 30s");

            let config = Configuration::load().map_err(|e| *e)?;
            assert_eq!(config.backend.url, "http://from-env:9090");
            assert_eq!(config.backend.labels_match_api, Some(true));
            assert_eq!(config.backend.timeout, Duration::from_secs(90));
            Ok(())
        });
    }

    #[test]
    fn test_load_from_path() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "staging.toml",
                r#"
                [backend]
                flavor = "thanos"
                bearer_token = "secret"
                "#,
            )?;

            let config = Configuration::load_from_path(Path::new("staging.toml")).map_err(|e| *e)?;
            assert_eq!(config.backend.flavor, BackendFlavor::Thanos);
            assert_eq!(config.backend.bearer_token.as_deref(), Some("secret"));
            assert_eq!(config.backend.url, "http://localhost:9090");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        Jail::expect_with(|_jail| {
            assert!(Configuration::load_from_path(Path::new("missing.toml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_flavor_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("METRICFIND__BACKEND__FLAVOR", "influx");
            assert!(Configuration::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_configured_strategy() {
        let mut backend = BackendConfig::default();
        assert_eq!(backend.configured_strategy(), None);

        backend.version = Some("2.23.1".to_string());
        assert_eq!(
            backend.configured_strategy(),
            Some(LabelValuesStrategy::SeriesFallback)
        );

        backend.version = Some("2.45.0".to_string());
        assert_eq!(
            backend.configured_strategy(),
            Some(LabelValuesStrategy::MatchApi)
        );

        backend.labels_match_api = Some(false);
        assert_eq!(
            backend.configured_strategy(),
            Some(LabelValuesStrategy::SeriesFallback)
        );
    }
}
