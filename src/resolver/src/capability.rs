//! Backend capability selection
//!
//! Whether `label_values(<metric>, <label>)` can be answered by the label
//! values endpoint with a `match[]` parameter depends on the backend and its
//! version. The choice is made once, up front, and handed to the resolver as
//! a [`LabelValuesStrategy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How label values restricted to a metric are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelValuesStrategy {
    /// `/api/v1/label/<label>/values?match[]=<metric>`
    MatchApi,
    /// `/api/v1/series?match[]=<metric>`, values collected client side
    #[default]
    SeriesFallback,
}

impl LabelValuesStrategy {
    pub fn from_support(supports_match: bool) -> Self {
        if supports_match {
            LabelValuesStrategy::MatchApi
        } else {
            LabelValuesStrategy::SeriesFallback
        }
    }

    pub fn supports_match(&self) -> bool {
        matches!(self, LabelValuesStrategy::MatchApi)
    }
}

/// Prometheus-compatible backend implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFlavor {
    #[default]
    Prometheus,
    Mimir,
    Cortex,
    Thanos,
}

impl BackendFlavor {
    /// First release accepting `match[]` on the label values endpoint
    fn label_match_since(&self) -> Version {
        match self {
            BackendFlavor::Prometheus => Version::new(2, 24, 0),
            BackendFlavor::Mimir => Version::new(2, 0, 0),
            BackendFlavor::Cortex => Version::new(1, 11, 0),
            BackendFlavor::Thanos => Version::new(0, 18, 0),
        }
    }

    /// Pick the strategy for this flavor at `version`. An unknown or
    /// unparsable version selects the fallback.
    pub fn label_values_strategy(&self, version: Option<&str>) -> LabelValuesStrategy {
        let supported = version
            .and_then(|v| v.parse::<Version>().ok())
            .is_some_and(|v| v >= self.label_match_since());
        LabelValuesStrategy::from_support(supported)
    }
}

impl fmt::Display for BackendFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFlavor::Prometheus => f.write_str("prometheus"),
            BackendFlavor::Mimir => f.write_str("mimir"),
            BackendFlavor::Cortex => f.write_str("cortex"),
            BackendFlavor::Thanos => f.write_str("thanos"),
        }
    }
}

impl FromStr for BackendFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prometheus" => Ok(BackendFlavor::Prometheus),
            "mimir" => Ok(BackendFlavor::Mimir),
            "cortex" => Ok(BackendFlavor::Cortex),
            "thanos" => Ok(BackendFlavor::Thanos),
            other => Err(format!("unknown backend flavor: {other}")),
        }
    }
}

/// `major.minor.patch` as reported by build info; a leading `v` and any
/// pre-release or build suffix are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Version {
    major: u64,
    minor: u64,
    patch: u64,
}

impl Version {
    const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s
            .trim()
            .trim_start_matches('v')
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let mut parts = core.split('.');
        let major = parts.next().unwrap_or_default().parse()?;
        let minor = parts.next().map(str::parse).transpose()?.unwrap_or(0);
        let patch = parts.next().map(str::parse).transpose()?.unwrap_or(0);
        Ok(Version::new(major, minor, patch))
    }
}
