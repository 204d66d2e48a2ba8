//! Values passed between the resolver stages and its collaborators

use serde::{Deserialize, Serialize};

/// One option offered to the variable picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub text: String,
    /// Whether the picker may decompose `text` into further options
    #[serde(default)]
    pub expandable: bool,
}

impl ResultItem {
    /// A terminal item
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expandable: false,
        }
    }

    pub fn expandable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expandable: true,
        }
    }
}

/// A GET against the backend's HTTP API
///
/// Parameters are kept as an ordered list so that repeated names such as
/// `match[]` survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl MetadataRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }
}

/// A `label op value` filter handed to the tag keys capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    pub name: String,
    pub op: MatcherOp,
    pub value: String,
}

/// Label matcher types matching Prometheus semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherOp {
    /// Exact string match (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Regex match (=~)
    RegexMatch,
    /// Regex not match (!~)
    RegexNotMatch,
}

impl MatcherOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatcherOp::Equal => "=",
            MatcherOp::NotEqual => "!=",
            MatcherOp::RegexMatch => "=~",
            MatcherOp::RegexNotMatch => "!~",
        }
    }
}

impl LabelFilter {
    pub fn new(name: &str, op: MatcherOp, value: &str) -> Self {
        Self {
            name: name.to_string(),
            op,
            value: value.to_string(),
        }
    }

    /// Render as a single matcher, e.g. `job="node"`
    pub fn to_matcher(&self) -> String {
        format!("{}{}\"{}\"", self.name, self.op.as_str(), self.value)
    }
}

/// Render filters into a series selector, e.g. `{job="node",env=~"prod.*"}`
pub fn filters_to_selector(filters: &[LabelFilter]) -> String {
    let matchers = filters
        .iter()
        .map(LabelFilter::to_matcher)
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{matchers}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_item_defaults_to_terminal() {
        let item: ResultItem = serde_json::from_str(r#"{"text":"job"}"#).unwrap();
        assert_eq!(item, ResultItem::new("job"));
        assert!(!item.expandable);
    }

    #[test]
    fn test_metadata_request_keeps_repeated_params() {
        let request = MetadataRequest::new("/api/v1/series")
            .param("match[]", "up")
            .param("match[]", "process_start_time_seconds")
            .param("start", "10");

        assert_eq!(
            request.params,
            [
                ("match[]".to_string(), "up".to_string()),
                ("match[]".to_string(), "process_start_time_seconds".to_string()),
                ("start".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_filters_to_selector() {
        let filters = [
            LabelFilter::new("job", MatcherOp::Equal, "node"),
            LabelFilter::new("env", MatcherOp::RegexMatch, "prod.*"),
        ];
        assert_eq!(filters_to_selector(&filters), r#"{job="node",env=~"prod.*"}"#);
        assert_eq!(filters_to_selector(&[]), "{}");
    }
}
