//! Classification of variable queries into the supported meta query forms
//!
//! Forms overlap (`label_names()` is also a prefix of `label_names(<match>)`,
//! and anything unrecognized is a candidate series selector), so the rules
//! are an ordered list evaluated top to bottom and the first match wins.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// The supported query forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedForm {
    /// `label_names()`
    LabelNamesAll,
    /// `label_names(<match>)`, label names of series whose name matches
    LabelNamesFiltered { pattern: String },
    /// `label_values([<metric>,] <label>)`
    LabelValues {
        label: String,
        metric: Option<String>,
    },
    /// `metrics(<regex>)`
    MetricNames { pattern: String },
    /// `query_result(<query>)`
    QueryResult { query: String },
    /// Anything else, treated as a series selector
    FreeformSeriesSelector { query: String },
}

impl MatchedForm {
    /// Series selector sent for `label_names(<match>)`
    pub fn name_selector(pattern: &str) -> String {
        format!("{{__name__=~\".*{pattern}.*\"}}")
    }
}

impl fmt::Display for MatchedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedForm::LabelNamesAll => write!(f, "label names"),
            MatchedForm::LabelNamesFiltered { pattern } => {
                write!(f, "label names matching {pattern:?}")
            }
            MatchedForm::LabelValues {
                label,
                metric: Some(metric),
            } => write!(f, "values of label {label:?} on {metric:?}"),
            MatchedForm::LabelValues {
                label,
                metric: None,
            } => write!(f, "values of label {label:?}"),
            MatchedForm::MetricNames { pattern } => write!(f, "metric names matching {pattern:?}"),
            MatchedForm::QueryResult { query } => write!(f, "instant query {query:?}"),
            MatchedForm::FreeformSeriesSelector { query } => {
                write!(f, "series matching {query:?}")
            }
        }
    }
}

/// Bare forms that never fall back to a series selector
const RESERVED_EMPTY_FORMS: [&str; 3] = ["label_values()", "metrics()", "query_result()"];

struct Rule {
    pattern: &'static Lazy<Regex>,
    build: fn(&Captures) -> MatchedForm,
}

static LABEL_NAMES_MATCH: Lazy<Regex> = Lazy::new(|| compile(r"^label_names\((.+)\)\s*$"));
static LABEL_NAMES: Lazy<Regex> = Lazy::new(|| compile(r"^label_names\(\)\s*$"));
static LABEL_VALUES: Lazy<Regex> =
    Lazy::new(|| compile(r"^label_values\((?:(.+),\s*)?([A-Za-z_][A-Za-z0-9_]*)\)\s*$"));
static METRIC_NAMES: Lazy<Regex> = Lazy::new(|| compile(r"^metrics\((.+)\)\s*$"));
static QUERY_RESULT: Lazy<Regex> = Lazy::new(|| compile(r"^query_result\((.+)\)\s*$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("classifier patterns are valid")
}

fn capture(caps: &Captures, group: usize) -> String {
    caps.get(group)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

static RULES: [Rule; 5] = [
    Rule {
        pattern: &LABEL_NAMES_MATCH,
        build: |caps| MatchedForm::LabelNamesFiltered {
            pattern: capture(caps, 1),
        },
    },
    Rule {
        pattern: &LABEL_NAMES,
        build: |_| MatchedForm::LabelNamesAll,
    },
    Rule {
        pattern: &LABEL_VALUES,
        build: |caps| MatchedForm::LabelValues {
            label: capture(caps, 2),
            metric: caps.get(1).map(|m| m.as_str().to_string()),
        },
    },
    Rule {
        pattern: &METRIC_NAMES,
        build: |caps| MatchedForm::MetricNames {
            pattern: capture(caps, 1),
        },
    },
    Rule {
        pattern: &QUERY_RESULT,
        build: |caps| MatchedForm::QueryResult {
            query: capture(caps, 1),
        },
    },
];

/// Classify a (already interpolated) variable query
///
/// Returns `None` when the query is one of the bare reserved forms
/// (`label_values()`, `metrics()`, `query_result()`), which resolve to an
/// empty list.
pub fn classify(query: &str) -> Option<MatchedForm> {
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(query) {
            return Some((rule.build)(&caps));
        }
    }

    if RESERVED_EMPTY_FORMS.contains(&query) {
        return None;
    }

    Some(MatchedForm::FreeformSeriesSelector {
        query: query.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_values(label: &str, metric: Option<&str>) -> Option<MatchedForm> {
        Some(MatchedForm::LabelValues {
            label: label.to_string(),
            metric: metric.map(str::to_string),
        })
    }

    #[test]
    fn test_reserved_bare_forms_do_not_match() {
        assert_eq!(classify("label_values()"), None);
        assert_eq!(classify("metrics()"), None);
        assert_eq!(classify("query_result()"), None);
    }

    #[test]
    fn test_label_names_bare_and_filtered() {
        assert_eq!(classify("label_names()"), Some(MatchedForm::LabelNamesAll));
        assert_eq!(classify("label_names()  "), Some(MatchedForm::LabelNamesAll));
        assert_eq!(
            classify("label_names(node_)"),
            Some(MatchedForm::LabelNamesFiltered {
                pattern: "node_".to_string()
            })
        );
    }

    #[test]
    fn test_name_selector() {
        assert_eq!(
            MatchedForm::name_selector("node_"),
            r#"{__name__=~".*node_.*"}"#
        );
    }

    #[test]
    fn test_label_values() {
        assert_eq!(classify("label_values(up)"), label_values("up", None));
        assert_eq!(
            classify("label_values(my_metric, job)"),
            label_values("job", Some("my_metric"))
        );
        assert_eq!(
            classify("label_values(my_metric,job)"),
            label_values("job", Some("my_metric"))
        );
    }

    #[test]
    fn test_label_values_with_selector_metric() {
        assert_eq!(
            classify(r#"label_values(up{job="node", env=~"prod|stage"}, instance)"#),
            label_values("instance", Some(r#"up{job="node", env=~"prod|stage"}"#))
        );
    }

    #[test]
    fn test_label_values_invalid_label_falls_through() {
        // Not an identifier, so the label_values rule does not apply and the
        // text is treated as a series selector.
        assert_eq!(
            classify("label_values(up, 1job)"),
            Some(MatchedForm::FreeformSeriesSelector {
                query: "label_values(up, 1job)".to_string()
            })
        );
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(
            classify("metrics(foo.*)"),
            Some(MatchedForm::MetricNames {
                pattern: "foo.*".to_string()
            })
        );
    }

    #[test]
    fn test_query_result() {
        assert_eq!(
            classify("query_result(sum by (job) (up))"),
            Some(MatchedForm::QueryResult {
                query: "sum by (job) (up)".to_string()
            })
        );
    }

    #[test]
    fn test_freeform_selector() {
        assert_eq!(
            classify(r#"up{job="node"}"#),
            Some(MatchedForm::FreeformSeriesSelector {
                query: r#"up{job="node"}"#.to_string()
            })
        );
    }

    #[test]
    fn test_reserved_forms_with_whitespace_are_freeform() {
        // Only the exact reserved text is suppressed.
        assert_eq!(
            classify("metrics() "),
            Some(MatchedForm::FreeformSeriesSelector {
                query: "metrics() ".to_string()
            })
        );
    }

    #[test]
    fn test_display() {
        let form = classify("label_values(up, job)").unwrap();
        assert_eq!(form.to_string(), r#"values of label "job" on "up""#);
    }
}
