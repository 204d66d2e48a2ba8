//! Template variable substitution applied before classification

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::time::TimeRange;

static VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(\w+)|\$\{(\w+)\}|\[\[(\w+)\]\]").expect("variable pattern is valid")
});

/// Variables available to a query: caller supplied values plus the
/// `__range*` built-ins derived from the time range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableContext {
    vars: HashMap<String, String>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Add `__range_ms`, `__range_s` and `__range` for `range`
    ///
    /// Caller supplied variables of the same name take precedence.
    pub fn with_range(mut self, range: &TimeRange) -> Self {
        let millis = range.duration_millis();
        let seconds = (millis as f64 / 1000.0).round() as i64;
        for (name, value) in [
            ("__range_ms", millis.to_string()),
            ("__range_s", seconds.to_string()),
            ("__range", format!("{seconds}s")),
        ] {
            self.vars.entry(name.to_string()).or_insert(value);
        }
        self
    }

    /// Substitute `$name`, `${name}` and `[[name]]`; unknown names are left
    /// as written
    pub fn interpolate(&self, query: &str) -> String {
        VARIABLE
            .replace_all(query, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match self.get(name) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
