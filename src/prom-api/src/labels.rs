//! Label sets as returned by the series and query endpoints.
//!
//! Prometheus serializes a label set as a JSON object. The order of that
//! object is meaningful for display purposes, so [`LabelSet`] keeps the
//! entries in the order the backend wrote them instead of sorting them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::METRIC_NAME_LABEL;

/// Ordered set of label name/value pairs identifying a series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<(String, String)>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, replacing the value in place when the name already exists
    pub fn with_label(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        match self.labels.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.labels.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `__name__` label, if present
    pub fn metric_name(&self) -> Option<&str> {
        self.get(METRIC_NAME_LABEL)
    }

    /// A copy of this set without the label `name`; `self` is left untouched
    pub fn without(&self, name: &str) -> LabelSet {
        LabelSet {
            labels: self
                .labels
                .iter()
                .filter(|(n, _)| n != name)
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Render the labels as `k="v",k="v"` without surrounding braces
    pub fn matcher_list(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Canonical display name: `name{k="v",...}` with `__name__` pulled out
    /// to the front. Braces are always written, even for an empty set.
    pub fn display_name(&self) -> String {
        let name = self.metric_name().unwrap_or_default();
        let rest = self.without(METRIC_NAME_LABEL);
        format!("{name}{{{}}}", rest.matcher_list())
    }
}

impl Serialize for LabelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (name, value) in &self.labels {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelSetVisitor;

        impl<'de> Visitor<'de> for LabelSetVisitor {
            type Value = LabelSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of label names to string values")
            }

            fn visit_map<M>(self, mut access: M) -> Result<LabelSet, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut set = LabelSet {
                    labels: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    set.insert(&name, &value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(LabelSetVisitor)
    }
}
