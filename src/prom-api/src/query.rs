//! Instant query response payloads (GET /api/v1/query)

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LabelSet;

/// `data` member of an instant query response
///
/// `result` is kept undecoded until the caller has decided how to treat the
/// reported `resultType`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    pub result_type: ResultType,
    #[serde(default)]
    pub result: Value,
}

/// Value of the `resultType` field
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ResultType {
    Scalar,
    String,
    Vector,
    Matrix,
    /// Anything this crate does not know about, kept verbatim
    Other(String),
}

impl From<String> for ResultType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "scalar" => ResultType::Scalar,
            "string" => ResultType::String,
            "vector" => ResultType::Vector,
            "matrix" => ResultType::Matrix,
            _ => ResultType::Other(value),
        }
    }
}

impl From<ResultType> for String {
    fn from(value: ResultType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Scalar => f.write_str("scalar"),
            ResultType::String => f.write_str("string"),
            ResultType::Vector => f.write_str("vector"),
            ResultType::Matrix => f.write_str("matrix"),
            ResultType::Other(other) => f.write_str(other),
        }
    }
}

/// A `[<unix seconds>, "<value>"]` tuple
///
/// Either element may be missing in degenerate responses; a missing value
/// reads as the empty string.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "Vec<Value>")]
pub struct SamplePair {
    pub timestamp: Option<f64>,
    pub value: Option<String>,
}

impl SamplePair {
    pub fn new(timestamp: f64, value: &str) -> Self {
        Self {
            timestamp: Some(timestamp),
            value: Some(value.to_string()),
        }
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Timestamp in milliseconds, as rendered in query result text
    pub fn timestamp_millis(&self) -> Option<f64> {
        self.timestamp.map(|ts| ts * 1000.0)
    }
}

impl TryFrom<Vec<Value>> for SamplePair {
    type Error = String;

    fn try_from(items: Vec<Value>) -> Result<Self, Self::Error> {
        let timestamp = match items.first() {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => Some(
                s.parse::<f64>()
                    .map_err(|e| format!("invalid sample timestamp {s:?}: {e}"))?,
            ),
            Some(other) => return Err(format!("invalid sample timestamp {other}")),
        };

        let value = match items.get(1) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Ok(SamplePair { timestamp, value })
    }
}

/// One element of a `vector` result
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VectorSample {
    #[serde(default)]
    pub metric: LabelSet,
    #[serde(default)]
    pub value: SamplePair,
}
