use serde::{Deserialize, Serialize};

pub mod labels;
pub mod query;

pub use labels::LabelSet;
pub use query::{QueryData, ResultType, SamplePair, VectorSample};

/// Label carrying the metric name of a series
pub const METRIC_NAME_LABEL: &str = "__name__";

pub const LABEL_NAMES_PATH: &str = "/api/v1/labels";
pub const SERIES_PATH: &str = "/api/v1/series";
pub const QUERY_PATH: &str = "/api/v1/query";
pub const BUILD_INFO_PATH: &str = "/api/v1/status/buildinfo";

/// Path of the label values listing for `label`
pub fn label_values_path(label: &str) -> String {
    format!("/api/v1/label/{label}/values")
}

/// Envelope wrapping every Prometheus HTTP API response
///
/// Example:
/// {
///   "status": "success",
///   "data": ["__name__", "instance", "job"]
/// }
///
/// See <https://prometheus.io/docs/prometheus/latest/querying/api/#format-overview>
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Human readable failure reason, preferring the backend's own message
    pub fn error_message(&self) -> String {
        match (&self.error_type, &self.error) {
            (Some(kind), Some(error)) => format!("{kind}: {error}"),
            (None, Some(error)) => error.clone(),
            (Some(kind), None) => kind.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Result of GET /api/v1/status/buildinfo
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub build_user: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub go_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope() {
        let json = r#"{"status":"error","errorType":"bad_data","error":"invalid parameter \"query\""}"#;
        let response: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();

        assert!(!response.is_success());
        assert!(response.data.is_none());
        assert_eq!(
            response.error_message(),
            "bad_data: invalid parameter \"query\""
        );
    }

    #[test]
    fn test_success_envelope_with_warnings() {
        let json = r#"{"status":"success","data":["up"],"warnings":["partial response"]}"#;
        let response: ApiResponse<Vec<String>> = serde_json::from_str(json).unwrap();

        assert!(response.is_success());
        assert_eq!(response.data, Some(vec!["up".to_string()]));
        assert_eq!(response.warnings, vec!["partial response".to_string()]);
    }

    #[test]
    fn test_series_envelope() {
        let json = r#"{"status":"success","data":[{"__name__":"up","job":"node"}]}"#;
        let response: ApiResponse<Vec<LabelSet>> = serde_json::from_str(json).unwrap();

        let data = response.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].display_name(), r#"up{job="node"}"#);
    }

    fn decode_envelope<T: serde::de::DeserializeOwned>(json: &str) -> ApiResponse<T> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_envelope_decodes_for_any_data_type() {
        let response: ApiResponse<Vec<LabelSet>> =
            decode_envelope(r#"{"status":"error","error":"timeout"}"#);

        assert!(response.data.is_none());
        assert_eq!(response.error_message(), "timeout");
    }

    #[test]
    fn test_build_info() {
        let json = r#"{"version":"2.45.0","revision":"8ef767e","branch":"HEAD","buildUser":"root@host","buildDate":"20230623-15:09:49","goVersion":"go1.20.5"}"#;
        let info: BuildInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.version, "2.45.0");
        assert_eq!(info.go_version, "go1.20.5");
    }

    #[test]
    fn test_label_values_path() {
        assert_eq!(label_values_path("job"), "/api/v1/label/job/values");
        assert_eq!(
            label_values_path(METRIC_NAME_LABEL),
            "/api/v1/label/__name__/values"
        );
    }
}
