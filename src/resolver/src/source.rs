use async_trait::async_trait;
use prom_api::LabelSet;
use serde_json::Value;

use crate::error::SourceError;
use crate::time::TimeWindow;
use crate::types::{LabelFilter, MetadataRequest, ResultItem};

/// Backend access the resolver depends on
///
/// Implementations own transport concerns (connection handling, auth,
/// retries); the resolver only builds requests and decodes payloads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Issue a GET and return the `data` member of a successful response
    async fn metadata_request(&self, request: &MetadataRequest) -> Result<Value, SourceError>;

    /// Distinct label names seen on series matching `selector` within
    /// `window`, leaving out `extra_labels`
    async fn series_labels(
        &self,
        selector: &str,
        extra_labels: &[String],
        window: TimeWindow,
    ) -> Result<Vec<String>, SourceError>;

    /// Label names known to the backend, optionally restricted by `filters`
    async fn tag_keys(
        &self,
        filters: &[LabelFilter],
        window: TimeWindow,
    ) -> Result<Vec<ResultItem>, SourceError>;

    /// Display name for a series returned by the series endpoint
    fn original_metric_name(&self, labels: &LabelSet) -> String;
}
