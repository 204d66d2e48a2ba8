//! Metadata requests for each query form

use prom_api::{METRIC_NAME_LABEL, QUERY_PATH, SERIES_PATH, label_values_path};

use crate::capability::LabelValuesStrategy;
use crate::time::TimeWindow;
use crate::types::MetadataRequest;

pub const MATCH_PARAM: &str = "match[]";

fn with_window(mut request: MetadataRequest, window: TimeWindow) -> MetadataRequest {
    for (name, value) in window.params() {
        request = request.param(name, value);
    }
    request
}

/// Request answering `label_values([metric,] label)`
///
/// The label values endpoint is used unless a metric restricts the lookup and
/// the backend cannot apply `match[]` there, in which case the series
/// endpoint is queried and values are collected from the returned label sets.
pub fn label_values(
    label: &str,
    metric: Option<&str>,
    window: TimeWindow,
    strategy: LabelValuesStrategy,
) -> MetadataRequest {
    match metric {
        None => with_window(MetadataRequest::new(label_values_path(label)), window),
        Some(metric) if strategy.supports_match() => with_window(
            MetadataRequest::new(label_values_path(label)),
            window,
        )
        .param(MATCH_PARAM, metric),
        Some(metric) => series(metric, window),
    }
}

/// Whether [`label_values`] answers through the series endpoint
pub fn label_values_uses_series(metric: Option<&str>, strategy: LabelValuesStrategy) -> bool {
    metric.is_some() && !strategy.supports_match()
}

pub fn metric_names(window: TimeWindow) -> MetadataRequest {
    with_window(
        MetadataRequest::new(label_values_path(METRIC_NAME_LABEL)),
        window,
    )
}

/// Instant query, evaluated by the backend at its current time
pub fn instant_query(query: &str) -> MetadataRequest {
    MetadataRequest::new(QUERY_PATH).param("query", query)
}

pub fn series(selector: &str, window: TimeWindow) -> MetadataRequest {
    with_window(
        MetadataRequest::new(SERIES_PATH).param(MATCH_PARAM, selector),
        window,
    )
}
