//! Turning backend payloads into [`ResultItem`]s
//!
//! Each function takes the `data` member of a successful response for one
//! endpoint.

use std::collections::HashSet;

use prom_api::{LabelSet, METRIC_NAME_LABEL, QueryData, ResultType, SamplePair, VectorSample};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ResolveError, Result};
use crate::types::ResultItem;

fn parse<T: DeserializeOwned>(endpoint: &'static str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| ResolveError::decode(endpoint, e))
}

/// Label names or label values listing, one terminal item per string
pub fn label_listing(data: Value) -> Result<Vec<ResultItem>> {
    let values: Vec<String> = parse("label values", data)?;
    Ok(values.into_iter().map(ResultItem::new).collect())
}

pub fn series_listing(data: Value) -> Result<Vec<LabelSet>> {
    parse("series", data)
}

/// Values of `label` across `series`
///
/// Series without the label and series where it is empty are skipped; an
/// empty value cannot be selected meaningfully in a picker. Duplicates are
/// dropped keeping the first occurrence.
pub fn series_label_values(series: &[LabelSet], label: &str) -> Vec<ResultItem> {
    let mut seen = HashSet::new();
    series
        .iter()
        .filter_map(|labels| labels.get(label))
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .map(ResultItem::expandable)
        .collect()
}

/// Metric names for which `filter` finds a match anywhere in the name
pub fn metric_names(data: Value, filter: &Regex) -> Result<Vec<ResultItem>> {
    let names: Vec<String> = parse("metric names", data)?;
    Ok(names
        .into_iter()
        .filter(|name| filter.is_match(name))
        .map(ResultItem::expandable)
        .collect())
}

/// Instant query result
///
/// `scalar` and `string` results become a single terminal item holding the
/// value; each `vector` sample becomes an expandable item rendered by
/// [`vector_sample_text`]. Any other result type is rejected.
pub fn query_result(data: Value) -> Result<Vec<ResultItem>> {
    let data: QueryData = parse("query", data)?;
    match data.result_type {
        ResultType::Scalar | ResultType::String => {
            let pair: SamplePair = parse("query", data.result)?;
            Ok(vec![ResultItem::new(pair.value_str())])
        }
        ResultType::Vector => {
            let samples: Vec<VectorSample> = parse("query", data.result)?;
            Ok(samples
                .iter()
                .map(|sample| ResultItem::expandable(vector_sample_text(sample)))
                .collect())
        }
        ResultType::Matrix | ResultType::Other(_) => Err(ResolveError::UnsupportedResultType(
            data.result_type.to_string(),
        )),
    }
}

/// `name{k="v",...} <value> <timestamp in ms>`
///
/// Labels keep backend order; `__name__` is moved to the front without
/// touching the sample's own label set.
pub fn vector_sample_text(sample: &VectorSample) -> String {
    let name = sample.metric.metric_name().unwrap_or_default();
    let labels = sample.metric.without(METRIC_NAME_LABEL);
    let timestamp = sample
        .value
        .timestamp_millis()
        .map(|ms| ms.to_string())
        .unwrap_or_default();
    format!(
        "{name}{{{}}} {} {timestamp}",
        labels.matcher_list(),
        sample.value.value_str()
    )
}
