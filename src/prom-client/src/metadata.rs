use async_trait::async_trait;
use prom_api::{BUILD_INFO_PATH, BuildInfo, LABEL_NAMES_PATH, LabelSet, METRIC_NAME_LABEL, SERIES_PATH};
use resolver::request::MATCH_PARAM;
use resolver::{
    LabelFilter, MetadataRequest, MetadataSource, ResultItem, SourceError, TimeWindow,
    filters_to_selector,
};
use serde_json::Value;

use crate::{ClientError, PrometheusClient};

impl PrometheusClient {
    /// GET /api/v1/status/buildinfo
    pub async fn build_info(&self) -> Result<BuildInfo, ClientError> {
        self.get(BUILD_INFO_PATH, &[]).await
    }

    /// GET /api/v1/labels
    pub async fn label_names(
        &self,
        selectors: &[String],
        window: TimeWindow,
    ) -> Result<Vec<String>, ClientError> {
        let mut params = window_params(window);
        params.extend(match_params(selectors));
        self.get(LABEL_NAMES_PATH, &params).await
    }

    /// GET /api/v1/series
    pub async fn series(
        &self,
        selectors: &[String],
        window: Option<TimeWindow>,
    ) -> Result<Vec<LabelSet>, ClientError> {
        let mut params = match_params(selectors);
        params.extend(window.map(window_params).unwrap_or_default());
        self.get(SERIES_PATH, &params).await
    }
}

fn window_params(window: TimeWindow) -> Vec<(String, String)> {
    window
        .params()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn match_params(selectors: &[String]) -> Vec<(String, String)> {
    selectors
        .iter()
        .map(|selector| (MATCH_PARAM.to_string(), selector.clone()))
        .collect()
}

/// Distinct label names across `series`, without `__name__` and without
/// `exclude`, in the order they are first seen
pub fn distinct_label_names(series: &[LabelSet], exclude: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in series.iter().flat_map(LabelSet::names) {
        if name == METRIC_NAME_LABEL
            || exclude.iter().any(|e| e == name)
            || names.iter().any(|n| n == name)
        {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

#[async_trait]
impl MetadataSource for PrometheusClient {
    async fn metadata_request(&self, request: &MetadataRequest) -> Result<Value, SourceError> {
        Ok(self.get(&request.path, &request.params).await?)
    }

    async fn series_labels(
        &self,
        selector: &str,
        extra_labels: &[String],
        window: TimeWindow,
    ) -> Result<Vec<String>, SourceError> {
        let series = self.series(&[selector.to_string()], Some(window)).await?;
        Ok(distinct_label_names(&series, extra_labels))
    }

    async fn tag_keys(
        &self,
        filters: &[LabelFilter],
        window: TimeWindow,
    ) -> Result<Vec<ResultItem>, SourceError> {
        let selectors = if filters.is_empty() {
            Vec::new()
        } else {
            vec![filters_to_selector(filters)]
        };
        let names = self.label_names(&selectors, window).await?;
        Ok(names.into_iter().map(ResultItem::new).collect())
    }

    fn original_metric_name(&self, labels: &LabelSet) -> String {
        labels.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_label_names() {
        let series = vec![
            LabelSet::new()
                .with_label("__name__", "up")
                .with_label("job", "node")
                .with_label("instance", "a"),
            LabelSet::new()
                .with_label("__name__", "up")
                .with_label("zone", "eu")
                .with_label("job", "api"),
        ];

        assert_eq!(
            distinct_label_names(&series, &[]),
            ["job", "instance", "zone"]
        );
        assert_eq!(
            distinct_label_names(&series, &["job".to_string()]),
            ["instance", "zone"]
        );
    }

    #[test]
    fn test_match_params() {
        let params = match_params(&["up".to_string(), "down".to_string()]);
        assert_eq!(
            params,
            [
                ("match[]".to_string(), "up".to_string()),
                ("match[]".to_string(), "down".to_string())
            ]
        );
    }
}
