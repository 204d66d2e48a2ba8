use regex::Regex;
use tracing::{debug, instrument};

use crate::capability::LabelValuesStrategy;
use crate::classify::{MatchedForm, classify};
use crate::decode;
use crate::error::{ResolveError, Result};
use crate::interpolate::VariableContext;
use crate::request;
use crate::source::MetadataSource;
use crate::time::{TimeRange, TimeWindow};
use crate::types::{MetadataRequest, ResultItem};

/// Resolves variable queries against a [`MetadataSource`]
///
/// The resolver holds no per-query state, so one instance can serve any
/// number of concurrent resolutions.
pub struct Resolver<S> {
    source: S,
    strategy: LabelValuesStrategy,
}

impl<S: MetadataSource> Resolver<S> {
    pub fn new(source: S, strategy: LabelValuesStrategy) -> Self {
        Self { source, strategy }
    }

    pub fn strategy(&self) -> LabelValuesStrategy {
        self.strategy
    }

    /// Resolve `query` over `range` with only the built-in range variables
    pub async fn resolve(&self, query: &str, range: TimeRange) -> Result<Vec<ResultItem>> {
        self.resolve_with(query, range, &VariableContext::new())
            .await
    }

    /// Interpolate `query` with `vars` (plus the range built-ins), classify
    /// it and fetch the matching options
    ///
    /// Queries that match no form resolve to an empty list.
    #[instrument(skip(self, range, vars))]
    pub async fn resolve_with(
        &self,
        query: &str,
        range: TimeRange,
        vars: &VariableContext,
    ) -> Result<Vec<ResultItem>> {
        let interpolated = vars.clone().with_range(&range).interpolate(query);
        let Some(form) = classify(&interpolated) else {
            debug!("No query form matched, returning no options");
            return Ok(Vec::new());
        };
        debug!("Classified as {form}");

        let items = self.dispatch(form, range.window()).await?;
        debug!("Resolved {} options", items.len());
        Ok(items)
    }

    async fn dispatch(&self, form: MatchedForm, window: TimeWindow) -> Result<Vec<ResultItem>> {
        match form {
            MatchedForm::LabelNamesFiltered { pattern } => {
                self.label_names_filtered(&pattern, window).await
            }
            MatchedForm::LabelNamesAll => self.label_names_all(window).await,
            MatchedForm::LabelValues { label, metric } => {
                self.label_values(&label, metric.as_deref(), window).await
            }
            MatchedForm::MetricNames { pattern } => self.metric_names(&pattern, window).await,
            MatchedForm::QueryResult { query } => self.query_result(&query).await,
            MatchedForm::FreeformSeriesSelector { query } => self.series(&query, window).await,
        }
    }

    async fn label_names_filtered(
        &self,
        pattern: &str,
        window: TimeWindow,
    ) -> Result<Vec<ResultItem>> {
        let selector = MatchedForm::name_selector(pattern);
        debug!("Fetching label names for {selector}");
        let names = self
            .source
            .series_labels(&selector, &[], window)
            .await
            .map_err(ResolveError::Transport)?;
        Ok(names.into_iter().map(ResultItem::new).collect())
    }

    async fn label_names_all(&self, window: TimeWindow) -> Result<Vec<ResultItem>> {
        self.source
            .tag_keys(&[], window)
            .await
            .map_err(ResolveError::Transport)
    }

    async fn label_values(
        &self,
        label: &str,
        metric: Option<&str>,
        window: TimeWindow,
    ) -> Result<Vec<ResultItem>> {
        let request = request::label_values(label, metric, window, self.strategy);
        let data = self.fetch(&request).await?;

        if request::label_values_uses_series(metric, self.strategy) {
            let series = decode::series_listing(data)?;
            Ok(decode::series_label_values(&series, label))
        } else {
            decode::label_listing(data)
        }
    }

    /// The pattern uses `regex` syntax, which has no lookaround or
    /// backreferences; such patterns fail with
    /// [`ResolveError::InvalidFilterPattern`] instead of filtering.
    async fn metric_names(&self, pattern: &str, window: TimeWindow) -> Result<Vec<ResultItem>> {
        let filter = Regex::new(pattern)?;
        let data = self.fetch(&request::metric_names(window)).await?;
        decode::metric_names(data, &filter)
    }

    async fn query_result(&self, query: &str) -> Result<Vec<ResultItem>> {
        let data = self.fetch(&request::instant_query(query)).await?;
        decode::query_result(data)
    }

    async fn series(&self, selector: &str, window: TimeWindow) -> Result<Vec<ResultItem>> {
        let data = self.fetch(&request::series(selector, window)).await?;
        let series = decode::series_listing(data)?;
        Ok(series
            .iter()
            .map(|labels| ResultItem::expandable(self.source.original_metric_name(labels)))
            .collect())
    }

    async fn fetch(&self, request: &MetadataRequest) -> Result<serde_json::Value> {
        debug!(path = %request.path, "Issuing metadata request");
        self.source
            .metadata_request(request)
            .await
            .map_err(ResolveError::Transport)
    }
}
