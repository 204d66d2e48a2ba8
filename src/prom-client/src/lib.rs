mod client;
mod error;
mod metadata;

pub use client::{ClientOptions, PrometheusClient};
pub use error::ClientError;
pub use metadata::distinct_label_names;

use resolver::{BackendFlavor, LabelValuesStrategy};

impl PrometheusClient {
    /// Ask the backend for its version and pick the label values strategy
    ///
    /// A backend without build info (or one that fails to answer) gets the
    /// series fallback, which every version supports.
    pub async fn detect_label_values_strategy(&self, flavor: BackendFlavor) -> LabelValuesStrategy {
        match self.build_info().await {
            Ok(info) => {
                let strategy = flavor.label_values_strategy(Some(&info.version));
                tracing::info!(
                    "Detected {flavor} {} at {}, using {strategy:?}",
                    info.version,
                    self.base_url()
                );
                strategy
            }
            Err(e) => {
                tracing::warn!("Could not read build info from {}: {e}", self.base_url());
                LabelValuesStrategy::SeriesFallback
            }
        }
    }
}
