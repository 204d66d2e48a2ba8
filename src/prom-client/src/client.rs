use std::time::Duration;

use prom_api::ApiResponse;
use serde::de::DeserializeOwned;

use crate::ClientError;

/// Connection settings for [`PrometheusClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
    /// Sent as `Authorization: Bearer <token>` when set
    pub bearer_token: Option<String>,
}

/// HTTP client for the Prometheus query API
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    base_url: String,
    http: reqwest::Client,
}

impl PrometheusClient {
    /// Create a new client pointing at the given base URL
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &options.bearer_token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::new_with_client(base_url, builder.build()?))
    }

    /// Create a client from a preconfigured `reqwest::Client`
    pub fn new_with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET request and return the envelope's `data` member
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!("GET {url} with {} parameters", params.len());
        let resp = self.http.get(&url).query(params).send().await?;
        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;

    if status.is_success() {
        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        for warning in &envelope.warnings {
            tracing::warn!("Backend warning: {warning}");
        }
        if !envelope.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.error_message(),
            });
        }
        envelope.data.ok_or_else(|| ClientError::Api {
            status: status.as_u16(),
            message: "response has no data".to_string(),
        })
    } else {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            .map(|e| e.error_message())
            .unwrap_or(text);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
