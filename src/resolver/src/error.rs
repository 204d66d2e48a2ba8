/// Error reported by a [`MetadataSource`](crate::MetadataSource) implementation
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can end a resolution
///
/// A query that matches no supported form is not an error; it resolves to an
/// empty list.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The backend could not be reached or answered with a failure
    #[error(transparent)]
    Transport(SourceError),
    /// The instant query reported a result type that cannot be listed
    #[error("Unknown query result type: {0}")]
    UnsupportedResultType(String),
    /// The payload did not have the shape the endpoint documents
    #[error("Unexpected {endpoint} payload: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The `metrics()` filter is not a valid regular expression
    #[error("Invalid metric filter pattern: {0}")]
    InvalidFilterPattern(#[from] regex::Error),
}

impl ResolveError {
    pub(crate) fn decode(endpoint: &'static str, source: serde_json::Error) -> Self {
        ResolveError::Decode { endpoint, source }
    }
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
