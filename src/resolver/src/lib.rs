//! Template variable query resolution for Prometheus-compatible backends
//!
//! Dashboard variables are populated from short meta queries. This crate
//! classifies such a query, issues the metadata request it stands for and
//! turns the response into a flat list of options.
//!
//! # Flow
//!
//! ```text
//! query + range → interpolate → classify → request → MetadataSource → decode → Vec<ResultItem>
//! ```
//!
//! # Supported forms
//!
//! | Query                             | Request                                   |
//! |-----------------------------------|-------------------------------------------|
//! | `label_names()`                   | tag keys capability                       |
//! | `label_names(<match>)`            | series labels for `{__name__=~".*<match>.*"}` |
//! | `label_values(<label>)`           | `/api/v1/label/<label>/values`            |
//! | `label_values(<metric>, <label>)` | label values with `match[]`, or `/api/v1/series` |
//! | `metrics(<regex>)`                | `/api/v1/label/__name__/values`, filtered |
//! | `query_result(<query>)`           | `/api/v1/query`                           |
//! | anything else                     | `/api/v1/series?match[]=<query>`          |
//!
//! # Example
//!
//! ```ignore
//! use resolver::{LabelValuesStrategy, Resolver, TimeRange};
//!
//! let resolver = Resolver::new(client, LabelValuesStrategy::MatchApi);
//! let items = resolver.resolve("label_values(up, job)", range).await?;
//! ```

pub mod capability;
pub mod classify;
pub mod decode;
pub mod error;
pub mod interpolate;
pub mod request;
mod resolver;
pub mod source;
pub mod time;
pub mod types;

pub use capability::{BackendFlavor, LabelValuesStrategy};
pub use classify::{MatchedForm, classify};
pub use error::{ResolveError, SourceError};
pub use interpolate::VariableContext;
pub use resolver::Resolver;
pub use source::MetadataSource;
pub use time::{TimeRange, TimeWindow, normalize};
pub use types::{LabelFilter, MatcherOp, MetadataRequest, ResultItem, filters_to_selector};
