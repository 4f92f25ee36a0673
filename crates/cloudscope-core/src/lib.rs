pub mod cache;
pub mod client;
pub mod contract;
pub mod identity;
pub mod metric;
pub mod panel;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("client construction failed: {0}")]
    ClientConstruction(String),
    #[error("metric fetch failed: {0}")]
    MetricFetch(String),
    #[error("no data points returned")]
    NoData,
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

pub use cache::{CacheOutcome, KeyedCache};
pub use client::ServiceClient;
pub use contract::{Authenticator, ClientFactory, MetricSource};
pub use identity::{CredentialKey, Credentials, IdentityDescriptor};
pub use metric::{DataPoint, MetricPayload, MetricQuery, MetricSeries, ResponseShape};
pub use panel::{PanelKind, ServiceKind};
