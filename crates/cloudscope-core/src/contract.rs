use async_trait::async_trait;

use crate::client::ServiceClient;
use crate::identity::{Credentials, IdentityDescriptor};
use crate::metric::{MetricPayload, MetricQuery};
use crate::panel::ServiceKind;
use crate::Result;

/// Exchanges an identity for temporary vendor credentials.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, identity: &IdentityDescriptor) -> Result<Credentials>;
}

/// Builds a vendor service client scoped to one set of credentials.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn build_client(
        &self,
        credentials: &Credentials,
        kind: ServiceKind,
    ) -> Result<ServiceClient>;
}

/// Fetches one panel's data from an upstream telemetry service.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch(
        &self,
        client: &ServiceClient,
        credentials: &Credentials,
        query: &MetricQuery,
    ) -> Result<MetricPayload>;
}
