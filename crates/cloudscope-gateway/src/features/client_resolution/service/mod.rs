use std::sync::Arc;

use cloudscope_core::{
    CacheOutcome, ClientFactory, Credentials, KeyedCache, Result, ServiceClient, ServiceKind,
};
use tracing::{debug, info};

use crate::features::observability::controller::ObservabilityController;

/// Resolves credentials to service clients, one cache per service kind.
///
/// Clients are keyed by the credentials' role key, so two requests running
/// under the same assumed role share a client while different principals
/// never do. As with credentials, a failed construction stores nothing.
pub struct ClientService {
    factory: Arc<dyn ClientFactory>,
    metrics_clients: KeyedCache<String, ServiceClient>,
    log_clients: KeyedCache<String, ServiceClient>,
    observability: Arc<ObservabilityController>,
}

impl ClientService {
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        observability: Arc<ObservabilityController>,
    ) -> Self {
        Self {
            factory,
            metrics_clients: KeyedCache::new(),
            log_clients: KeyedCache::new(),
            observability,
        }
    }

    pub async fn resolve(
        &self,
        credentials: &Credentials,
        kind: ServiceKind,
    ) -> Result<ServiceClient> {
        let key = credentials.role_key().to_string();
        let (client, outcome) = self
            .cache_for(kind)
            .get_or_try_insert_with(key.clone(), || async {
                info!(%kind, role_key = %key, "building new service client");
                self.factory.build_client(credentials, kind).await
            })
            .await?;

        if outcome == CacheOutcome::Hit {
            debug!(%kind, role_key = %key, "service client found in cache");
        }
        self.observability
            .record_client_cache_lookup(kind.as_str(), outcome == CacheOutcome::Hit);

        Ok(client)
    }

    fn cache_for(&self, kind: ServiceKind) -> &KeyedCache<String, ServiceClient> {
        match kind {
            ServiceKind::Metrics => &self.metrics_clients,
            ServiceKind::LogMetrics => &self.log_clients,
        }
    }
}
