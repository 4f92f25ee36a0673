use std::sync::Arc;

use cloudscope_core::{
    Authenticator, CacheOutcome, CredentialKey, Credentials, IdentityDescriptor, KeyedCache,
    Result,
};
use tracing::{debug, info};

use crate::features::observability::controller::ObservabilityController;

/// Resolves identities to credentials through a keyed cache.
///
/// Lookup and population happen under one cache lock, so concurrent requests
/// for the same identity authenticate at most once. Failed authentications
/// leave no entry behind.
pub struct CredentialService {
    authenticator: Arc<dyn Authenticator>,
    cache: KeyedCache<CredentialKey, Credentials>,
    observability: Arc<ObservabilityController>,
}

impl CredentialService {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        observability: Arc<ObservabilityController>,
    ) -> Self {
        Self {
            authenticator,
            cache: KeyedCache::new(),
            observability,
        }
    }

    pub async fn resolve(&self, identity: &IdentityDescriptor) -> Result<Credentials> {
        let key = identity.credential_key();
        let (credentials, outcome) = self
            .cache
            .get_or_try_insert_with(key, || async {
                info!(identity = %identity, "credentials not cached, authenticating");
                self.authenticator.authenticate(identity).await
            })
            .await?;

        if outcome == CacheOutcome::Hit {
            debug!(identity = %identity, "credentials found in cache");
        }
        self.observability
            .record_credential_cache_lookup(outcome == CacheOutcome::Hit);

        Ok(credentials)
    }

    pub async fn cached_count(&self) -> usize {
        self.cache.len().await
    }
}
