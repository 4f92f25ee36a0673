use crate::features::observability::repo::ObservabilityRepository;
use crate::features::observability::service::ObservabilityService;
use std::sync::Arc;

pub struct ObservabilityController {
    service: ObservabilityService,
}

impl ObservabilityController {
    pub fn new(service: ObservabilityService) -> Self {
        Self { service }
    }

    /// Builds the controller with a fresh registry. Each gateway process
    /// owns exactly one so tests can run isolated instances side by side.
    pub fn with_new_registry() -> Result<Arc<Self>, String> {
        let repo = Arc::new(ObservabilityRepository::new()?);
        Ok(Arc::new(Self::new(ObservabilityService::new(repo))))
    }

    pub fn record_api_request(&self, endpoint: &str, status: &str, seconds: f64) {
        self.service.record_api_request(endpoint, status, seconds);
    }

    pub fn record_credential_cache_lookup(&self, hit: bool) {
        self.service.record_credential_cache_lookup(hit);
    }

    pub fn record_client_cache_lookup(&self, kind: &str, hit: bool) {
        self.service.record_client_cache_lookup(kind, hit);
    }

    pub fn record_upstream_fetch(&self, panel: &str, seconds: f64) {
        self.service.record_upstream_fetch(panel, seconds);
    }

    pub fn render_metrics(&self) -> Result<String, String> {
        self.service.render_metrics()
    }
}
