use crate::features::observability::repo::ObservabilityRepository;
use std::sync::Arc;

pub struct ObservabilityService {
    repo: Arc<ObservabilityRepository>,
}

impl ObservabilityService {
    pub fn new(repo: Arc<ObservabilityRepository>) -> Self {
        Self { repo }
    }

    pub fn record_api_request(&self, endpoint: &str, status: &str, seconds: f64) {
        self.repo.observe_api_request(endpoint, status, seconds);
    }

    pub fn record_credential_cache_lookup(&self, hit: bool) {
        let outcome = if hit { "hit" } else { "miss" };
        self.repo.inc_credential_cache_lookup(outcome);
    }

    pub fn record_client_cache_lookup(&self, kind: &str, hit: bool) {
        let outcome = if hit { "hit" } else { "miss" };
        self.repo.inc_client_cache_lookup(kind, outcome);
    }

    pub fn record_upstream_fetch(&self, panel: &str, seconds: f64) {
        self.repo.observe_upstream_fetch(panel, seconds);
    }

    pub fn render_metrics(&self) -> Result<String, String> {
        self.repo.render_metrics()
    }
}
