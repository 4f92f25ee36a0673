use prometheus::{
    opts, CounterVec, Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder,
};

pub struct ObservabilityRepository {
    registry: Registry,
    api_request_total: CounterVec,
    api_request_latency_seconds: HistogramVec,
    credential_cache_lookups_total: CounterVec,
    client_cache_lookups_total: CounterVec,
    upstream_fetch_latency_seconds: HistogramVec,
}

impl ObservabilityRepository {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();

        let api_request_total = CounterVec::new(
            opts!("cloudscope_api_request_total", "Panel API request total"),
            &["endpoint", "status"],
        )
        .map_err(|e| e.to_string())?;
        let api_request_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "cloudscope_api_request_latency_seconds",
                "Panel API request latency (seconds)",
            ),
            &["endpoint"],
        )
        .map_err(|e| e.to_string())?;
        let credential_cache_lookups_total = CounterVec::new(
            opts!(
                "cloudscope_credential_cache_lookups_total",
                "Credential cache lookups by outcome"
            ),
            &["outcome"],
        )
        .map_err(|e| e.to_string())?;
        let client_cache_lookups_total = CounterVec::new(
            opts!(
                "cloudscope_client_cache_lookups_total",
                "Service client cache lookups by kind and outcome"
            ),
            &["kind", "outcome"],
        )
        .map_err(|e| e.to_string())?;
        let upstream_fetch_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "cloudscope_upstream_fetch_latency_seconds",
                "Upstream telemetry fetch latency (seconds)",
            ),
            &["panel"],
        )
        .map_err(|e| e.to_string())?;

        registry
            .register(Box::new(api_request_total.clone()))
            .map_err(|e| e.to_string())?;
        registry
            .register(Box::new(api_request_latency_seconds.clone()))
            .map_err(|e| e.to_string())?;
        registry
            .register(Box::new(credential_cache_lookups_total.clone()))
            .map_err(|e| e.to_string())?;
        registry
            .register(Box::new(client_cache_lookups_total.clone()))
            .map_err(|e| e.to_string())?;
        registry
            .register(Box::new(upstream_fetch_latency_seconds.clone()))
            .map_err(|e| e.to_string())?;

        Ok(Self {
            registry,
            api_request_total,
            api_request_latency_seconds,
            credential_cache_lookups_total,
            client_cache_lookups_total,
            upstream_fetch_latency_seconds,
        })
    }

    pub fn observe_api_request(&self, endpoint: &str, status: &str, seconds: f64) {
        self.api_request_total
            .with_label_values(&[endpoint, status])
            .inc();
        self.api_request_latency_seconds
            .with_label_values(&[endpoint])
            .observe(seconds);
    }

    pub fn inc_credential_cache_lookup(&self, outcome: &str) {
        self.credential_cache_lookups_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn inc_client_cache_lookup(&self, kind: &str, outcome: &str) {
        self.client_cache_lookups_total
            .with_label_values(&[kind, outcome])
            .inc();
    }

    pub fn observe_upstream_fetch(&self, panel: &str, seconds: f64) {
        self.upstream_fetch_latency_seconds
            .with_label_values(&[panel])
            .observe(seconds);
    }

    pub fn render_metrics(&self) -> Result<String, String> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| e.to_string())?;
        String::from_utf8(buffer).map_err(|e| e.to_string())
    }
}
