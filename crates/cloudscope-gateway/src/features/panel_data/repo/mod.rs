use std::collections::HashMap;
use std::sync::Arc;

use cloudscope_core::{MetricSource, PanelKind};

/// Maps each panel to the upstream source that can serve it.
pub struct SourceRegistry {
    sources: HashMap<PanelKind, Arc<dyn MetricSource>>,
}

impl SourceRegistry {
    pub fn with_sources(sources: HashMap<PanelKind, Arc<dyn MetricSource>>) -> Self {
        Self { sources }
    }

    pub fn source(&self, kind: PanelKind) -> Option<Arc<dyn MetricSource>> {
        self.sources.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cloudscope_core::{
        Credentials, MetricPayload, MetricQuery, MetricSeries, Result, ServiceClient,
    };

    struct StaticSource;

    #[async_trait]
    impl MetricSource for StaticSource {
        async fn fetch(
            &self,
            _client: &ServiceClient,
            _credentials: &Credentials,
            _query: &MetricQuery,
        ) -> Result<MetricPayload> {
            Ok(MetricPayload::Series(vec![MetricSeries {
                label: "static".to_string(),
                points: Vec::new(),
            }]))
        }
    }

    #[test]
    fn test_registered_panel_is_found() {
        let mut sources: HashMap<PanelKind, Arc<dyn MetricSource>> = HashMap::new();
        sources.insert(PanelKind::Ec2CpuUtilization, Arc::new(StaticSource));
        let registry = SourceRegistry::with_sources(sources);

        assert!(registry.source(PanelKind::Ec2CpuUtilization).is_some());
        assert!(registry.source(PanelKind::LambdaInvocations).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = SourceRegistry::with_sources(HashMap::new());
        assert!(registry.is_empty());
        assert!(registry.source(PanelKind::RdsNetworkReceiveThroughput).is_none());
    }
}
