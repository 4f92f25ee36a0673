use std::sync::Arc;
use std::time::Instant;

use cloudscope_core::PanelKind;

use crate::features::client_resolution::service::ClientService;
use crate::features::credential_resolution::service::CredentialService;
use crate::features::observability::controller::ObservabilityController;
use crate::features::panel_data::service::PanelService;
use crate::shared::error::GatewayResult;
use crate::shared::types::PanelParams;

/// Orchestrates one panel request: validate, resolve credentials, resolve a
/// client, fetch, shape.
pub struct PanelController {
    credentials: CredentialService,
    clients: ClientService,
    panels: PanelService,
    observability: Arc<ObservabilityController>,
}

impl PanelController {
    pub fn new(
        credentials: CredentialService,
        clients: ClientService,
        panels: PanelService,
        observability: Arc<ObservabilityController>,
    ) -> Self {
        Self {
            credentials,
            clients,
            panels,
            observability,
        }
    }

    pub async fn panel_data(&self, kind: PanelKind, params: PanelParams) -> GatewayResult<String> {
        let request = params.into_request()?;

        let credentials = self.credentials.resolve(&request.identity).await?;
        let client = self
            .clients
            .resolve(&credentials, kind.service_kind())
            .await?;

        let started = Instant::now();
        let fetched = self
            .panels
            .fetch(kind, &client, &credentials, &request.query)
            .await;
        self.observability
            .record_upstream_fetch(kind.as_str(), started.elapsed().as_secs_f64());
        let payload = fetched?;

        let body = self.panels.shape(payload, request.shape)?;
        Ok(body)
    }
}
