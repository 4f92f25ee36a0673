use std::sync::Arc;

use cloudscope_core::metric::{passthrough_document, series_from_document};
use cloudscope_core::{
    CoreError, Credentials, MetricPayload, MetricQuery, PanelKind, ResponseShape, Result,
    ServiceClient,
};

use crate::features::panel_data::repo::SourceRegistry;

/// Fetches panel payloads and serializes them into the requested shape.
pub struct PanelService {
    registry: Arc<SourceRegistry>,
}

impl PanelService {
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatches to the panel's source. An empty payload is an error here:
    /// the handler must never turn it into an empty 200 body.
    pub async fn fetch(
        &self,
        kind: PanelKind,
        client: &ServiceClient,
        credentials: &Credentials,
        query: &MetricQuery,
    ) -> Result<MetricPayload> {
        let source = self.registry.source(kind).ok_or_else(|| {
            CoreError::MetricFetch(format!("no metric source registered for panel {kind}"))
        })?;

        let payload = source.fetch(client, credentials, query).await?;
        if payload.is_empty() {
            return Err(CoreError::NoData);
        }
        Ok(payload)
    }

    /// Serializes a payload into the response body for the requested shape.
    ///
    /// Frame responses are normalized series arrays regardless of what the
    /// source produced. Passthrough responses keep the source's own envelope,
    /// re-encoded so malformed upstream documents never reach the caller.
    pub fn shape(&self, payload: MetricPayload, shape: ResponseShape) -> Result<String> {
        match shape {
            ResponseShape::Frame => {
                let series = match payload {
                    MetricPayload::Series(series) => series,
                    MetricPayload::Document(document) => series_from_document(&document)?,
                };
                serde_json::to_string(&series).map_err(|e| CoreError::Encoding(e.to_string()))
            }
            ResponseShape::Passthrough => match payload {
                MetricPayload::Series(series) => {
                    serde_json::to_string(&passthrough_document(&series))
                        .map_err(|e| CoreError::Encoding(e.to_string()))
                }
                MetricPayload::Document(document) => {
                    let value: serde_json::Value =
                        serde_json::from_str(&document).map_err(|e| {
                            CoreError::Encoding(format!(
                                "upstream document is not valid JSON: {e}"
                            ))
                        })?;
                    serde_json::to_string(&value).map_err(|e| CoreError::Encoding(e.to_string()))
                }
            },
        }
    }
}
