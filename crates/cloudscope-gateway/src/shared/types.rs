use chrono::{DateTime, Utc};
use cloudscope_core::{IdentityDescriptor, MetricQuery, ResponseShape};
use serde::Deserialize;

use crate::shared::error::{GatewayError, GatewayResult};

/// Raw query parameters accepted by every panel endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelParams {
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub element_api_url: Option<String>,
    #[serde(default)]
    pub cmdb_api_url: Option<String>,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub cross_account_role_arn: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub log_group_name: Option<String>,
}

/// A validated panel request: who to act as, what to fetch, how to shape it
#[derive(Debug, Clone)]
pub struct PanelRequest {
    pub identity: IdentityDescriptor,
    pub query: MetricQuery,
    pub shape: ResponseShape,
}

impl PanelParams {
    /// Validates the raw parameters into a request, rejecting anything
    /// malformed before credentials are touched.
    pub fn into_request(self) -> GatewayResult<PanelRequest> {
        let zone = non_empty(self.zone);
        let element_id = non_empty(self.element_id);
        let role_arn = non_empty(self.cross_account_role_arn);
        // elementApiUrl is the current parameter name, cmdbApiUrl the legacy one.
        let element_api_url = non_empty(self.element_api_url).or(non_empty(self.cmdb_api_url));

        let identity = if let Some(element_id) = element_id {
            IdentityDescriptor::element(element_id, element_api_url, zone)
        } else if let Some(role_arn) = role_arn {
            IdentityDescriptor::cross_account(role_arn, non_empty(self.external_id), zone)
        } else {
            return Err(GatewayError::InvalidParameter(
                "either elementId or crossAccountRoleArn must be provided".to_string(),
            ));
        };

        let start_time = parse_time("startTime", non_empty(self.start_time))?;
        let end_time = parse_time("endTime", non_empty(self.end_time))?;
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if start >= end {
                return Err(GatewayError::InvalidParameter(
                    "startTime must be before endTime".to_string(),
                ));
            }
        }

        let query = MetricQuery {
            instance_id: non_empty(self.instance_id),
            element_type: non_empty(self.element_type),
            log_group_name: non_empty(self.log_group_name),
            start_time,
            end_time,
        };
        let shape = ResponseShape::from_param(self.response_type.as_deref());

        Ok(PanelRequest {
            identity,
            query,
            shape,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_time(name: &str, value: Option<String>) -> GatewayResult<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                GatewayError::InvalidParameter(format!(
                    "{name} is not a valid RFC 3339 timestamp: {e}"
                ))
            }),
    }
}
