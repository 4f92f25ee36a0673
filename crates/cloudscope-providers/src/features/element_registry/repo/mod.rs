use async_trait::async_trait;
use cloudscope_core::{CoreError, Result};
use serde::Deserialize;

/// What the configuration-management database knows about one element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cross_account_role_arn: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Looks up element records by id.
#[async_trait]
pub trait ElementRegistry: Send + Sync {
    async fn lookup(&self, element_id: &str, api_url: Option<&str>) -> Result<ElementRecord>;
}

/// Registry backed by the element API over HTTP. A per-request `api_url`
/// overrides the configured default.
pub struct HttpElementRegistry {
    http: reqwest::Client,
    default_api_url: Option<String>,
}

impl HttpElementRegistry {
    pub fn new(default_api_url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            CoreError::Authentication(format!("failed to build element registry client: {e}"))
        })?;
        Ok(Self {
            http,
            default_api_url,
        })
    }
}

#[async_trait]
impl ElementRegistry for HttpElementRegistry {
    async fn lookup(&self, element_id: &str, api_url: Option<&str>) -> Result<ElementRecord> {
        let base = api_url
            .or(self.default_api_url.as_deref())
            .ok_or_else(|| {
                CoreError::Authentication("no element registry url configured".to_string())
            })?;

        let response = self
            .http
            .get(base)
            .query(&[("elementId", element_id)])
            .send()
            .await
            .map_err(|e| {
                CoreError::Authentication(format!("element registry request failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(CoreError::Authentication(format!(
                "element registry returned status {} for element {element_id}",
                response.status()
            )));
        }

        response.json::<ElementRecord>().await.map_err(|e| {
            CoreError::Authentication(format!("element registry response unreadable: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_with_optional_fields_missing() {
        let record: ElementRecord =
            serde_json::from_str(r#"{"id": "elem-42"}"#).unwrap();
        assert_eq!(record.id, "elem-42");
        assert!(record.cross_account_role_arn.is_none());
        assert!(record.region.is_none());
    }

    #[test]
    fn test_record_parses_full_payload() {
        let payload = r#"{
            "id": "elem-42",
            "accountId": "123456789012",
            "region": "eu-west-1",
            "crossAccountRoleArn": "arn:aws:iam::123456789012:role/reader",
            "externalId": "tenant-7"
        }"#;

        let record: ElementRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.account_id.as_deref(), Some("123456789012"));
        assert_eq!(record.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            record.cross_account_role_arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/reader")
        );
        assert_eq!(record.external_id.as_deref(), Some("tenant-7"));
    }

    #[tokio::test]
    async fn test_lookup_without_any_url_fails() {
        let registry = HttpElementRegistry::new(None).unwrap();
        let err = registry.lookup("elem-42", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Authentication(_)));
        assert!(err.to_string().contains("no element registry url"));
    }
}
