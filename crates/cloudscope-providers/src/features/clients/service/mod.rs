use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use cloudscope_core::{
    ClientFactory, CoreError, Credentials, Result, ServiceClient, ServiceKind,
};
use tracing::debug;

/// Builds per-credential AWS service clients.
///
/// Each client is configured with exactly the credentials it was built for,
/// so clients cached under different role keys never share a session.
pub struct AwsClientFactory;

impl AwsClientFactory {
    pub fn new() -> Self {
        Self
    }

    fn provider(credentials: &Credentials) -> aws_credential_types::Credentials {
        aws_credential_types::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            credentials.session_token.clone(),
            None,
            "cloudscope",
        )
    }
}

impl Default for AwsClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn build_client(
        &self,
        credentials: &Credentials,
        kind: ServiceKind,
    ) -> Result<ServiceClient> {
        if credentials.region.is_empty() {
            return Err(CoreError::ClientConstruction(
                "credentials carry no region".to_string(),
            ));
        }
        let region = Region::new(credentials.region.clone());
        debug!(%kind, region = %credentials.region, "constructing service client");

        let client = match kind {
            ServiceKind::Metrics => {
                let config = aws_sdk_cloudwatch::config::Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(Self::provider(credentials))
                    .build();
                ServiceClient::new(aws_sdk_cloudwatch::Client::from_conf(config))
            }
            ServiceKind::LogMetrics => {
                let config = aws_sdk_cloudwatchlogs::config::Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(Self::provider(credentials))
                    .build();
                ServiceClient::new(aws_sdk_cloudwatchlogs::Client::from_conf(config))
            }
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(region: &str) -> Credentials {
        Credentials::new(
            "AKIATEST",
            "secret",
            Some("token".to_string()),
            region,
            "arn:aws:iam::1:role/r",
            None,
        )
    }

    #[tokio::test]
    async fn test_metrics_kind_builds_cloudwatch_client() {
        let factory = AwsClientFactory::new();

        let client = factory
            .build_client(&credentials("us-east-1"), ServiceKind::Metrics)
            .await
            .unwrap();

        assert!(client.downcast_ref::<aws_sdk_cloudwatch::Client>().is_some());
        assert!(client
            .downcast_ref::<aws_sdk_cloudwatchlogs::Client>()
            .is_none());
    }

    #[tokio::test]
    async fn test_log_metrics_kind_builds_logs_client() {
        let factory = AwsClientFactory::new();

        let client = factory
            .build_client(&credentials("eu-central-1"), ServiceKind::LogMetrics)
            .await
            .unwrap();

        assert!(client
            .downcast_ref::<aws_sdk_cloudwatchlogs::Client>()
            .is_some());
    }

    #[tokio::test]
    async fn test_missing_region_is_rejected() {
        let factory = AwsClientFactory::new();

        let err = factory
            .build_client(&credentials(""), ServiceKind::Metrics)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::ClientConstruction("credentials carry no region".to_string())
        );
    }
}
