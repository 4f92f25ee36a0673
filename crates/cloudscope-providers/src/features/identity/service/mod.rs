use std::sync::Arc;

use async_trait::async_trait;
use cloudscope_core::{Authenticator, CoreError, Credentials, IdentityDescriptor, Result};
use tracing::info;
use uuid::Uuid;

use crate::features::element_registry::repo::ElementRegistry;

/// Resolves identities to temporary credentials by assuming an IAM role
/// through STS.
///
/// Element identities are first looked up in the element registry to find
/// the role attached to the element. Cross-account identities carry the role
/// directly.
pub struct StsAuthenticator {
    sts: aws_sdk_sts::Client,
    registry: Arc<dyn ElementRegistry>,
    default_region: String,
}

/// The role a request resolves to before the STS call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoleTarget {
    role_arn: String,
    external_id: Option<String>,
    region: String,
}

impl StsAuthenticator {
    pub fn new(
        sts: aws_sdk_sts::Client,
        registry: Arc<dyn ElementRegistry>,
        default_region: impl Into<String>,
    ) -> Self {
        Self {
            sts,
            registry,
            default_region: default_region.into(),
        }
    }

    /// Resolves which role to assume and in which region.
    ///
    /// Region precedence for element identities: the registry record, then
    /// the request, then the service default.
    async fn resolve_target(&self, identity: &IdentityDescriptor) -> Result<RoleTarget> {
        match identity {
            IdentityDescriptor::Element {
                element_id,
                element_api_url,
                region,
            } => {
                let record = self
                    .registry
                    .lookup(element_id, element_api_url.as_deref())
                    .await?;
                let role_arn = record.cross_account_role_arn.ok_or_else(|| {
                    CoreError::Authentication(format!(
                        "element {element_id} has no cross-account role"
                    ))
                })?;
                let region = record
                    .region
                    .or_else(|| region.clone())
                    .unwrap_or_else(|| self.default_region.clone());
                Ok(RoleTarget {
                    role_arn,
                    external_id: record.external_id,
                    region,
                })
            }
            IdentityDescriptor::CrossAccount {
                role_arn,
                external_id,
                region,
            } => Ok(RoleTarget {
                role_arn: role_arn.clone(),
                external_id: external_id.clone(),
                region: region
                    .clone()
                    .unwrap_or_else(|| self.default_region.clone()),
            }),
        }
    }

    async fn assume(&self, target: RoleTarget) -> Result<Credentials> {
        let session_name = format!("cloudscope-{}", Uuid::new_v4());
        let mut request = self
            .sts
            .assume_role()
            .role_arn(&target.role_arn)
            .role_session_name(&session_name);
        if let Some(external_id) = &target.external_id {
            request = request.external_id(external_id);
        }

        let output = request
            .send()
            .await
            .map_err(|e| CoreError::Authentication(e.to_string()))?;
        let granted = output.credentials().ok_or_else(|| {
            CoreError::Authentication("assume-role response returned no credentials".to_string())
        })?;

        let expiration = chrono::DateTime::from_timestamp(granted.expiration().secs(), 0);
        Ok(Credentials::new(
            granted.access_key_id(),
            granted.secret_access_key(),
            Some(granted.session_token().to_string()),
            target.region,
            target.role_arn,
            expiration,
        ))
    }
}

#[async_trait]
impl Authenticator for StsAuthenticator {
    async fn authenticate(&self, identity: &IdentityDescriptor) -> Result<Credentials> {
        let target = self.resolve_target(identity).await?;
        info!(identity = %identity, role_arn = %target.role_arn, region = %target.region, "assuming role");
        self.assume(target).await
    }
}
