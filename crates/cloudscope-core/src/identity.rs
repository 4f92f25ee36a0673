use std::fmt;

use chrono::{DateTime, Utc};

/// How a request identifies the principal whose telemetry is being read.
///
/// Exactly one of the two paths applies to any request: a registered element
/// id resolved through the element registry, or a cross-account role assumed
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityDescriptor {
    Element {
        element_id: String,
        element_api_url: Option<String>,
        region: Option<String>,
    },
    CrossAccount {
        role_arn: String,
        external_id: Option<String>,
        region: Option<String>,
    },
}

impl IdentityDescriptor {
    pub fn element(
        element_id: impl Into<String>,
        element_api_url: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self::Element {
            element_id: element_id.into(),
            element_api_url,
            region,
        }
    }

    pub fn cross_account(
        role_arn: impl Into<String>,
        external_id: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self::CrossAccount {
            role_arn: role_arn.into(),
            external_id,
            region,
        }
    }

    /// Key under which credentials for this identity are cached.
    ///
    /// Element identities key on the element id alone. Cross-account
    /// identities key on the full (role, external id, region) triple so that
    /// different principals never share an entry.
    pub fn credential_key(&self) -> CredentialKey {
        match self {
            Self::Element { element_id, .. } => CredentialKey::Element(element_id.clone()),
            Self::CrossAccount {
                role_arn,
                external_id,
                region,
            } => CredentialKey::CrossAccount {
                role_arn: role_arn.clone(),
                external_id: external_id.clone().unwrap_or_default(),
                region: region.clone().unwrap_or_default(),
            },
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Element { region, .. } | Self::CrossAccount { region, .. } => region.as_deref(),
        }
    }
}

impl fmt::Display for IdentityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element { element_id, .. } => write!(f, "element:{element_id}"),
            Self::CrossAccount { role_arn, .. } => write!(f, "role:{role_arn}"),
        }
    }
}

/// Cache key derived from an [`IdentityDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    Element(String),
    CrossAccount {
        role_arn: String,
        external_id: String,
        region: String,
    },
}

/// Temporary cloud credentials resolved for one identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
    pub role_arn: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        region: impl Into<String>,
        role_arn: impl Into<String>,
        expiration: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            region: region.into(),
            role_arn: role_arn.into(),
            expiration,
        }
    }

    /// Stable identity of the resolved principal, used to key client caches.
    /// Falls back to the access key id when no role was assumed.
    pub fn role_key(&self) -> &str {
        if self.role_arn.is_empty() {
            &self.access_key_id
        } else {
            &self.role_arn
        }
    }
}

// Secrets stay out of logs and error chains.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("region", &self.region)
            .field("role_arn", &self.role_arn)
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_account(role: &str, external: Option<&str>, region: Option<&str>) -> IdentityDescriptor {
        IdentityDescriptor::cross_account(
            role,
            external.map(|s| s.to_string()),
            region.map(|s| s.to_string()),
        )
    }

    #[test]
    fn test_element_identity_keys_on_element_id() {
        let identity =
            IdentityDescriptor::element("e-42", Some("https://registry.example".to_string()), None);
        assert_eq!(
            identity.credential_key(),
            CredentialKey::Element("e-42".to_string())
        );
    }

    #[test]
    fn test_cross_account_identities_key_on_full_triple() {
        let a = cross_account("arn:aws:iam::1:role/reader", Some("ext-1"), Some("us-east-1"));
        let b = cross_account("arn:aws:iam::1:role/reader", Some("ext-2"), Some("us-east-1"));
        let c = cross_account("arn:aws:iam::1:role/reader", Some("ext-1"), Some("eu-west-1"));

        assert_ne!(a.credential_key(), b.credential_key());
        assert_ne!(a.credential_key(), c.credential_key());
        assert_eq!(a.credential_key(), a.credential_key());
    }

    #[test]
    fn test_cross_account_key_distinct_from_element_key() {
        let element = IdentityDescriptor::element("shared", None, None);
        let role = cross_account("shared", None, None);
        assert_ne!(element.credential_key(), role.credential_key());
    }

    #[test]
    fn test_role_key_prefers_role_arn() {
        let credentials = Credentials::new(
            "AKIA123",
            "secret",
            None,
            "us-east-1",
            "arn:aws:iam::1:role/reader",
            None,
        );
        assert_eq!(credentials.role_key(), "arn:aws:iam::1:role/reader");
    }

    #[test]
    fn test_role_key_falls_back_to_access_key() {
        let credentials = Credentials::new("AKIA123", "secret", None, "us-east-1", "", None);
        assert_eq!(credentials.role_key(), "AKIA123");
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let credentials = Credentials::new(
            "AKIA123",
            "super-secret",
            Some("session-token".to_string()),
            "us-east-1",
            "arn:aws:iam::1:role/reader",
            None,
        );
        let printed = format!("{credentials:?}");
        assert!(!printed.contains("super-secret"));
        assert!(!printed.contains("session-token"));
        assert!(printed.contains("AKIA123"));
    }

    #[test]
    fn test_display_never_exposes_external_id() {
        let identity = cross_account("arn:aws:iam::1:role/reader", Some("ext-secret"), None);
        assert_eq!(identity.to_string(), "role:arn:aws:iam::1:role/reader");
    }
}
