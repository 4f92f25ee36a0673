pub mod features;

pub use features::clients::service::AwsClientFactory;
pub use features::element_registry::repo::{ElementRecord, ElementRegistry, HttpElementRegistry};
pub use features::identity::service::StsAuthenticator;
pub use features::metrics::service::panel_sources;
