use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use cloudscope_gateway::features::client_resolution::service::ClientService;
use cloudscope_gateway::features::credential_resolution::service::CredentialService;
use cloudscope_gateway::features::observability::controller::ObservabilityController;
use cloudscope_gateway::features::panel_data::controller::PanelController;
use cloudscope_gateway::features::panel_data::repo::SourceRegistry;
use cloudscope_gateway::features::panel_data::service::PanelService;
use cloudscope_gateway::server::{router, AppContext};
use cloudscope_providers::{
    panel_sources, AwsClientFactory, HttpElementRegistry, StsAuthenticator,
};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cloudscope_gateway=info,info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = std::env::var("CLOUDSCOPE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse::<SocketAddr>()?;
    let request_timeout_secs = std::env::var("CLOUDSCOPE_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(30);
    let default_region =
        std::env::var("CLOUDSCOPE_DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    let element_api_url = std::env::var("CLOUDSCOPE_ELEMENT_API_URL").ok();
    let metric_period_secs = std::env::var("CLOUDSCOPE_METRIC_PERIOD_SECS")
        .ok()
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(300);

    info!(%addr, %default_region, "Starting Cloudscope Gateway");

    let observability = ObservabilityController::with_new_registry()?;

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(default_region.clone()))
        .load()
        .await;
    let sts = aws_sdk_sts::Client::new(&config);

    let registry = Arc::new(HttpElementRegistry::new(element_api_url)?);
    let authenticator = Arc::new(StsAuthenticator::new(sts, registry, default_region));
    let credentials = CredentialService::new(authenticator, observability.clone());

    let factory = Arc::new(AwsClientFactory::new());
    let clients = ClientService::new(factory, observability.clone());

    let sources = SourceRegistry::with_sources(panel_sources(metric_period_secs));
    let panels = PanelService::new(Arc::new(sources));

    let controller = PanelController::new(credentials, clients, panels, observability.clone());
    let ctx = Arc::new(AppContext {
        panels: controller,
        observability,
    });
    let app = router(ctx, Duration::from_secs(request_timeout_secs));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Cloudscope Gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}
