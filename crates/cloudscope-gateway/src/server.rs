use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use cloudscope_core::PanelKind;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::features::observability::controller::ObservabilityController;
use crate::features::panel_data::controller::PanelController;
use crate::shared::types::PanelParams;

/// Everything a request handler needs, threaded through axum state.
pub struct AppContext {
    pub panels: PanelController,
    pub observability: Arc<ObservabilityController>,
}

/// Builds the gateway router: one GET route per panel plus health and
/// metrics endpoints.
pub fn router(ctx: Arc<AppContext>, request_timeout: Duration) -> Router {
    let mut router: Router<Arc<AppContext>> = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(render_metrics));

    for kind in PanelKind::ALL {
        router = router.route(
            kind.route(),
            get(move |state: State<Arc<AppContext>>, query: Query<PanelParams>| {
                panel_entry(kind, state, query)
            }),
        );
    }

    router
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}

async fn panel_entry(
    kind: PanelKind,
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<PanelParams>,
) -> Response {
    let started = Instant::now();

    let response = match ctx.panels.panel_data(kind, params).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            warn!(panel = %kind, error = %err, "panel request failed");
            err.into_response()
        }
    };

    ctx.observability.record_api_request(
        kind.route(),
        response.status().as_str(),
        started.elapsed().as_secs_f64(),
    );
    response
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn render_metrics(State(ctx): State<Arc<AppContext>>) -> Response {
    match ctx.observability.render_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
