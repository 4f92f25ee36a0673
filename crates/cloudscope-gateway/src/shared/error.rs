use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use cloudscope_core::CoreError;
use thiserror::Error;

/// Gateway specific errors, one variant per failed request stage
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Client construction failed: {0}")]
    ClientConstructionFailed(String),
    #[error("Metric fetch failed: {0}")]
    MetricFetchFailed(String),
    #[error("Response encoding failed: {0}")]
    ResponseEncodingFailed(String),
}

impl GatewayError {
    /// Caller mistakes map to 400, every upstream or internal failure to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            GatewayError::AuthenticationFailed(_)
            | GatewayError::ClientConstructionFailed(_)
            | GatewayError::MetricFetchFailed(_)
            | GatewayError::ResponseEncodingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidParameter(msg) => GatewayError::InvalidParameter(msg),
            CoreError::Authentication(msg) => GatewayError::AuthenticationFailed(msg),
            CoreError::ClientConstruction(msg) => GatewayError::ClientConstructionFailed(msg),
            CoreError::MetricFetch(msg) => GatewayError::MetricFetchFailed(msg),
            CoreError::NoData => {
                GatewayError::MetricFetchFailed("no data points returned".to_string())
            }
            CoreError::Encoding(msg) => GatewayError::ResponseEncodingFailed(msg),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
