use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ChartError;

impl ChartError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChartError::Configuration(_)
            | ChartError::UpstreamProtocol(_)
            | ChartError::DataInsufficient(_) => StatusCode::BAD_REQUEST,
            ChartError::NotFound(_) => StatusCode::NOT_FOUND,
            ChartError::Transport(_)
            | ChartError::UpstreamUnavailable(_)
            | ChartError::Render(_)
            | ChartError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            json!({ "error": "unexpected error", "message": self.to_string() })
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
            json!({ "error": self.to_string() })
        };

        (status, Json(body)).into_response()
    }
}
