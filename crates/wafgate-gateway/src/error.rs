//! HTTP mapping of `WafGateError` (non-dispatch failures only).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use wafgate_core::error::WafGateError;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub WafGateError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WafGateError::AuthFailed => StatusCode::UNAUTHORIZED,
            WafGateError::NotFound(_) => StatusCode::NOT_FOUND,
            WafGateError::BadRequest(_) | WafGateError::Config(_) => StatusCode::BAD_REQUEST,
            WafGateError::Vendor { .. } | WafGateError::Transport(_) => StatusCode::BAD_GATEWAY,
            WafGateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
