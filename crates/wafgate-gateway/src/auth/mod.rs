//! Token authentication for the `/api` surface.

pub mod allowlist;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::error::ApiError;

pub use allowlist::TokenAllowlist;

/// Rejects with 401 before any handler (and so any dispatch) runs.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.tokens().verify(req.headers())?;
    Ok(next.run(req).await)
}
