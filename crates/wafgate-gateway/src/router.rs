//! Axum router wiring.
//!
//! `/api/*` sits behind the token middleware; `/healthz` is open.

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, auth};

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/challenge/enable/:group", post(api::enable_challenge))
        .route("/api/challenge/disable/:group", post(api::disable_challenge))
        .route("/api/policy/enable/:group", post(api::enable_policy))
        .route("/api/policy/disable/:group", post(api::disable_policy))
        .route("/api/status/:group", get(api::status))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .merge(api)
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
