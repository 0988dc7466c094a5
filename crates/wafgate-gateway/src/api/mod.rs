//! `/api` handlers.
//!
//! Each handler resolves the group and returns `{"results": [...]}` with 200
//! once the group is known, however many units failed underneath.

use axum::{
    extract::{Path, State},
    Json,
};

use wafgate_core::report::DispatchReport;

use crate::app_state::AppState;
use crate::dispatch::SwitchKind;
use crate::error::ApiError;

async fn switch(
    state: &AppState,
    group: &str,
    enable: bool,
    kind: SwitchKind,
) -> Result<Json<DispatchReport>, ApiError> {
    let results = state.dispatcher().apply(group, enable, kind).await?;
    Ok(Json(DispatchReport { results }))
}

pub async fn enable_challenge(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<DispatchReport>, ApiError> {
    switch(&state, &group, true, SwitchKind::Challenge).await
}

pub async fn disable_challenge(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<DispatchReport>, ApiError> {
    switch(&state, &group, false, SwitchKind::Challenge).await
}

pub async fn enable_policy(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<DispatchReport>, ApiError> {
    switch(&state, &group, true, SwitchKind::Policy).await
}

pub async fn disable_policy(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<DispatchReport>, ApiError> {
    switch(&state, &group, false, SwitchKind::Policy).await
}

pub async fn status(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<DispatchReport>, ApiError> {
    let results = state.dispatcher().status(&group).await?;
    Ok(Json(DispatchReport { results }))
}
