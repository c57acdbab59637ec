//! # `/api/v1/click_statistics*` and `/api/v1/ab_test_click_statistics*`
//!
//! Read-only views over the non-experiment click log (C4) and the
//! experiment click analytics (C6).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use shared_types::{ApiEnvelope, ClickStatistic};
use sl_experiment_store::AnalyticsSummary;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub short_link_id: u64,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiEnvelope<Vec<ClickStatistic>>>, ApiError> {
    Ok(Json(ApiEnvelope::ok(
        state.click_store.list_for_short_link(query.short_link_id)?,
    )))
}

pub async fn analysis(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiEnvelope<ClickAnalysis>>, ApiError> {
    let clicks = state.click_store.list_for_short_link(query.short_link_id)?;
    let total_clicks = clicks.len() as u64;
    let unique_ips = clicks
        .iter()
        .map(|c| c.ip.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len() as u64;
    Ok(Json(ApiEnvelope::ok(ClickAnalysis {
        total_clicks,
        unique_ips,
    })))
}

#[derive(Debug, serde::Serialize)]
pub struct ClickAnalysis {
    pub total_clicks: u64,
    pub unique_ips: u64,
}

#[derive(Debug, Deserialize)]
pub struct ABTestAnalysisQuery {
    pub ab_test_id: u64,
}

pub async fn ab_test_analysis(
    State(state): State<AppState>,
    Query(query): Query<ABTestAnalysisQuery>,
) -> Result<Json<ApiEnvelope<AnalyticsSummary>>, ApiError> {
    Ok(Json(ApiEnvelope::ok(
        state.experiment_store.analytics_for_experiment(query.ab_test_id)?,
    )))
}
