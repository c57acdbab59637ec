//! # `/api/v1/ab_tests*` — experiment CRUD (C6) and lifecycle (C7).

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared_types::{ABTest, ABTestStatus, ABTestVariant, ApiEnvelope, ErrorKind, TrafficSplit};
use sl_experiment_store::AnalyticsSummary;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateABTestBody {
    pub short_link_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub traffic_split: Option<TrafficSplit>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateABTestBody>,
) -> Result<Json<ApiEnvelope<ABTest>>, ApiError> {
    state
        .link_store
        .find_by_id(body.short_link_id)?
        .filter(|l| !l.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;

    let now = Utc::now();
    let experiment = state.experiment_store.create_experiment(ABTest {
        id: 0,
        short_link_id: body.short_link_id,
        name: body.name,
        description: body.description.unwrap_or_default(),
        status: ABTestStatus::Draft,
        traffic_split: body.traffic_split.unwrap_or(TrafficSplit::Equal),
        start_time: body.start_time,
        end_time: body.end_time,
        is_active: true,
        created_at: now,
        updated_at: now,
    })?;
    Ok(Json(ApiEnvelope::ok(experiment)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ApiEnvelope<Vec<ABTest>>>, ApiError> {
    Ok(Json(ApiEnvelope::ok(state.experiment_store.list_experiments()?)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<ABTest>>, ApiError> {
    let experiment = state
        .experiment_store
        .find_experiment_by_id(id)?
        .ok_or(sl_experiment_store::StoreError::NotFound)?;
    Ok(Json(ApiEnvelope::ok(experiment)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateABTestBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub traffic_split: Option<TrafficSplit>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<UpdateABTestBody>,
) -> Result<Json<ApiEnvelope<ABTest>>, ApiError> {
    let mut experiment = state
        .experiment_store
        .find_experiment_by_id(id)?
        .ok_or(sl_experiment_store::StoreError::NotFound)?;

    if let Some(name) = body.name {
        experiment.name = name;
    }
    if let Some(description) = body.description {
        experiment.description = description;
    }
    if let Some(traffic_split) = body.traffic_split {
        experiment.traffic_split = traffic_split;
    }
    if body.start_time.is_some() {
        experiment.start_time = body.start_time;
    }
    if body.end_time.is_some() {
        experiment.end_time = body.end_time;
    }
    if let Some(is_active) = body.is_active {
        experiment.is_active = is_active;
    }
    experiment.updated_at = Utc::now();

    Ok(Json(ApiEnvelope::ok(
        state.experiment_store.update_experiment(experiment)?,
    )))
}

/// Deletion is only legal while an experiment is in `draft`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<()>>, ApiError> {
    let experiment = state
        .experiment_store
        .find_experiment_by_id(id)?
        .ok_or(sl_experiment_store::StoreError::NotFound)?;
    if experiment.status != ABTestStatus::Draft {
        return Err(ApiError::new(
            ErrorKind::BadRequest,
            "an experiment can only be deleted while in draft",
        ));
    }
    state.experiment_store.delete_experiment(id)?;
    Ok(Json(ApiEnvelope::ok(())))
}

#[derive(Debug, Deserialize)]
pub struct CreateVariantBody {
    pub name: String,
    pub description: Option<String>,
    pub target_url: String,
    pub weight: u8,
    pub is_control: Option<bool>,
}

pub async fn create_variant(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<CreateVariantBody>,
) -> Result<Json<ApiEnvelope<ABTestVariant>>, ApiError> {
    let experiment = state
        .experiment_store
        .find_experiment_by_id(id)?
        .ok_or(sl_experiment_store::StoreError::NotFound)?;

    if !(1..=100).contains(&body.weight) {
        return Err(ApiError::new(ErrorKind::BadRequest, "weight must be in [1, 100]"));
    }

    let now = Utc::now();
    let variant = state.experiment_store.create_variant(ABTestVariant {
        id: 0,
        ab_test_id: experiment.id,
        name: body.name,
        description: body.description.unwrap_or_default(),
        target_url: body.target_url,
        weight: body.weight,
        is_control: body.is_control.unwrap_or(false),
        is_active: true,
        created_at: now,
        updated_at: now,
    })?;
    Ok(Json(ApiEnvelope::ok(variant)))
}

pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<ABTest>>, ApiError> {
    Ok(Json(ApiEnvelope::ok(
        state.experiment_engine.start_experiment(id, Utc::now())?,
    )))
}

pub async fn pause(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<ABTest>>, ApiError> {
    Ok(Json(ApiEnvelope::ok(
        state.experiment_engine.pause_experiment(id, Utc::now())?,
    )))
}

pub async fn stop(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<ABTest>>, ApiError> {
    Ok(Json(ApiEnvelope::ok(
        state.experiment_engine.stop_experiment(id, Utc::now())?,
    )))
}

/// `?days=` is accepted for parity with the `short_links` statistics
/// route but unused: `AnalyticsSummary` is computed over the full click
/// set, not a rolling window.
#[derive(Debug, Deserialize)]
pub struct ABTestStatsQuery {
    pub days: Option<u32>,
}

pub async fn statistics(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    axum::extract::Query(_query): axum::extract::Query<ABTestStatsQuery>,
) -> Result<Json<ApiEnvelope<AnalyticsSummary>>, ApiError> {
    state
        .experiment_store
        .find_experiment_by_id(id)?
        .ok_or(sl_experiment_store::StoreError::NotFound)?;
    Ok(Json(ApiEnvelope::ok(
        state.experiment_store.analytics_for_experiment(id)?,
    )))
}
