//! # `/api/v1/short_links*` — management CRUD over C9/C4.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ApiEnvelope, ShortLink};
use sl_issuance::CreateLinkRequest;
use sl_link_store::ListFilter;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateShortLinkBody {
    pub original_url: String,
    pub domain: String,
    pub custom_code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
}

pub async fn create(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<CreateShortLinkBody>,
) -> Result<Json<ApiEnvelope<ShortLink>>, ApiError> {
    let link = state.issuance.create(CreateLinkRequest {
        original_url: body.original_url,
        host: body.domain,
        custom_code: body.custom_code,
        title: body.title,
        description: body.description,
        expire_at: body.expire_at,
        creator_ip: peer.ip().to_string(),
    })?;
    Ok(Json(ApiEnvelope::ok(link)))
}

#[derive(Debug, Deserialize)]
pub struct BatchCreateBody {
    pub urls: Vec<String>,
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct BatchCreateResponse {
    pub successes: Vec<ShortLink>,
    pub failures: Vec<sl_issuance::BatchFailure>,
}

pub async fn batch_create(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<BatchCreateBody>,
) -> Result<Json<ApiEnvelope<BatchCreateResponse>>, ApiError> {
    if body.urls.len() > sl_issuance::MAX_BATCH_SIZE {
        return Err(ApiError::new(
            shared_types::ErrorKind::BadRequest,
            format!("at most {} URLs per batch", sl_issuance::MAX_BATCH_SIZE),
        ));
    }
    let result = state
        .issuance
        .batch_create(body.urls, &body.domain, &peer.ip().to_string());
    Ok(Json(ApiEnvelope::ok(BatchCreateResponse {
        successes: result.successes,
        failures: result.failures,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub domain: Option<u64>,
    pub keyword: Option<String>,
}

const DEFAULT_PAGE_SIZE: u64 = 20;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiEnvelope<Vec<ShortLink>>>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let filter = ListFilter {
        offset: (page - 1) * page_size,
        limit: page_size,
        domain_filter: query.domain,
        keyword: query.keyword,
    };
    // `ShortLinkStore::list` leaves soft-deleted rows in its scan (see its
    // doc comment); filter them out here rather than in the store so a
    // single store implementation can serve both this listing and the
    // domain-deletion "still referenced" check in `routes::domains`.
    let links = state
        .link_store
        .list(&filter)?
        .into_iter()
        .filter(|l| !l.is_deleted())
        .collect();
    Ok(Json(ApiEnvelope::ok(links)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<ShortLink>>, ApiError> {
    let link = state
        .link_store
        .find_by_id(id)?
        .filter(|l| !l.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;
    Ok(Json(ApiEnvelope::ok(link)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateShortLinkBody {
    pub original_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<UpdateShortLinkBody>,
) -> Result<Json<ApiEnvelope<ShortLink>>, ApiError> {
    let mut link = state
        .link_store
        .find_by_id(id)?
        .filter(|l| !l.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;

    if let Some(original_url) = body.original_url {
        link.original_url = original_url;
    }
    if let Some(title) = body.title {
        link.title = title;
    }
    if let Some(description) = body.description {
        link.description = description;
    }
    if body.expire_at.is_some() {
        link.expire_at = body.expire_at;
    }
    if let Some(is_active) = body.is_active {
        link.is_active = is_active;
    }
    link.updated_at = Utc::now();

    let updated = state.link_store.update(link)?;
    // An update must be followed by a cache delete for the affected key
    // so stale reads don't outlive the TTL.
    let _ = state.cache.delete(&updated.host, &updated.short_code);
    Ok(Json(ApiEnvelope::ok(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<()>>, ApiError> {
    let link = state
        .link_store
        .find_by_id(id)?
        .filter(|l| !l.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;
    state.link_store.soft_delete(id)?;
    let _ = state.cache.delete(&link.host, &link.short_code);
    Ok(Json(ApiEnvelope::ok(())))
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ShortLinkStatistics {
    pub click_count: u64,
    pub recent_clicks: Vec<shared_types::ClickStatistic>,
}

pub async fn statistics(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<ApiEnvelope<ShortLinkStatistics>>, ApiError> {
    let days = query.days.unwrap_or(30).clamp(1, 365);
    let link = state
        .link_store
        .find_by_id(id)?
        .filter(|l| !l.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;

    let cutoff = Utc::now() - chrono::Duration::days(days as i64);
    let recent_clicks = state
        .click_store
        .list_for_short_link(id)?
        .into_iter()
        .filter(|c| c.click_at >= cutoff)
        .collect();

    Ok(Json(ApiEnvelope::ok(ShortLinkStatistics {
        click_count: link.click_count,
        recent_clicks,
    })))
}
