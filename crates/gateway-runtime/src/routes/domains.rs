//! # `/api/v1/domains*` — domain registry CRUD.
//!
//! Not one of C1-C9 by name, but short links cannot be issued without an
//! owning domain; creation seeds the C3 counter (a brand-new domain's
//! counter starts at `default_start_number`, the same as a restart-time
//! reseed). Deletion rejects domains that still have non-deleted short
//! links rather than cascading an unchecked delete.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use rand::RngCore;
use serde::Deserialize;
use shared_types::{ApiEnvelope, Domain, ErrorKind, Protocol};
use sl_link_store::ListFilter;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDomainBody {
    pub host: String,
    pub protocol: Option<Protocol>,
    pub pass_query_params: Option<bool>,
    pub random_suffix_length: Option<u8>,
    pub enable_checksum: Option<bool>,
    pub enable_xor_obfuscation: Option<bool>,
    pub xor_rot: Option<u8>,
    pub default_start_number: Option<u64>,
    pub site_name: Option<String>,
    pub icp_number: Option<String>,
    pub police_number: Option<String>,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateDomainBody>,
) -> Result<Json<ApiEnvelope<Domain>>, ApiError> {
    if body.host.is_empty() {
        return Err(ApiError::new(ErrorKind::BadRequest, "host must not be empty"));
    }
    let random_suffix_length = body.random_suffix_length.unwrap_or(0).min(10);
    let xor_rot = body.xor_rot.unwrap_or(1).clamp(1, 63);
    let enable_xor_obfuscation = body.enable_xor_obfuscation.unwrap_or(false);
    // Obfuscation parameters are generated once at creation and must
    // never change afterward.
    let xor_secret = if enable_xor_obfuscation {
        rand::rngs::OsRng.next_u64()
    } else {
        0
    };

    let now = Utc::now();
    let domain = Domain {
        id: 0,
        host: body.host,
        protocol: body.protocol.unwrap_or(Protocol::Https),
        is_active: true,
        pass_query_params: body.pass_query_params.unwrap_or(false),
        random_suffix_length,
        enable_checksum: body.enable_checksum.unwrap_or(false),
        enable_xor_obfuscation,
        xor_secret,
        xor_rot,
        default_start_number: body.default_start_number.unwrap_or(0),
        site_name: body.site_name.unwrap_or_default(),
        icp_number: body.icp_number.unwrap_or_default(),
        police_number: body.police_number.unwrap_or_default(),
        description: body.description.unwrap_or_default(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    let created = state.domain_store.create(domain)?;
    state.issuer.initialize(created.id, created.default_start_number)?;
    Ok(Json(ApiEnvelope::ok(created)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ApiEnvelope<Vec<Domain>>>, ApiError> {
    let domains = state
        .domain_store
        .list()?
        .into_iter()
        .filter(|d| !d.is_deleted())
        .collect();
    Ok(Json(ApiEnvelope::ok(domains)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<Domain>>, ApiError> {
    let domain = state
        .domain_store
        .find_by_id(id)?
        .filter(|d| !d.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;
    Ok(Json(ApiEnvelope::ok(domain)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDomainBody {
    pub is_active: Option<bool>,
    pub pass_query_params: Option<bool>,
    pub site_name: Option<String>,
    pub icp_number: Option<String>,
    pub police_number: Option<String>,
    pub description: Option<String>,
}

/// Obfuscation parameters (`random_suffix_length`, `enable_checksum`,
/// `enable_xor_obfuscation`, `xor_secret`, `xor_rot`) are deliberately not
/// accepted here: they must stay immutable after
/// creation.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<UpdateDomainBody>,
) -> Result<Json<ApiEnvelope<Domain>>, ApiError> {
    let mut domain = state
        .domain_store
        .find_by_id(id)?
        .filter(|d| !d.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;

    if let Some(is_active) = body.is_active {
        domain.is_active = is_active;
    }
    if let Some(pass_query_params) = body.pass_query_params {
        domain.pass_query_params = pass_query_params;
    }
    if let Some(site_name) = body.site_name {
        domain.site_name = site_name;
    }
    if let Some(icp_number) = body.icp_number {
        domain.icp_number = icp_number;
    }
    if let Some(police_number) = body.police_number {
        domain.police_number = police_number;
    }
    if let Some(description) = body.description {
        domain.description = description;
    }
    domain.updated_at = Utc::now();

    let updated = state.domain_store.update(domain)?;
    Ok(Json(ApiEnvelope::ok(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiEnvelope<()>>, ApiError> {
    let domain = state
        .domain_store
        .find_by_id(id)?
        .filter(|d| !d.is_deleted())
        .ok_or(sl_link_store::StoreError::NotFound)?;

    let still_referenced = state
        .link_store
        .list(&ListFilter {
            offset: 0,
            limit: u64::MAX,
            domain_filter: Some(domain.id),
            keyword: None,
        })?
        .into_iter()
        .any(|l| !l.is_deleted());
    if still_referenced {
        return Err(ApiError::new(
            ErrorKind::Conflict,
            format!("domain {} still has short links", domain.host),
        ));
    }

    state.domain_store.soft_delete(id)?;
    Ok(Json(ApiEnvelope::ok(())))
}
