//! # Hot redirect/preview path (C8)
//!
//! `GET /{code}` resolves against the `Host` header and emits a 302/404/
//! 410/403; `GET /preview/{code}` returns the same
//! resolution as JSON with no click emitted and no A/B selection, per
//! §4.8 step 6.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use sl_resolution::{ResolutionError, ResolutionRequest};

use crate::state::AppState;
use crate::util;

pub async fn redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(host) = util::host_header(&headers) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let request = ResolutionRequest {
        host,
        short_code: code,
        client_ip: Some(util::client_ip(&headers, peer)),
        user_agent: util::user_agent(&headers),
        referer: util::referer(&headers),
        raw_query_string: uri.query().unwrap_or("").to_string(),
    };

    match state.resolution.resolve(request, Utc::now()) {
        Ok(destination) => Redirect::found(&destination).into_response(),
        Err(err) => redirect_error_status(&err).into_response(),
    }
}

fn redirect_error_status(err: &ResolutionError) -> StatusCode {
    match err {
        ResolutionError::NotFound => StatusCode::NOT_FOUND,
        ResolutionError::Expired => StatusCode::GONE,
        ResolutionError::Disabled => StatusCode::FORBIDDEN,
        ResolutionError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub short_code: String,
    pub domain: String,
    pub short_url: String,
    pub original_url: String,
}

pub async fn preview(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(host) = util::host_header(&headers) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let request = ResolutionRequest {
        host: host.clone(),
        short_code: code.clone(),
        // `None` marks a preview: no experiment lookup, no click.
        client_ip: None,
        user_agent: util::user_agent(&headers),
        referer: String::new(),
        raw_query_string: String::new(),
    };

    match state.resolution.resolve(request, Utc::now()) {
        Ok(original_url) => Json(PreviewResponse {
            short_url: format!("{host}/{code}"),
            short_code: code,
            domain: host,
            original_url,
        })
        .into_response(),
        Err(err) => redirect_error_status(&err).into_response(),
    }
}
