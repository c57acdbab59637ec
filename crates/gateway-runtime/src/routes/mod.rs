//! # HTTP routes
//!
//! One module per surface: the hot
//! redirect/preview path (C8) and the JSON management API (C4/C6/C9 CRUD).

pub mod ab_tests;
pub mod click_statistics;
pub mod domains;
pub mod redirect;
pub mod short_links;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let management = Router::new()
        .route(
            "/api/v1/short_links",
            get(short_links::list).post(short_links::create),
        )
        .route("/api/v1/short_links/batch", post(short_links::batch_create))
        .route(
            "/api/v1/short_links/:id",
            get(short_links::get_one)
                .put(short_links::update)
                .delete(short_links::delete),
        )
        .route(
            "/api/v1/short_links/:id/statistics",
            get(short_links::statistics),
        )
        .route(
            "/api/v1/domains",
            get(domains::list).post(domains::create),
        )
        .route(
            "/api/v1/domains/:id",
            get(domains::get_one).put(domains::update).delete(domains::delete),
        )
        .route(
            "/api/v1/ab_tests",
            get(ab_tests::list).post(ab_tests::create),
        )
        .route(
            "/api/v1/ab_tests/:id",
            get(ab_tests::get_one).put(ab_tests::update).delete(ab_tests::delete),
        )
        .route("/api/v1/ab_tests/:id/variants", post(ab_tests::create_variant))
        .route("/api/v1/ab_tests/:id/start", post(ab_tests::start))
        .route("/api/v1/ab_tests/:id/pause", post(ab_tests::pause))
        .route("/api/v1/ab_tests/:id/stop", post(ab_tests::stop))
        .route("/api/v1/ab_tests/:id/statistics", get(ab_tests::statistics))
        .route(
            "/api/v1/click_statistics",
            get(click_statistics::list),
        )
        .route(
            "/api/v1/click_statistics/analysis",
            get(click_statistics::analysis),
        )
        .route(
            "/api/v1/ab_test_click_statistics/analysis",
            get(click_statistics::ab_test_analysis),
        );

    Router::new()
        .route("/preview/:code", get(redirect::preview))
        .route("/:code", get(redirect::redirect))
        .merge(management)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
