// src/lib.rs

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod view;

use crate::config::AppState;

/// Todas as rotas da API, já com o estado aplicado.
pub fn router(app_state: AppState) -> Router {
    let sales_routes = Router::new()
        .route("/", get(handlers::sales::list_sales))
        .route("/filter-options", get(handlers::sales::get_filter_options))
        .route("/summary", get(handlers::sales::get_summary))
        .route("/page-window", get(handlers::sales::get_page_window));

    let session_routes = Router::new()
        .route("/", post(handlers::sessions::create_session))
        .route(
            "/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::close_session),
        )
        .route("/{id}/intents", post(handlers::sessions::apply_intent))
        .route(
            "/{id}/filter-options/refresh",
            post(handlers::sessions::refresh_filter_options),
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/openapi.json", get(|| async { Json(docs::ApiDoc::openapi()) }))
        .nest("/api/sales", sales_routes)
        .nest("/api/sessions", session_routes)
        .with_state(app_state)
}
