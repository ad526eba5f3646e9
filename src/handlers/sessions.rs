// src/handlers/sessions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    state::query_state::QueryIntent,
    view::dashboard::DashboardView,
};

// POST /api/sessions
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "Dashboard Sessions",
    responses(
        (status = 201, description = "Sessão criada com a primeira página carregada", body = DashboardView)
    )
)]
pub async fn create_session(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.sales_service.open_session().await;
    let view = DashboardView::build(&*session.lock().await);

    Ok((StatusCode::CREATED, Json(view)))
}

// GET /api/sessions/{id}
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "Dashboard Sessions",
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "Estado atual do dashboard", body = DashboardView),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.sales_service.sessions().get(id).await?;
    let view = DashboardView::build(&*session.lock().await);

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/sessions/{id}/intents
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/intents",
    tag = "Dashboard Sessions",
    request_body = QueryIntent,
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "Dashboard depois de aplicar a intenção", body = DashboardView),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn apply_intent(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(intent): Json<QueryIntent>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.sales_service;
    let session = service.sessions().get(id).await?;

    tracing::debug!(session = %id, ?intent, "Intenção recebida");
    service.run_intent(&session, intent).await;

    let view = DashboardView::build(&*session.lock().await);
    Ok((StatusCode::OK, Json(view)))
}

// POST /api/sessions/{id}/filter-options/refresh
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/filter-options/refresh",
    tag = "Dashboard Sessions",
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "Opções de filtro recarregadas", body = DashboardView),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn refresh_filter_options(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.sales_service;
    let session = service.sessions().get(id).await?;
    service.refresh_filter_options(&session).await;

    let view = DashboardView::build(&*session.lock().await);
    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/sessions/{id}
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "Dashboard Sessions",
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 204, description = "Sessão descartada"),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn close_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sales_service.sessions().remove(id).await?;
    tracing::info!(session = %id, "Sessão de dashboard encerrada");

    Ok(StatusCode::NO_CONTENT)
}
