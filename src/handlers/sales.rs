// src/handlers/sales.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::sales::{
        AgeRange, DateRange, FilterOptions, PaginationInfo, SalesFilters, SalesQuery, SalesRecord,
        SortConfig, SortDirection, SortField, SummaryStats, total_pages_for,
    },
    state::query_state::SortPolicy,
    view::{
        filters::{parse_bound, parse_date_bound},
        pagination::page_window,
    },
};

// ---
// Parâmetros: filtros via query string. Listas separadas por vírgula.
// ---
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct SalesQueryParams {
    /// Trecho do nome ou telefone do cliente.
    #[validate(length(max = 100, message = "The search term must have at most 100 characters."))]
    pub search: Option<String>,
    #[param(example = "North,East")]
    pub regions: Option<String>,
    pub genders: Option<String>,
    pub categories: Option<String>,
    pub tags: Option<String>,
    pub payment_methods: Option<String>,
    /// Vazio ou inválido = sem limite.
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    #[param(example = "2023-01-01")]
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[param(example = "date")]
    pub sort_by: Option<String>,
    #[param(example = "desc")]
    pub sort_dir: Option<String>,
    pub page: Option<i64>,
}

fn split_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn bound<T>(raw: &Option<String>, parse: fn(&str) -> Option<T>) -> Option<T> {
    raw.as_deref().and_then(parse)
}

impl SalesQueryParams {
    pub fn filters(&self) -> SalesFilters {
        SalesFilters {
            search: self.search.clone().unwrap_or_default(),
            customer_regions: split_list(&self.regions),
            genders: split_list(&self.genders),
            age_range: AgeRange {
                min: bound(&self.age_min, parse_bound),
                max: bound(&self.age_max, parse_bound),
            },
            product_categories: split_list(&self.categories),
            tags: split_list(&self.tags),
            payment_methods: split_list(&self.payment_methods),
            date_range: DateRange {
                start: bound(&self.date_from, parse_date_bound),
                end: bound(&self.date_to, parse_date_bound),
            },
        }
    }

    /// Campo desconhecido é erro; direção ausente segue a política do campo.
    pub fn sort(&self, policy: &SortPolicy) -> Result<SortConfig, AppError> {
        let Some(raw_field) = self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(SortConfig::default());
        };
        let field = SortField::parse(raw_field.trim())
            .ok_or_else(|| AppError::InvalidQuery(format!("Unknown sort field '{}'.", raw_field)))?;

        let direction = match self.sort_dir.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => SortDirection::parse(raw.trim())
                .ok_or_else(|| AppError::InvalidQuery(format!("Unknown sort direction '{}'.", raw)))?,
            None => policy.default_direction(field),
        };
        Ok(SortConfig { field, direction })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesListResponse {
    pub data: Vec<SalesRecord>,
    pub pagination: PaginationInfo,
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(SalesQueryParams),
    responses(
        (status = 200, description = "Página de vendas filtrada e ordenada", body = SalesListResponse),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 502, description = "Fonte de dados indisponível")
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let service = &app_state.sales_service;
    let query = SalesQuery {
        filters: params.filters(),
        sort: params.sort(service.sort_policy())?,
        page: params.page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32,
        limit: service.page_size(),
    };

    let page = service.fetch_page(&query).await?;
    let pagination = PaginationInfo {
        page: query.page,
        limit: query.limit,
        total_pages: total_pages_for(page.total_matching, query.limit),
        total_records: page.total_matching,
    };

    Ok((StatusCode::OK, Json(SalesListResponse { data: page.rows, pagination })))
}

// GET /api/sales/filter-options
#[utoipa::path(
    get,
    path = "/api/sales/filter-options",
    tag = "Sales",
    responses(
        (status = 200, description = "Valores distintos de cada filtro (base inteira)", body = FilterOptions)
    )
)]
pub async fn get_filter_options(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let options = app_state.sales_service.filter_options().await?;
    Ok((StatusCode::OK, Json(options)))
}

// GET /api/sales/summary
#[utoipa::path(
    get,
    path = "/api/sales/summary",
    tag = "Sales",
    params(SalesQueryParams),
    responses(
        (status = 200, description = "Totais sobre os registros filtrados, sem paginação", body = SummaryStats)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let stats = app_state.sales_service.summary(&params.filters()).await?;
    Ok((StatusCode::OK, Json(stats)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageWindowParams {
    pub page: u32,
    pub total_pages: u32,
}

// GET /api/sales/page-window
#[utoipa::path(
    get,
    path = "/api/sales/page-window",
    tag = "Sales",
    params(PageWindowParams),
    responses(
        (status = 200, description = "Botões de página: números e o marcador \"ellipsis\"")
    )
)]
pub async fn get_page_window(Query(params): Query<PageWindowParams>) -> impl IntoResponse {
    Json(page_window(params.page, params.total_pages))
}
