// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::state;
use crate::view;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::get_filter_options,
        handlers::sales::get_summary,
        handlers::sales::get_page_window,

        // --- Dashboard Sessions ---
        handlers::sessions::create_session,
        handlers::sessions::get_session,
        handlers::sessions::apply_intent,
        handlers::sessions::refresh_filter_options,
        handlers::sessions::close_session,
    ),
    components(
        schemas(
            // --- Sales ---
            models::sales::SalesRecord,
            models::sales::SalesFilters,
            models::sales::FilterPatch,
            models::sales::AgeRange,
            models::sales::DateRange,
            models::sales::SortField,
            models::sales::SortDirection,
            models::sales::SortConfig,
            models::sales::PaginationInfo,
            models::sales::FilterOptions,
            models::sales::SummaryStats,
            handlers::sales::SalesListResponse,

            // --- Sessões ---
            state::query_state::QueryIntent,
            state::query_state::QueryState,
            view::dashboard::DashboardView,
            view::filters::FiltersBar,
            view::filters::MultiSelectControl,
            view::filters::RangeControl,
            view::filters::SortControl,
            view::filters::SortOptionView,
            view::pagination::PaginationView,
            view::panel::TablePanel,
            view::stats::StatCard,
            view::table::SalesTable,
            view::table::TableRow,
        )
    ),
    tags(
        (name = "Sales", description = "Consulta de vendas: filtros, ordenação, paginação e totais"),
        (name = "Dashboard Sessions", description = "Estado do dashboard mantido no servidor, uma sessão por tela aberta")
    )
)]
pub struct ApiDoc;
