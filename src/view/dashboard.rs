// src/view/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    state::{query_state::QueryState, session::DashboardSession},
    view::{
        filters::FiltersBar,
        pagination::PaginationView,
        panel::TablePanel,
        stats::{stat_cards, StatCard},
        table::SalesTable,
    },
};

/// Tudo que a tela precisa para se redesenhar depois de uma intenção.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub session_id: Uuid,
    pub title: String,
    pub state: QueryState,
    pub has_active_filters: bool,
    pub loading: bool,
    pub filters_bar: FiltersBar,
    pub stats: Vec<StatCard>,
    pub panel: TablePanel,
    /// Oculta quando há erro ou nenhuma linha.
    pub pagination: Option<PaginationView>,
}

impl DashboardView {
    pub fn build(session: &DashboardSession) -> Self {
        let state = &session.query;
        let has_active_filters = state.filters.has_active_filters();

        let pagination = if session.error.is_none() && !session.rows.is_empty() {
            PaginationView::build(&state.pagination)
        } else {
            None
        };

        DashboardView {
            session_id: session.id,
            title: "Sales Management System".into(),
            state: state.clone(),
            has_active_filters,
            loading: session.loading,
            filters_bar: FiltersBar::build(&state.filters, &state.sort, &session.filter_options),
            stats: stat_cards(&session.summary, state.pagination.total_records),
            panel: TablePanel::select(
                session.error.as_deref(),
                session.loading,
                has_active_filters,
                SalesTable::build(&session.rows),
            ),
            pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::AppError;
    use crate::db::memory_source::fixtures::record;
    use crate::models::sales::{FilterPatch, SalesPage};
    use crate::state::query_state::{QueryIntent, SortPolicy};

    #[test]
    fn loaded_session_shows_table_and_pagination() {
        let mut session = DashboardSession::new(10, SortPolicy::default());
        let ticket = session.initial_plan().rows.unwrap();
        session.complete_fetch(
            &ticket,
            Ok(SalesPage { rows: vec![record(1, "A"), record(2, "B")], total_matching: 12 }),
        );

        let view = DashboardView::build(&session);
        assert!(matches!(view.panel, TablePanel::Table(_)));
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(view.stats[1].sub_value.as_deref(), Some("(12 SRs)"));
    }

    #[test]
    fn failed_fetch_hides_pagination_and_offers_retry() {
        let mut session = DashboardSession::new(10, SortPolicy::default());
        let ticket = session.initial_plan().rows.unwrap();
        session.complete_fetch(&ticket, Err(AppError::SourceUnavailable("down".into())));

        let view = DashboardView::build(&session);
        assert_eq!(view.pagination, None);
        assert!(matches!(view.panel, TablePanel::Error { .. }));
    }

    #[test]
    fn filtered_empty_result_offers_clear() {
        let mut session = DashboardSession::new(10, SortPolicy::default());
        session.initial_plan();
        let ticket = session
            .dispatch(QueryIntent::UpdateFilters(FilterPatch {
                search: Some("nobody".into()),
                ..Default::default()
            }))
            .rows
            .unwrap();
        session.complete_fetch(&ticket, Ok(SalesPage::default()));

        let view = DashboardView::build(&session);
        assert!(view.has_active_filters);
        assert_eq!(view.panel, TablePanel::empty(true));
        assert_eq!(view.pagination, None);
    }
}
