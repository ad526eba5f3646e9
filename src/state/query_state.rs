// src/state/query_state.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::sales::{
    total_pages_for, FilterPatch, PaginationInfo, SalesFilters, SalesQuery, SortConfig,
    SortDirection, SortField,
};

/// Direção padrão ao escolher um campo de ordenação novo.
/// É política de UX, então fica configurável por campo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPolicy {
    defaults: HashMap<SortField, SortDirection>,
    fallback: SortDirection,
}

impl Default for SortPolicy {
    fn default() -> Self {
        // Nome em ordem alfabética; data, quantidade e valor do maior para o menor
        let mut defaults = HashMap::new();
        defaults.insert(SortField::CustomerName, SortDirection::Asc);
        Self { defaults, fallback: SortDirection::Desc }
    }
}

impl SortPolicy {
    pub fn with_default(mut self, field: SortField, direction: SortDirection) -> Self {
        self.defaults.insert(field, direction);
        self
    }

    pub fn default_direction(&self, field: SortField) -> SortDirection {
        self.defaults.get(&field).copied().unwrap_or(self.fallback)
    }
}

/// Intenções emitidas pela camada de apresentação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum QueryIntent {
    UpdateFilters(FilterPatch),
    ClearFilters,
    /// Clique numa opção do seletor: mesmo campo inverte, campo novo usa a política.
    SelectSort(SortField),
    SetSort(SortConfig),
    GoToPage(i64),
    Refetch,
}

/// O que mudou numa transição; decide quais buscas precisam ser refeitas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub filters_changed: bool,
    pub query_changed: bool,
    pub refetch: bool,
}

impl Transition {
    pub fn needs_fetch(&self) -> bool {
        self.query_changed || self.refetch
    }

    pub fn needs_summary(&self) -> bool {
        self.filters_changed || self.refetch
    }
}

/// Estado composto filtros × ordenação × paginação. Imutável: cada transição
/// devolve um novo valor com `version` incrementada.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    pub filters: SalesFilters,
    pub sort: SortConfig,
    pub pagination: PaginationInfo,
    pub version: u64,
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: SalesFilters::default(),
            sort: SortConfig::default(),
            pagination: PaginationInfo::new(page_size),
            version: 0,
        }
    }

    pub fn query(&self) -> SalesQuery {
        SalesQuery {
            filters: self.filters.clone(),
            sort: self.sort,
            page: self.pagination.page,
            limit: self.pagination.limit,
        }
    }

    pub fn reduce(&self, intent: QueryIntent, policy: &SortPolicy) -> (QueryState, Transition) {
        let mut next = self.clone();

        match intent {
            QueryIntent::UpdateFilters(patch) => {
                next.filters = self.filters.merge(patch);
                next.pagination.page = 1;
            }
            QueryIntent::ClearFilters => {
                next.filters = SalesFilters::default();
                next.pagination.page = 1;
            }
            QueryIntent::SelectSort(field) => {
                let direction = if field == self.sort.field {
                    self.sort.direction.flip()
                } else {
                    policy.default_direction(field)
                };
                next.sort = SortConfig { field, direction };
                next.pagination.page = 1;
            }
            QueryIntent::SetSort(sort) => {
                next.sort = sort;
                next.pagination.page = 1;
            }
            QueryIntent::GoToPage(page) => {
                next.pagination.page = clamp_page(page, self.pagination.total_pages);
            }
            QueryIntent::Refetch => {
                return (next, Transition { refetch: true, ..Default::default() });
            }
        }

        let transition = Transition {
            filters_changed: next.filters != self.filters,
            query_changed: next.filters != self.filters
                || next.sort != self.sort
                || next.pagination.page != self.pagination.page,
            refetch: false,
        };
        if transition.query_changed {
            next.version = self.version + 1;
        }
        (next, transition)
    }

    /// Aplica o total devolvido pela última busca e traz a página de volta para
    /// `[1, max(1, total_pages)]`. Retorna `true` quando a página mudou: a
    /// página buscada não existe mais e precisa ser buscada de novo.
    pub fn apply_fetch_totals(&mut self, total_records: u64) -> bool {
        self.pagination.total_records = total_records;
        self.pagination.total_pages = total_pages_for(total_records, self.pagination.limit);

        let page = clamp_page(i64::from(self.pagination.page), self.pagination.total_pages);
        if page == self.pagination.page {
            return false;
        }
        self.pagination.page = page;
        self.version += 1;
        true
    }
}

/// Limita `page` a `[1, max(1, total_pages)]`. Nunca rejeita.
pub fn clamp_page(page: i64, total_pages: u32) -> u32 {
    let upper = i64::from(total_pages.max(1));
    // cabe em u32: está entre 1 e total_pages
    page.clamp(1, upper) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sales::AgeRange;

    fn state_on_page(page: u32, total_pages: u32) -> QueryState {
        let mut state = QueryState::new(10);
        state.pagination.page = page;
        state.pagination.total_pages = total_pages;
        state.pagination.total_records = u64::from(total_pages) * 10;
        state
    }

    #[test]
    fn update_filters_always_returns_to_first_page() {
        let policy = SortPolicy::default();
        let patches = [
            FilterPatch { search: Some("ravi".into()), ..Default::default() },
            FilterPatch { genders: Some(vec![]), ..Default::default() },
            FilterPatch::default(),
            FilterPatch {
                age_range: Some(AgeRange { min: Some(20), max: None }),
                ..Default::default()
            },
        ];
        for patch in patches {
            let (next, _) = state_on_page(4, 9).reduce(QueryIntent::UpdateFilters(patch), &policy);
            assert_eq!(next.pagination.page, 1);
        }
    }

    #[test]
    fn go_to_page_clamps_instead_of_rejecting() {
        let policy = SortPolicy::default();
        let state = state_on_page(2, 7);

        let (next, _) = state.reduce(QueryIntent::GoToPage(0), &policy);
        assert_eq!(next.pagination.page, 1);

        let (next, _) = state.reduce(QueryIntent::GoToPage(12), &policy);
        assert_eq!(next.pagination.page, 7);

        let (next, _) = state.reduce(QueryIntent::GoToPage(-3), &policy);
        assert_eq!(next.pagination.page, 1);

        for n in -5..20 {
            let (next, _) = state.reduce(QueryIntent::GoToPage(n), &policy);
            assert!((1..=7).contains(&next.pagination.page));
        }
    }

    #[test]
    fn go_to_page_without_results_stays_on_first_page() {
        let (next, transition) =
            state_on_page(1, 0).reduce(QueryIntent::GoToPage(3), &SortPolicy::default());
        assert_eq!(next.pagination.page, 1);
        assert!(!transition.needs_fetch());
    }

    #[test]
    fn selecting_current_sort_field_flips_direction() {
        let state = QueryState::new(10);
        assert_eq!(state.sort, SortConfig { field: SortField::Date, direction: SortDirection::Desc });

        let (next, _) = state.reduce(QueryIntent::SelectSort(SortField::Date), &SortPolicy::default());
        assert_eq!(next.sort, SortConfig { field: SortField::Date, direction: SortDirection::Asc });
    }

    #[test]
    fn new_sort_field_uses_per_field_default() {
        let policy = SortPolicy::default();
        let state = QueryState::new(10);

        let (next, _) = state.reduce(QueryIntent::SelectSort(SortField::CustomerName), &policy);
        assert_eq!(next.sort.direction, SortDirection::Asc);

        let (next, _) = state.reduce(QueryIntent::SelectSort(SortField::FinalAmount), &policy);
        assert_eq!(next.sort.direction, SortDirection::Desc);

        let custom = SortPolicy::default().with_default(SortField::Quantity, SortDirection::Asc);
        let (next, _) = state.reduce(QueryIntent::SelectSort(SortField::Quantity), &custom);
        assert_eq!(next.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_change_resets_page() {
        let (next, transition) =
            state_on_page(5, 9).reduce(QueryIntent::SelectSort(SortField::Quantity), &SortPolicy::default());
        assert_eq!(next.pagination.page, 1);
        assert!(transition.needs_fetch());
        assert!(!transition.needs_summary());
    }

    #[test]
    fn clear_filters_keeps_sort() {
        let policy = SortPolicy::default();
        let mut state = state_on_page(3, 5);
        state.sort = SortConfig { field: SortField::Quantity, direction: SortDirection::Asc };
        state.filters.tags = vec!["sale".into()];
        state.filters.search = "9876".into();

        let (next, transition) = state.reduce(QueryIntent::ClearFilters, &policy);
        assert_eq!(next.filters, SalesFilters::default());
        assert_eq!(next.pagination.page, 1);
        assert_eq!(next.sort, state.sort);
        assert!(transition.filters_changed);
    }

    #[test]
    fn version_only_moves_when_query_changes() {
        let policy = SortPolicy::default();
        let state = QueryState::new(10);

        let (same, transition) = state.reduce(QueryIntent::ClearFilters, &policy);
        assert_eq!(same.version, 0);
        assert!(!transition.needs_fetch());

        let (next, _) = state.reduce(QueryIntent::SelectSort(SortField::Quantity), &policy);
        assert_eq!(next.version, 1);

        let (retry, transition) = next.reduce(QueryIntent::Refetch, &policy);
        assert_eq!(retry.version, 1);
        assert!(transition.needs_fetch());
        assert!(transition.needs_summary());
    }

    #[test]
    fn fetch_totals_drive_page_count() {
        let mut state = QueryState::new(10);
        assert!(!state.apply_fetch_totals(95));
        assert_eq!(state.pagination.total_pages, 10);
        assert_eq!(state.pagination.total_records, 95);
    }

    #[test]
    fn shrinking_totals_pull_the_page_back_in_range() {
        let mut state = state_on_page(9, 9);
        assert!(state.apply_fetch_totals(20));
        assert_eq!(state.pagination.page, 2);
        assert_eq!(state.pagination.total_pages, 2);
        assert_eq!(state.version, 1);

        // sem resultados a página continua sendo a primeira
        let mut state = state_on_page(4, 9);
        assert!(state.apply_fetch_totals(0));
        assert_eq!(state.pagination.page, 1);
        assert!(!state.apply_fetch_totals(0));
    }
}
