// src/view/panel.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::view::table::SalesTable;

/// O que ocupa a área da tabela. Erro tem prioridade sobre vazio, que tem
/// prioridade sobre a tabela (com ou sem esqueleto de carregamento).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TablePanel {
    #[serde(rename_all = "camelCase")]
    Error {
        title: String,
        message: String,
        retry_label: String,
    },
    #[serde(rename_all = "camelCase")]
    Empty {
        title: String,
        message: String,
        has_filters: bool,
        /// Só existe quando há filtros ativos para limpar.
        clear_filters_label: Option<String>,
    },
    Loading,
    Table(SalesTable),
}

impl TablePanel {
    pub fn error(message: &str) -> Self {
        TablePanel::Error {
            title: "Something went wrong".into(),
            message: message.to_string(),
            retry_label: "Try again".into(),
        }
    }

    pub fn empty(has_filters: bool) -> Self {
        let message = if has_filters {
            "We couldn't find any records matching your current filters. Try adjusting or clearing them."
        } else {
            "No sales data available. Data will appear here once it's added."
        };
        TablePanel::Empty {
            title: "No results found".into(),
            message: message.into(),
            has_filters,
            clear_filters_label: has_filters.then(|| "Clear all filters".to_string()),
        }
    }

    pub fn select(error: Option<&str>, loading: bool, has_filters: bool, table: SalesTable) -> Self {
        if let Some(message) = error {
            return TablePanel::error(message);
        }
        if loading {
            return TablePanel::Loading;
        }
        if table.rows.is_empty() {
            return TablePanel::empty(has_filters);
        }
        TablePanel::Table(table)
    }
}
