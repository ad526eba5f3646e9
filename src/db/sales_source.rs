// src/db/sales_source.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::sales::{FilterOptionRow, SalesFilters, SalesPage, SalesQuery, SummaryRow},
};

/// Fonte remota de registros de venda.
///
/// Todas as restrições são conjuntivas entre dimensões e disjuntivas dentro
/// de um filtro de seleção múltipla. `total_matching` depende só dos filtros,
/// nunca da janela de paginação.
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Uma página ordenada e filtrada, mais o total de registros que casam com os filtros.
    async fn fetch_page(&self, query: &SalesQuery) -> Result<SalesPage, AppError>;

    /// Colunas categóricas da base inteira, ignorando filtros.
    async fn fetch_option_rows(&self) -> Result<Vec<FilterOptionRow>, AppError>;

    /// Todas as linhas que casam com os filtros, sem paginação.
    async fn fetch_summary_rows(&self, filters: &SalesFilters) -> Result<Vec<SummaryRow>, AppError>;
}
