// src/db/memory_source.rs

use std::{
    cmp::Ordering,
    path::Path,
    sync::atomic::{AtomicBool, Ordering as AtomicOrdering},
};

use anyhow::Context;
use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::SalesSource,
    models::sales::{
        FilterOptionRow, SalesFilters, SalesPage, SalesQuery, SalesRecord, SortConfig,
        SortDirection, SortField, SummaryRow,
    },
};

/// Fonte em memória com a mesma semântica do `SalesRepository`.
/// Usada com `SALES_SEED_FILE` e nos testes.
pub struct InMemorySalesSource {
    records: Vec<SalesRecord>,
    failing: AtomicBool,
}

impl InMemorySalesSource {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records, failing: AtomicBool::new(false) }
    }

    /// Carrega um array JSON de registros (mesmo formato das colunas de `sales_data`).
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("falha ao ler {}", path.display()))?;
        let records: Vec<SalesRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("JSON inválido em {}", path.display()))?;
        tracing::info!("📦 {} registros carregados de {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    /// Simula a queda do backend: toda chamada passa a falhar.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, AtomicOrdering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(AppError::SourceUnavailable("sales store did not respond".into()));
        }
        Ok(())
    }

    fn matching<'a>(&'a self, filters: &'a SalesFilters) -> impl Iterator<Item = &'a SalesRecord> + 'a {
        let term = filters.search_term().map(str::to_lowercase);
        self.records
            .iter()
            .filter(move |r| matches_filters(r, filters, term.as_deref()))
    }
}

fn in_selection(value: &Option<String>, selected: &[String]) -> bool {
    selected.is_empty() || value.as_ref().is_some_and(|v| selected.contains(v))
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

/// `term` já vem em minúsculas.
fn matches_filters(r: &SalesRecord, filters: &SalesFilters, term: Option<&str>) -> bool {
    if let Some(term) = term {
        if !contains_ci(Some(&r.customer_name), term) && !contains_ci(r.phone_number.as_deref(), term) {
            return false;
        }
    }

    if !in_selection(&r.customer_region, &filters.customer_regions)
        || !in_selection(&r.gender, &filters.genders)
        || !in_selection(&r.product_category, &filters.product_categories)
        || !in_selection(&r.payment_method, &filters.payment_methods)
    {
        return false;
    }

    // Idade ausente não satisfaz nenhum limite (igual ao NULL no SQL)
    let age = filters.age_range;
    if age.min.is_some_and(|min| r.age.is_none_or(|a| a < min))
        || age.max.is_some_and(|max| r.age.is_none_or(|a| a > max))
    {
        return false;
    }

    let dates = filters.date_range;
    if dates.start.is_some_and(|s| r.date < s) || dates.end.is_some_and(|e| r.date > e) {
        return false;
    }

    if !filters.tags.is_empty() {
        let overlaps = r
            .tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| filters.tags.contains(t)));
        if !overlaps {
            return false;
        }
    }

    true
}

fn compare(a: &SalesRecord, b: &SalesRecord, sort: SortConfig) -> Ordering {
    let primary = match sort.field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::CustomerName => a.customer_name.cmp(&b.customer_name),
        SortField::FinalAmount => a.final_amount.cmp(&b.final_amount),
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl SalesSource for InMemorySalesSource {
    async fn fetch_page(&self, query: &SalesQuery) -> Result<SalesPage, AppError> {
        self.check_available()?;

        let mut rows: Vec<&SalesRecord> = self.matching(&query.filters).collect();
        rows.sort_by(|a, b| compare(a, b, query.sort));
        let total_matching = rows.len() as u64;

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let rows = rows
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(SalesPage { rows, total_matching })
    }

    async fn fetch_option_rows(&self) -> Result<Vec<FilterOptionRow>, AppError> {
        self.check_available()?;
        Ok(self.records.iter().map(FilterOptionRow::from).collect())
    }

    async fn fetch_summary_rows(&self, filters: &SalesFilters) -> Result<Vec<SummaryRow>, AppError> {
        self.check_available()?;
        Ok(self.matching(filters).map(SummaryRow::from).collect())
    }
}
