// src/services/sales_service.rs

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::SalesSource,
    models::sales::{FilterOptionRow, FilterOptions, SalesFilters, SalesPage, SalesQuery, SummaryRow, SummaryStats},
    state::{
        query_state::{QueryIntent, SortPolicy},
        session::{DashboardSession, FetchPlan, SessionStore, SharedSession},
    },
};

// =========================================================================
//  REDUÇÕES PURAS
// =========================================================================

/// Totais sobre as linhas filtradas (sem paginação). Valores ausentes contam como 0.
pub fn summarize(rows: &[SummaryRow]) -> SummaryStats {
    rows.iter().fold(SummaryStats::default(), |mut acc, row| {
        let amount = row.total_amount.unwrap_or(Decimal::ZERO);
        let discount_pct = row.discount_percentage.unwrap_or(Decimal::ZERO);

        acc.total_units_sold += i64::from(row.quantity.unwrap_or(0));
        acc.total_amount += amount;
        acc.total_discount += amount * discount_pct / Decimal::ONE_HUNDRED;
        acc
    })
}

/// Valores distintos e não vazios por dimensão, já ordenados. Tags são achatadas.
pub fn resolve_filter_options(rows: &[FilterOptionRow]) -> FilterOptions {
    let mut regions = BTreeSet::new();
    let mut genders = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut tags = BTreeSet::new();
    let mut payment_methods = BTreeSet::new();

    fn add<'a>(set: &mut BTreeSet<&'a str>, value: &'a Option<String>) {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            set.insert(v);
        }
    }

    for row in rows {
        add(&mut regions, &row.customer_region);
        add(&mut genders, &row.gender);
        add(&mut categories, &row.product_category);
        add(&mut payment_methods, &row.payment_method);
        for tag in row.tags.iter().flatten().filter(|t| !t.is_empty()) {
            tags.insert(tag.as_str());
        }
    }

    fn owned(set: BTreeSet<&str>) -> Vec<String> {
        set.into_iter().map(str::to_string).collect()
    }

    FilterOptions {
        regions: owned(regions),
        genders: owned(genders),
        categories: owned(categories),
        tags: owned(tags),
        payment_methods: owned(payment_methods),
    }
}

// =========================================================================
//  SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct SalesService {
    source: Arc<dyn SalesSource>,
    sessions: SessionStore,
    policy: SortPolicy,
    page_size: u32,
}

impl SalesService {
    pub fn new(source: Arc<dyn SalesSource>, page_size: u32) -> Self {
        Self {
            source,
            sessions: SessionStore::new(),
            policy: SortPolicy::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn with_sort_policy(mut self, policy: SortPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sessões sem acesso por mais que `ttl` são descartadas.
    pub fn with_session_idle_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = SessionStore::with_idle_ttl(ttl);
        self
    }

    pub fn sort_policy(&self) -> &SortPolicy {
        &self.policy
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn fetch_page(&self, query: &SalesQuery) -> Result<SalesPage, AppError> {
        self.source.fetch_page(query).await
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        let rows = self.source.fetch_option_rows().await?;
        Ok(resolve_filter_options(&rows))
    }

    pub async fn summary(&self, filters: &SalesFilters) -> Result<SummaryStats, AppError> {
        let rows = self.source.fetch_summary_rows(filters).await?;
        Ok(summarize(&rows))
    }

    // =========================================================================
    //  SESSÕES DE DASHBOARD
    // =========================================================================

    /// Monta uma sessão nova: opções de filtro, primeira página e resumo.
    pub async fn open_session(&self) -> SharedSession {
        let mut session = DashboardSession::new(self.page_size, self.policy.clone());
        let plan = session.initial_plan();
        let shared = self.sessions.insert(session).await;

        let options = self.filter_options().await;
        shared.lock().await.complete_filter_options(options);
        self.execute(&shared, plan).await;

        let id = shared.lock().await.id;
        tracing::info!(session = %id, "🆕 Sessão de dashboard aberta");
        shared
    }

    pub async fn run_intent(&self, session: &SharedSession, intent: QueryIntent) {
        let plan = session.lock().await.dispatch(intent);
        self.execute(session, plan).await;
    }

    pub async fn refresh_filter_options(&self, session: &SharedSession) {
        let options = self.filter_options().await;
        session.lock().await.complete_filter_options(options);
    }

    /// As buscas rodam fora do lock; cada resultado volta pelo seu ticket e
    /// respostas que ficaram para trás são descartadas pela sessão.
    async fn execute(&self, session: &SharedSession, plan: FetchPlan) {
        let rows = async {
            match &plan.rows {
                Some(ticket) => Some(self.fetch_page(&ticket.query).await),
                None => None,
            }
        };
        let summary = async {
            match &plan.summary {
                Some(ticket) => Some(self.summary(&ticket.filters).await),
                None => None,
            }
        };
        let (rows, summary) = tokio::join!(rows, summary);

        let mut follow_up = {
            let mut guard = session.lock().await;
            if let (Some(ticket), Some(result)) = (&plan.summary, summary) {
                guard.complete_summary(ticket, result);
            }
            match (&plan.rows, rows) {
                (Some(ticket), Some(result)) => guard.complete_fetch(ticket, result).follow_up(),
                _ => None,
            }
        };

        // Cada nova tentativa pede uma página menor, então o laço termina.
        while let Some(ticket) = follow_up {
            let result = self.fetch_page(&ticket.query).await;
            follow_up = session.lock().await.complete_fetch(&ticket, result).follow_up();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

    use crate::db::memory_source::{fixtures::record, InMemorySalesSource};
    use crate::models::sales::{FilterPatch, SortField};

    #[test]
    fn summary_coerces_missing_values_to_zero() {
        let rows = vec![
            SummaryRow {
                quantity: Some(2),
                total_amount: Some(Decimal::new(100, 0)),
                discount_percentage: Some(Decimal::new(10, 0)),
            },
            SummaryRow {
                quantity: Some(3),
                total_amount: Some(Decimal::new(50, 0)),
                discount_percentage: None,
            },
            SummaryRow { quantity: None, total_amount: None, discount_percentage: Some(Decimal::new(5, 0)) },
        ];
        let stats = summarize(&rows);

        assert_eq!(stats.total_units_sold, 5);
        assert_eq!(stats.total_amount, Decimal::new(150, 0));
        assert_eq!(stats.total_discount, Decimal::new(10, 0));
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(summarize(&[]), SummaryStats::default());
    }

    #[test]
    fn filter_options_are_sorted_distinct_and_non_empty() {
        let rows = vec![
            FilterOptionRow {
                customer_region: Some("West".into()),
                gender: Some("Male".into()),
                product_category: Some("Beauty".into()),
                tags: Some(vec!["sale".into(), "new".into()]),
                payment_method: Some("UPI".into()),
            },
            FilterOptionRow {
                customer_region: Some("East".into()),
                gender: Some("".into()),
                product_category: None,
                tags: Some(vec!["sale".into(), "".into()]),
                payment_method: Some("Cash".into()),
            },
            FilterOptionRow::default(),
        ];
        let options = resolve_filter_options(&rows);

        assert_eq!(options.regions, vec!["East", "West"]);
        assert_eq!(options.genders, vec!["Male"]);
        assert_eq!(options.categories, vec!["Beauty"]);
        assert_eq!(options.tags, vec!["new", "sale"]);
        assert_eq!(options.payment_methods, vec!["Cash", "UPI"]);
    }

    fn service_with(count: u128) -> (Arc<InMemorySalesSource>, SalesService) {
        let records = (1..=count).map(|n| record(n, &format!("Customer {:02}", n))).collect();
        let source = Arc::new(InMemorySalesSource::new(records));
        let service = SalesService::new(source.clone(), 10);
        (source, service)
    }

    #[tokio::test]
    async fn opening_a_session_loads_everything() {
        let (_, service) = service_with(23);
        let shared = service.open_session().await;
        let session = shared.lock().await;

        assert_eq!(session.rows.len(), 10);
        assert_eq!(session.query.pagination.total_pages, 3);
        assert_eq!(session.query.pagination.total_records, 23);
        assert_eq!(session.summary.total_units_sold, 23);
        assert_eq!(session.filter_options.regions, vec!["North"]);
        assert!(!session.loading);
        assert_eq!(service.sessions().len().await, 1);
    }

    #[tokio::test]
    async fn navigating_keeps_summary_and_moves_window() {
        let (_, service) = service_with(23);
        let shared = service.open_session().await;

        service.run_intent(&shared, QueryIntent::GoToPage(99)).await;
        let session = shared.lock().await;
        assert_eq!(session.query.pagination.page, 3);
        assert_eq!(session.rows.len(), 3);
        assert_eq!(session.summary.total_units_sold, 23);
    }

    #[tokio::test]
    async fn filtering_updates_rows_and_summary_together() {
        let (_, service) = service_with(23);
        let shared = service.open_session().await;
        service.run_intent(&shared, QueryIntent::GoToPage(2)).await;

        service
            .run_intent(
                &shared,
                QueryIntent::UpdateFilters(FilterPatch {
                    search: Some("customer 1".into()),
                    ..Default::default()
                }),
            )
            .await;

        let session = shared.lock().await;
        assert_eq!(session.query.pagination.page, 1);
        // Customer 10..19
        assert_eq!(session.query.pagination.total_records, 10);
        assert_eq!(session.summary.total_units_sold, 10);
    }

    #[tokio::test]
    async fn outage_surfaces_error_and_retry_recovers() {
        let (source, service) = service_with(5);
        let shared = service.open_session().await;

        source.set_failing(true);
        service.run_intent(&shared, QueryIntent::SelectSort(SortField::CustomerName)).await;
        {
            let session = shared.lock().await;
            assert!(session.rows.is_empty());
            assert!(session.error.is_some());
            // o resumo não é refeito numa troca de ordenação
            assert_eq!(session.summary.total_units_sold, 5);
        }

        source.set_failing(false);
        service.run_intent(&shared, QueryIntent::Refetch).await;
        let session = shared.lock().await;
        assert_eq!(session.rows.len(), 5);
        assert_eq!(session.error, None);
        assert_eq!(session.rows[0].customer_name, "Customer 01");
    }

    /// Fonte cujo total pode encolher entre duas buscas.
    struct ShrinkingSource {
        total: AtomicU64,
    }

    #[async_trait::async_trait]
    impl SalesSource for ShrinkingSource {
        async fn fetch_page(&self, query: &SalesQuery) -> Result<SalesPage, AppError> {
            let total = self.total.load(AtomicOrdering::SeqCst);
            let start = query.offset();
            let count = total.saturating_sub(start).min(u64::from(query.limit));
            Ok(SalesPage {
                rows: (start + 1..=start + count).map(|n| record(u128::from(n), "Shrinking")).collect(),
                total_matching: total,
            })
        }

        async fn fetch_option_rows(&self) -> Result<Vec<FilterOptionRow>, AppError> {
            Ok(Vec::new())
        }

        async fn fetch_summary_rows(&self, _filters: &SalesFilters) -> Result<Vec<SummaryRow>, AppError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn refetch_on_a_shrunken_dataset_lands_on_the_last_page_with_rows() {
        let source = Arc::new(ShrinkingSource { total: AtomicU64::new(90) });
        let service = SalesService::new(source.clone(), 10);
        let shared = service.open_session().await;
        service.run_intent(&shared, QueryIntent::GoToPage(9)).await;

        source.total.store(20, AtomicOrdering::SeqCst);
        service.run_intent(&shared, QueryIntent::Refetch).await;

        let session = shared.lock().await;
        assert_eq!(session.query.pagination.page, 2);
        assert_eq!(session.query.pagination.total_pages, 2);
        assert_eq!(session.rows.len(), 10);
        assert!(!session.loading);
    }

    #[tokio::test]
    async fn filter_option_failures_are_swallowed() {
        let (source, service) = service_with(3);
        source.set_failing(true);
        let shared = service.open_session().await;

        let session = shared.lock().await;
        assert_eq!(session.filter_options, FilterOptions::default());
        assert!(session.error.is_some());
    }
}
