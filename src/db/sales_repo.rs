// src/db/sales_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    db::SalesSource,
    models::sales::{FilterOptionRow, SalesFilters, SalesPage, SalesQuery, SalesRecord, SummaryRow},
};

const SALES_COLUMNS: &str = "id, transaction_id, date, \
     customer_id, customer_name, phone_number, gender, age, customer_region, customer_type, \
     product_id, product_name, brand, product_category, tags, \
     quantity, price_per_unit, discount_percentage, total_amount, final_amount, \
     payment_method, order_status, delivery_type, store_id, store_location, \
     salesperson_id, employee_name, created_at";

// Em READ COMMITTED cada comando tem seu snapshot; aqui contagem e página
// precisam ver o mesmo.
const PAGE_SNAPSHOT: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY";

// Repositório da tabela 'sales_data'. Só leitura: os registros pertencem ao backend.
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapa os curingas do ILIKE para que o termo seja buscado literalmente.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Acrescenta o WHERE dos filtros. Compartilhado pela página, contagem e resumo,
/// então os três sempre enxergam o mesmo conjunto de linhas.
pub(crate) fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SalesFilters) {
    qb.push(" WHERE TRUE");

    // Busca: nome OU telefone, sem diferenciar maiúsculas
    if let Some(term) = filters.search_term() {
        let pattern = like_pattern(term);
        qb.push(" AND (customer_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR phone_number ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    let multi_selects = [
        ("customer_region", &filters.customer_regions),
        ("gender", &filters.genders),
        ("product_category", &filters.product_categories),
        ("payment_method", &filters.payment_methods),
    ];
    for (column, values) in multi_selects {
        if !values.is_empty() {
            qb.push(format!(" AND {} = ANY(", column));
            qb.push_bind(values.clone());
            qb.push(")");
        }
    }

    if let Some(min) = filters.age_range.min {
        qb.push(" AND age >= ").push_bind(min);
    }
    if let Some(max) = filters.age_range.max {
        qb.push(" AND age <= ").push_bind(max);
    }

    if let Some(start) = filters.date_range.start {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = filters.date_range.end {
        qb.push(" AND date <= ").push_bind(end);
    }

    // Tags: basta compartilhar um elemento (operador de sobreposição de arrays)
    if !filters.tags.is_empty() {
        qb.push(" AND tags && ");
        qb.push_bind(filters.tags.clone());
    }
}

pub(crate) fn page_query(query: &SalesQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM sales_data", SALES_COLUMNS));
    push_filters(&mut qb, &query.filters);

    // Desempate por id para a ordem ser estável entre páginas
    qb.push(format!(
        " ORDER BY {} {}, id ASC",
        query.sort.field.column(),
        query.sort.direction.sql()
    ));
    qb.push(" LIMIT ").push_bind(i64::from(query.limit));
    qb.push(" OFFSET ").push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));
    qb
}

pub(crate) fn count_query(filters: &SalesFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM sales_data");
    push_filters(&mut qb, filters);
    qb
}

pub(crate) fn summary_query(filters: &SalesFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT quantity, total_amount, discount_percentage FROM sales_data",
    );
    push_filters(&mut qb, filters);
    qb
}

#[async_trait]
impl SalesSource for SalesRepository {
    async fn fetch_page(&self, query: &SalesQuery) -> Result<SalesPage, AppError> {
        // Contagem e página no mesmo snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query(PAGE_SNAPSHOT).execute(&mut *tx).await?;

        let total = count_query(&query.filters)
            .build_query_scalar::<i64>()
            .fetch_one(&mut *tx)
            .await?;

        let rows = page_query(query)
            .build_query_as::<SalesRecord>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            page = query.page,
            total,
            returned = rows.len(),
            "Página de vendas carregada"
        );

        Ok(SalesPage {
            rows,
            total_matching: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn fetch_option_rows(&self) -> Result<Vec<FilterOptionRow>, AppError> {
        let rows = sqlx::query_as::<_, FilterOptionRow>(
            r#"
            SELECT customer_region, gender, product_category, tags, payment_method
            FROM sales_data
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn fetch_summary_rows(&self, filters: &SalesFilters) -> Result<Vec<SummaryRow>, AppError> {
        let rows = summary_query(filters)
            .build_query_as::<SummaryRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
