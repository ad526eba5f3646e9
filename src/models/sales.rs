// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

// =========================================================================
//  REGISTRO (uma transação de venda, espelha a tabela `sales_data`)
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SalesRecord {
    pub id: Uuid,
    #[schema(example = "TXN-000123")]
    pub transaction_id: String,
    pub date: NaiveDate,

    // Cliente
    #[schema(example = "CUST-0042")]
    pub customer_id: String,
    #[schema(example = "Neha Yadav")]
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub customer_region: Option<String>,
    pub customer_type: Option<String>,

    // Produto
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub product_category: Option<String>,
    pub tags: Option<Vec<String>>,

    // Comercial
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub discount_percentage: Option<Decimal>,
    pub total_amount: Decimal,
    pub final_amount: Decimal,

    // Operacional
    pub payment_method: Option<String>,
    pub order_status: Option<String>,
    pub delivery_type: Option<String>,
    pub store_id: Option<String>,
    pub store_location: Option<String>,
    pub salesperson_id: Option<String>,
    pub employee_name: Option<String>,

    pub created_at: DateTime<Utc>,
}

// Projeções usadas pelo agregador e pelo resolvedor de opções
#[derive(Debug, Clone, Default, PartialEq, Deserialize, FromRow)]
pub struct SummaryRow {
    pub quantity: Option<i32>,
    pub total_amount: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct FilterOptionRow {
    pub customer_region: Option<String>,
    pub gender: Option<String>,
    pub product_category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub payment_method: Option<String>,
}

impl From<&SalesRecord> for SummaryRow {
    fn from(r: &SalesRecord) -> Self {
        Self {
            quantity: Some(r.quantity),
            total_amount: Some(r.total_amount),
            discount_percentage: r.discount_percentage,
        }
    }
}

impl From<&SalesRecord> for FilterOptionRow {
    fn from(r: &SalesRecord) -> Self {
        Self {
            customer_region: r.customer_region.clone(),
            gender: r.gender.clone(),
            product_category: r.product_category.clone(),
            tags: r.tags.clone(),
            payment_method: r.payment_method.clone(),
        }
    }
}

// =========================================================================
//  FILTROS
// =========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AgeRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl AgeRange {
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Estado completo dos filtros. Vetor vazio / `None` = sem restrição naquela dimensão.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesFilters {
    pub search: String,
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub age_range: AgeRange,
    pub product_categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub date_range: DateRange,
}

/// Atualização parcial: só os campos presentes são sobrescritos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub customer_regions: Option<Vec<String>>,
    pub genders: Option<Vec<String>>,
    pub age_range: Option<AgeRange>,
    pub product_categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub payment_methods: Option<Vec<String>>,
    pub date_range: Option<DateRange>,
}

impl SalesFilters {
    /// Termo de busca já sem espaços nas pontas; `None` quando vazio.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    pub fn has_active_filters(&self) -> bool {
        self.search_term().is_some()
            || !self.customer_regions.is_empty()
            || !self.genders.is_empty()
            || !self.product_categories.is_empty()
            || !self.tags.is_empty()
            || !self.payment_methods.is_empty()
            || !self.age_range.is_open()
            || !self.date_range.is_open()
    }

    pub fn merge(&self, patch: FilterPatch) -> SalesFilters {
        let current = self.clone();
        SalesFilters {
            search: patch.search.unwrap_or(current.search),
            customer_regions: patch.customer_regions.unwrap_or(current.customer_regions),
            genders: patch.genders.unwrap_or(current.genders),
            age_range: patch.age_range.unwrap_or(current.age_range),
            product_categories: patch.product_categories.unwrap_or(current.product_categories),
            tags: patch.tags.unwrap_or(current.tags),
            payment_methods: patch.payment_methods.unwrap_or(current.payment_methods),
            date_range: patch.date_range.unwrap_or(current.date_range),
        }
    }
}

// =========================================================================
//  ORDENAÇÃO
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Quantity,
    CustomerName,
    FinalAmount,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Date,
        SortField::Quantity,
        SortField::CustomerName,
        SortField::FinalAmount,
    ];

    /// Nome da coluna em `sales_data`. Lista fechada, segura para interpolar no SQL.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Quantity => "quantity",
            SortField::CustomerName => "customer_name",
            SortField::FinalAmount => "final_amount",
        }
    }

    pub fn parse(value: &str) -> Option<SortField> {
        SortField::ALL.into_iter().find(|f| f.column() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(value: &str) -> Option<SortDirection> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self { field: SortField::Date, direction: SortDirection::Desc }
    }
}

// =========================================================================
//  PAGINAÇÃO / CONSULTA
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

impl PaginationInfo {
    pub fn new(limit: u32) -> Self {
        Self { page: 1, limit: limit.max(1), total_pages: 0, total_records: 0 }
    }
}

impl Default for PaginationInfo {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Total de páginas para `total` registros (arredonda para cima).
pub fn total_pages_for(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

/// Parâmetros de uma única busca contra a fonte de registros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesQuery {
    pub filters: SalesFilters,
    pub sort: SortConfig,
    pub page: u32,
    pub limit: u32,
}

impl SalesQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesPage {
    pub rows: Vec<SalesRecord>,
    pub total_matching: u64,
}

// =========================================================================
//  OPÇÕES DE FILTRO / ESTATÍSTICAS
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_units_sold: i64,
    pub total_amount: Decimal,
    pub total_discount: Decimal,
}
