// src/view/filters.rs

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sales::{
    AgeRange, DateRange, FilterOptions, SalesFilters, SortConfig, SortDirection, SortField,
};

pub const SEARCH_PLACEHOLDER: &str = "Name, Phone no.";

// =========================================================================
//  ENTRADAS DOS CONTROLES
// =========================================================================

/// Lê um limite numérico digitado. Vazio ou inválido = sem limite.
/// Aceita o prefixo numérico ("25 anos" -> 25), como um input type=number faria.
pub fn parse_bound(input: &str) -> Option<i32> {
    let trimmed = input.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..digits_end].parse().ok()
}

/// Data no formato `YYYY-MM-DD`. Vazio ou inválido = sem limite.
pub fn parse_date_bound(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Marca/desmarca `option` numa seleção múltipla, preservando a ordem de escolha.
pub fn toggle_option(selected: &[String], option: &str) -> Vec<String> {
    if selected.iter().any(|s| s == option) {
        selected.iter().filter(|s| *s != option).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(option.to_string());
        next
    }
}

// =========================================================================
//  TEXTOS DOS BOTÕES
// =========================================================================

pub fn age_display(range: &AgeRange) -> String {
    match (range.min, range.max) {
        (Some(min), Some(max)) => format!("{} - {}", min, max),
        (Some(min), None) => format!("{}+", min),
        (None, Some(max)) => format!("≤{}", max),
        (None, None) => "Age Range".to_string(),
    }
}

pub fn date_display(range: &DateRange) -> String {
    let short = |d: NaiveDate| d.format("%b %-d").to_string();
    match (range.start, range.end) {
        (Some(start), Some(end)) => format!("{} - {}", short(start), short(end)),
        (Some(start), None) => format!("From {}", short(start)),
        (None, Some(end)) => format!("Until {}", short(end)),
        (None, None) => "Date".to_string(),
    }
}

pub fn sort_label(field: SortField) -> &'static str {
    match field {
        SortField::Date => "Date",
        SortField::Quantity => "Quantity",
        SortField::CustomerName => "Customer Name (A-Z)",
        SortField::FinalAmount => "Amount",
    }
}

// =========================================================================
//  BARRA DE FILTROS
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiSelectControl {
    /// Campo correspondente em `SalesFilters` (camelCase).
    pub key: String,
    pub label: String,
    pub options: Vec<String>,
    pub selected: Vec<String>,
    pub selected_count: usize,
    pub active: bool,
}

impl MultiSelectControl {
    fn new(key: &str, label: &str, options: &[String], selected: &[String]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options: options.to_vec(),
            selected: selected.to_vec(),
            selected_count: selected.len(),
            active: !selected.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeControl {
    pub display: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortOptionView {
    pub field: SortField,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortControl {
    pub label: String,
    pub direction: SortDirection,
    pub options: Vec<SortOptionView>,
}

impl SortControl {
    pub fn build(sort: &SortConfig) -> Self {
        Self {
            label: sort_label(sort.field).to_string(),
            direction: sort.direction,
            options: SortField::ALL
                .into_iter()
                .map(|field| SortOptionView {
                    field,
                    label: sort_label(field).to_string(),
                    selected: field == sort.field,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiltersBar {
    pub search: String,
    pub search_placeholder: String,
    pub regions: MultiSelectControl,
    pub genders: MultiSelectControl,
    pub age: RangeControl,
    pub categories: MultiSelectControl,
    pub tags: MultiSelectControl,
    pub payment_methods: MultiSelectControl,
    pub date: RangeControl,
    pub sort: SortControl,
}

impl FiltersBar {
    pub fn build(filters: &SalesFilters, sort: &SortConfig, options: &FilterOptions) -> Self {
        Self {
            search: filters.search.clone(),
            search_placeholder: SEARCH_PLACEHOLDER.to_string(),
            regions: MultiSelectControl::new(
                "customerRegions",
                "Customer Region",
                &options.regions,
                &filters.customer_regions,
            ),
            genders: MultiSelectControl::new("genders", "Gender", &options.genders, &filters.genders),
            age: RangeControl {
                display: age_display(&filters.age_range),
                active: !filters.age_range.is_open(),
            },
            categories: MultiSelectControl::new(
                "productCategories",
                "Product Category",
                &options.categories,
                &filters.product_categories,
            ),
            tags: MultiSelectControl::new("tags", "Tags", &options.tags, &filters.tags),
            payment_methods: MultiSelectControl::new(
                "paymentMethods",
                "Payment Method",
                &options.payment_methods,
                &filters.payment_methods,
            ),
            date: RangeControl {
                display: date_display(&filters.date_range),
                active: !filters.date_range.is_open(),
            },
            sort: SortControl::build(sort),
        }
    }
}
