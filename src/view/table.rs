// src/view/table.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::sales::SalesRecord;

pub const COLUMNS: [&str; 9] = [
    "Transaction ID",
    "Date",
    "Customer ID",
    "Customer name",
    "Phone Number",
    "Gender",
    "Age",
    "Product Category",
    "Quantity",
];

const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: Uuid,
    pub cells: Vec<String>,
    /// Telefone presente: a célula vira link.
    pub phone_link: bool,
}

impl From<&SalesRecord> for TableRow {
    fn from(r: &SalesRecord) -> Self {
        let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());

        TableRow {
            id: r.id,
            cells: vec![
                r.transaction_id.clone(),
                r.date.format("%Y-%m-%d").to_string(),
                r.customer_id.clone(),
                r.customer_name.clone(),
                or_missing(&r.phone_number),
                or_missing(&r.gender),
                r.age.map_or_else(|| MISSING.to_string(), |a| a.to_string()),
                or_missing(&r.product_category),
                format!("{:02}", r.quantity),
            ],
            phone_link: r.phone_number.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl SalesTable {
    pub fn build(records: &[SalesRecord]) -> SalesTable {
        SalesTable {
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: records.iter().map(TableRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_source::fixtures::record;

    #[test]
    fn renders_nine_cells_with_placeholders() {
        let mut r = record(7, "Asha");
        r.phone_number = None;
        r.age = None;
        r.gender = None;
        r.quantity = 4;

        let row = TableRow::from(&r);
        assert_eq!(row.cells.len(), COLUMNS.len());
        assert_eq!(
            row.cells,
            vec!["TXN-0007", "2023-01-08", "CUST-007", "Asha", "-", "-", "-", "Home", "04"]
        );
        assert!(!row.phone_link);
    }

    #[test]
    fn wide_quantities_are_not_truncated() {
        let mut r = record(1, "A");
        r.quantity = 120;
        assert_eq!(TableRow::from(&r).cells[8], "120");
    }
}
