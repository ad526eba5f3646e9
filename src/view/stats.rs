// src/view/stats.rs

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sales::SummaryStats;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub sub_value: Option<String>,
}

/// Os três cartões acima da tabela.
pub fn stat_cards(stats: &SummaryStats, total_records: u64) -> Vec<StatCard> {
    let records = format!("({} SRs)", total_records);
    vec![
        StatCard {
            label: "Total units sold".into(),
            value: group_thousands(stats.total_units_sold),
            sub_value: None,
        },
        StatCard {
            label: "Total Amount".into(),
            value: format_inr(stats.total_amount),
            sub_value: Some(records.clone()),
        },
        StatCard {
            label: "Total Discount".into(),
            value: format_inr(stats.total_discount),
            sub_value: Some(records),
        },
    ]
}

/// Agrupamento de milhar no padrão en-US: 1234567 -> "1,234,567".
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 { format!("-{}", out) } else { out }
}

/// Rúpias sem casas decimais, agrupamento indiano: 1234567.5 -> "₹12,34,568".
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    // últimos 3 dígitos juntos, o resto em pares
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            parts.push(&head[start..end]);
            end = start;
        }
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    if negative { format!("-₹{}", grouped) } else { format!("₹{}", grouped) }
}
