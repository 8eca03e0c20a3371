//! # Top Products
//!
//! Best sellers over a trailing window, for the dashboard card and the
//! reports page.
//!
//! Ranking order: quantity sold (desc), then revenue (desc), then product
//! name (asc). Products are keyed like weekly rows, by
//! `(product_id, product_name)`, with `"Unknown"` for missing names.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::SaleRecord;
use crate::UNKNOWN_PRODUCT_NAME;

/// One product's standing in the top products list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRanking {
    pub product_id: Option<String>,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Money,
    pub sale_count: u32,
}

/// First day of a window covering the last `days_back` days up to `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use medistore_core::ranking::window_start;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(window_start(today, 30).to_string(), "2024-01-31");
/// ```
pub fn window_start(today: NaiveDate, days_back: u32) -> NaiveDate {
    today
        .checked_sub_signed(TimeDelta::days(i64::from(days_back)))
        .unwrap_or(NaiveDate::MIN)
}

/// Ranks products by units sold among sales attributed on or after `since`.
///
/// Undated sales are attributed to `since` itself and so always count.
pub fn top_products(sales: &[SaleRecord], since: NaiveDate, limit: usize) -> Vec<ProductRanking> {
    let mut rankings: Vec<ProductRanking> = Vec::new();
    let mut index: HashMap<(Option<String>, String), usize> = HashMap::new();

    for sale in sales.iter().filter(|s| s.attributed_date(since) >= since) {
        let key = (sale.product_id.clone(), sale.product_name_or(UNKNOWN_PRODUCT_NAME));
        let slot = *index.entry(key).or_insert_with_key(|(product_id, name)| {
            rankings.push(ProductRanking {
                product_id: product_id.clone(),
                product_name: name.clone(),
                total_quantity: 0,
                total_revenue: Money::zero(),
                sale_count: 0,
            });
            rankings.len() - 1
        });

        let entry = &mut rankings[slot];
        entry.total_quantity = entry.total_quantity.saturating_add(sale.quantity);
        entry.total_revenue += sale.line_total();
        entry.sale_count = entry.sale_count.saturating_add(1);
    }

    rankings.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| b.total_revenue.cmp(&a.total_revenue))
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    rankings.truncate(limit);
    rankings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<SaleRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ranking_order_and_limit() {
        let sales = records(json!([
            {"product_id": "p1", "products": {"name": "Aspirin"}, "quantity": 5, "price_at_sale": "1.00", "sale_date": "2024-02-20"},
            {"product_id": "p2", "products": {"name": "Panadol"}, "quantity": 5, "price_at_sale": "2.00", "sale_date": "2024-02-21"},
            {"product_id": "p3", "products": {"name": "Brufen"}, "quantity": 9, "price_at_sale": "0.50", "sale_date": "2024-02-22"},
            {"product_id": "p1", "products": {"name": "Aspirin"}, "quantity": 1, "price_at_sale": "1.00", "sale_date": "2024-02-23"},
            {"product_id": "p4", "products": {"name": "Flagyl"}, "quantity": 1, "price_at_sale": "1.00", "sale_date": "2024-02-23"}
        ]));

        let top = top_products(&sales, date(2024, 2, 1), 3);
        let names: Vec<&str> = top.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Brufen", "Aspirin", "Panadol"]);

        assert_eq!(top[1].total_quantity, 6);
        assert_eq!(top[1].sale_count, 2);
        assert_eq!(top[1].total_revenue.cents(), 600);
    }

    #[test]
    fn test_ties_broken_by_revenue_then_name() {
        let sales = records(json!([
            {"product_id": "b", "products": {"name": "Zinc"}, "quantity": 2, "price_at_sale": "1.00"},
            {"product_id": "a", "products": {"name": "Iron"}, "quantity": 2, "price_at_sale": "1.00"},
            {"product_id": "c", "products": {"name": "Calcium"}, "quantity": 2, "price_at_sale": "3.00"}
        ]));

        let top = top_products(&sales, date(2024, 2, 1), 10);
        let names: Vec<&str> = top.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Calcium", "Iron", "Zinc"]);
    }

    #[test]
    fn test_window_excludes_older_sales() {
        let sales = records(json!([
            {"product_id": "p1", "quantity": 100, "sale_date": "2023-12-01"},
            {"product_id": "p1", "quantity": 1, "sale_date": "2024-02-10"}
        ]));

        let since = window_start(date(2024, 3, 1), 30);
        let top = top_products(&sales, since, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].total_quantity, 1);
        assert_eq!(top[0].product_name, UNKNOWN_PRODUCT_NAME);
    }

    #[test]
    fn test_empty_and_zero_limit() {
        assert!(top_products(&[], date(2024, 1, 1), 5).is_empty());

        let sales = records(json!([{"product_id": "p1", "quantity": 1}]));
        assert!(top_products(&sales, date(2024, 1, 1), 0).is_empty());
    }
}
