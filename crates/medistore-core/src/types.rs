//! # Domain Types
//!
//! The sale record shape shared by every report, and the derived rows the
//! reports produce.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (fetched, immutable)          OUTPUT (derived, ephemeral)        │
//! │  ┌─────────────────────┐            ┌──────────────────────────┐       │
//! │  │     SaleRecord      │───weekly──►│    WeeklySummaryRow      │       │
//! │  │  ─────────────────  │            │  week_start, product,    │       │
//! │  │  id                 │            │  total_quantity/revenue  │       │
//! │  │  product_id         │            └──────────────────────────┘       │
//! │  │  products ──────────┼──┐         ┌──────────────────────────┐       │
//! │  │  quantity           │  ├─daily──►│        DayGroup          │       │
//! │  │  price_at_sale      │  │         │  date, sales (newest 1st)│       │
//! │  │  sale_date          │  │         └──────────────────────────┘       │
//! │  │  created_at         │  │                                            │
//! │  └─────────────────────┘  │         ┌──────────────────────────┐       │
//! │                           └────────►│       ProductRef         │       │
//! │                                     │  None | Single | List    │       │
//! │                                     │  | Other                 │       │
//! │                                     └──────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::lenient;
use crate::money::Money;

// =============================================================================
// Product Reference
// =============================================================================

/// One element of the product join payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductJoin {
    #[serde(default)]
    pub name: Option<String>,
}

/// The product-name payload attached to a sale by the store's join.
///
/// A one-to-many join can hand back nothing, a single object, or a list of
/// objects; older exports carry a bare name string instead. All shapes are
/// read into this union and resolved by [`ProductRef::name`] only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    /// No payload (missing field or `null`).
    #[default]
    None,
    /// `[{ "name": ... }, ...]`
    List(Vec<ProductJoin>),
    /// `{ "name": ... }`
    Single(ProductJoin),
    /// Any other JSON value; scalars are used as the name.
    Other(Value),
}

impl ProductRef {
    /// A payload carrying just this name.
    pub fn named(name: impl Into<String>) -> Self {
        ProductRef::Single(ProductJoin {
            name: Some(name.into()),
        })
    }

    /// Reads any JSON value as a payload; unknown shapes land in `Other`.
    pub fn from_value(value: &Value) -> Self {
        ProductRef::deserialize(value).unwrap_or_else(|_| ProductRef::Other(value.clone()))
    }

    /// Builds a payload from a nullable joined column.
    pub fn from_joined_name(name: Option<String>) -> Self {
        match name {
            Some(name) => ProductRef::named(name),
            None => ProductRef::None,
        }
    }

    /// Resolves the display name, or `None` when the payload has no usable
    /// name. Callers pick their own placeholder.
    ///
    /// ## Resolution
    /// - list: the first element's name
    /// - object: its name
    /// - string / number / bool: its text
    /// - anything empty or absent: `None`
    ///
    /// ## Example
    /// ```rust
    /// use medistore_core::ProductRef;
    ///
    /// let joined: ProductRef = serde_json::from_str(r#"[{"name": "Aspirin"}]"#).unwrap();
    /// assert_eq!(joined.name().as_deref(), Some("Aspirin"));
    ///
    /// let empty: ProductRef = serde_json::from_str("[]").unwrap();
    /// assert_eq!(empty.name(), None);
    /// ```
    pub fn name(&self) -> Option<String> {
        let name = match self {
            ProductRef::None => None,
            ProductRef::List(items) => items.first().and_then(|item| item.name.clone()),
            ProductRef::Single(item) => item.name.clone(),
            ProductRef::Other(value) => match value {
                Value::Array(items) => items.first().and_then(|v| v.get("name")).and_then(scalar_text),
                Value::Object(map) => map.get("name").and_then(scalar_text),
                other => scalar_text(other),
            },
        };
        name.filter(|n| !n.is_empty())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// A sale row joined with its product name, as fetched from the store.
///
/// Every field is read leniently (see [`crate::lenient`]); deserializing a
/// sale record from a JSON object never fails because of a field value or
/// an unexpected key. Field names follow the store's snake_case columns,
/// camelCase spellings are accepted, and when a record carries both the
/// snake_case key wins unless it is null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS)]
#[ts(export)]
pub struct SaleRecord {
    /// Opaque unique identifier.
    pub id: String,

    /// Product reference; only ever used as a grouping key.
    pub product_id: Option<String>,

    /// Joined product payload.
    #[ts(type = "unknown")]
    pub products: ProductRef,

    /// Units sold.
    pub quantity: i64,

    /// Unit price recorded at time of sale.
    #[serde(serialize_with = "lenient::ser_price")]
    #[ts(type = "string")]
    pub price_at_sale: Money,

    /// Calendar date the sale is attributed to.
    #[ts(as = "Option<String>")]
    pub sale_date: Option<NaiveDate>,

    /// When the record was created.
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl<'de> Deserialize<'de> for SaleRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(SaleRecord::from_fields(&fields))
    }
}

/// Looks a field up by its snake_case name, then its camelCase spelling.
fn field<'a>(fields: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    fields
        .get(name)
        .filter(|value| !value.is_null())
        .or_else(|| fields.get(alias))
        .filter(|value| !value.is_null())
}

impl SaleRecord {
    /// Builds a record from a decoded JSON object.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        SaleRecord {
            id: fields.get("id").and_then(lenient::id_from_value).unwrap_or_default(),
            product_id: field(fields, "product_id", "productId").and_then(lenient::id_from_value),
            products: field(fields, "products", "productName")
                .map(ProductRef::from_value)
                .unwrap_or_default(),
            quantity: fields.get("quantity").map(lenient::quantity_from_value).unwrap_or(0),
            price_at_sale: field(fields, "price_at_sale", "priceAtSale")
                .map(lenient::price_from_value)
                .unwrap_or_default(),
            sale_date: field(fields, "sale_date", "saleDate").and_then(lenient::calendar_date_from_value),
            created_at: field(fields, "created_at", "createdAt").and_then(lenient::timestamp_from_value),
        }
    }

    /// quantity × price_at_sale.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_at_sale.multiply_quantity(self.quantity)
    }

    /// The calendar date this sale counts towards.
    ///
    /// `sale_date`, else the UTC date of `created_at`, else `today`.
    pub fn attributed_date(&self, today: NaiveDate) -> NaiveDate {
        self.sale_date
            .or_else(|| self.created_at.map(|ts| ts.date_naive()))
            .unwrap_or(today)
    }

    /// Sort key for "most recent first" listings.
    ///
    /// `created_at`, else midnight UTC of `sale_date`.
    pub fn activity_time(&self) -> Option<DateTime<Utc>> {
        self.created_at.or_else(|| {
            self.sale_date
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
    }

    /// Resolved product name, or `placeholder` when there is none.
    pub fn product_name_or(&self, placeholder: &str) -> String {
        self.products.name().unwrap_or_else(|| placeholder.to_string())
    }
}

// =============================================================================
// Derived Rows
// =============================================================================

/// One product's sales within one week.
///
/// Unique per `(week_start, product_id, product_name)` in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklySummaryRow {
    /// Monday of the week.
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    pub product_id: Option<String>,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Money,
}

/// All sales attributed to one calendar day, newest activity first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DayGroup {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales: Vec<SaleRecord>,
}

impl DayGroup {
    /// The `YYYY-MM-DD` key of this group.
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Quantity and revenue across the day's sales.
    pub fn totals(&self) -> SalesTotals {
        SalesTotals::from_records(&self.sales)
    }
}

/// Quantity and revenue sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesTotals {
    pub total_quantity: i64,
    pub total_revenue: Money,
}

impl SalesTotals {
    /// Sums quantity and line totals over raw sale records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Self {
        records.into_iter().fold(SalesTotals::default(), |acc, sale| {
            acc.combine(SalesTotals {
                total_quantity: sale.quantity,
                total_revenue: sale.line_total(),
            })
        })
    }

    /// Sums already aggregated weekly rows.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a WeeklySummaryRow>) -> Self {
        rows.into_iter().fold(SalesTotals::default(), |acc, row| {
            acc.combine(SalesTotals {
                total_quantity: row.total_quantity,
                total_revenue: row.total_revenue,
            })
        })
    }

    /// Adds two totals, clamping at the i64 bounds.
    pub fn combine(self, other: SalesTotals) -> SalesTotals {
        SalesTotals {
            total_quantity: self.total_quantity.saturating_add(other.total_quantity),
            total_revenue: self.total_revenue + other.total_revenue,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SaleRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_product_ref_shapes() {
        let cases = [
            (json!({"products": {"name": "Aspirin"}}), Some("Aspirin")),
            (json!({"products": [{"name": "Panadol"}, {"name": "Other"}]}), Some("Panadol")),
            (json!({"products": []}), None),
            (json!({"products": [{}]}), None),
            (json!({"products": {"name": ""}}), None),
            (json!({"products": null}), None),
            (json!({}), None),
            (json!({"products": "Brufen"}), Some("Brufen")),
            (json!({"products": 42}), Some("42")),
            (json!({"products": {"name": 7}}), Some("7")),
            (json!({"productName": "Flagyl"}), Some("Flagyl")),
        ];

        for (input, expected) in cases {
            let record = parse(input.clone());
            assert_eq!(record.products.name().as_deref(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_malformed_fields_never_fail() {
        let record = parse(json!({
            "id": 17,
            "product_id": null,
            "quantity": "abc",
            "price_at_sale": null,
            "sale_date": "not a date",
            "created_at": {"oops": true}
        }));

        assert_eq!(record.id, "17");
        assert_eq!(record.product_id, None);
        assert_eq!(record.quantity, 0);
        assert!(record.price_at_sale.is_zero());
        assert_eq!(record.sale_date, None);
        assert_eq!(record.created_at, None);
        assert!(record.line_total().is_zero());
    }

    #[test]
    fn test_camel_case_aliases() {
        let record = parse(json!({
            "id": "s1",
            "productId": "p1",
            "priceAtSale": "2.50",
            "quantity": 4,
            "saleDate": "2024-01-08",
            "createdAt": "2024-01-08T10:15:00Z"
        }));

        assert_eq!(record.product_id.as_deref(), Some("p1"));
        assert_eq!(record.line_total().cents(), 1000);
        assert_eq!(record.sale_date, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_both_spellings_of_a_field() {
        let record = parse(json!({
            "productId": "camel",
            "product_id": "snake",
            "quantity": 1,
            "priceAtSale": "9.99",
            "price_at_sale": "2.00",
            "saleDate": "2024-01-09",
            "sale_date": null
        }));

        assert_eq!(record.product_id.as_deref(), Some("snake"));
        assert_eq!(record.price_at_sale.cents(), 200);
        assert_eq!(record.sale_date, NaiveDate::from_ymd_opt(2024, 1, 9));
    }

    #[test]
    fn test_unknown_keys_ignored_and_non_objects_rejected() {
        let record = parse(json!({"id": "s1", "quantity": 2, "discount": "10%", "extra": [1, 2]}));
        assert_eq!(record.quantity, 2);

        assert!(serde_json::from_value::<SaleRecord>(json!([1, 2, 3])).is_err());
        assert!(serde_json::from_value::<SaleRecord>(json!("sale")).is_err());
    }

    #[test]
    fn test_totals_saturate_on_huge_quantities() {
        let sales = vec![
            parse(json!({"quantity": "9223372036854775807", "price_at_sale": "1.00"})),
            parse(json!({"quantity": i64::MAX - 1, "price_at_sale": "1.00"})),
        ];
        let totals = SalesTotals::from_records(&sales);
        assert_eq!(totals.total_quantity, i64::MAX);
        assert_eq!(totals.total_revenue.cents(), i64::MAX);
    }

    #[test]
    fn test_attributed_date_fallbacks() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let both = parse(json!({"sale_date": "2024-01-08", "created_at": "2024-01-09T12:00:00Z"}));
        assert_eq!(both.attributed_date(today).to_string(), "2024-01-08");

        let created_only = parse(json!({"created_at": "2024-01-09T12:00:00Z"}));
        assert_eq!(created_only.attributed_date(today).to_string(), "2024-01-09");

        let neither = parse(json!({"sale_date": "??"}));
        assert_eq!(neither.attributed_date(today), today);
    }

    #[test]
    fn test_activity_time_falls_back_to_sale_date() {
        let record = parse(json!({"sale_date": "2024-01-08"}));
        let ts = record.activity_time().unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-08T00:00:00+00:00");

        assert_eq!(SaleRecord::default().activity_time(), None);
    }

    #[test]
    fn test_serialized_record_reads_back() {
        let record = parse(json!({
            "id": "s1",
            "product_id": "p1",
            "products": {"name": "Aspirin"},
            "quantity": 2,
            "price_at_sale": "10.00",
            "sale_date": "2024-01-08",
            "created_at": "2024-01-08T09:00:00Z"
        }));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["price_at_sale"], "10.00");
        assert_eq!(json["sale_date"], "2024-01-08");

        let again: SaleRecord = serde_json::from_value(json).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn test_totals_from_records_and_rows_agree() {
        let sales = vec![
            parse(json!({"quantity": 2, "price_at_sale": "1.25"})),
            parse(json!({"quantity": 3, "price_at_sale": 4})),
        ];
        let totals = SalesTotals::from_records(&sales);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.total_revenue.cents(), 250 + 1200);

        let rows = vec![WeeklySummaryRow {
            week_start: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            product_id: None,
            product_name: "x".to_string(),
            total_quantity: 5,
            total_revenue: Money::from_cents(1450),
        }];
        assert_eq!(SalesTotals::from_rows(&rows), totals);
    }
}
