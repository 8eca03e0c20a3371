//! # CSV Export
//!
//! Report tables as CSV for spreadsheets. Amounts are written as plain
//! two-decimal numbers without a currency symbol. An empty report still
//! gets its header row.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use medistore_core::ranking::ProductRanking;
use medistore_core::WeeklyReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

const WEEKLY_HEADERS: [&str; 5] = ["week_start", "product_id", "product_name", "total_quantity", "total_revenue"];
const TOP_PRODUCTS_HEADERS: [&str; 4] = ["Product", "Quantity Sold", "Revenue", "Sales Count"];

#[derive(Serialize)]
struct WeeklyCsvRow<'a> {
    week_start: String,
    product_id: Option<&'a str>,
    product_name: &'a str,
    total_quantity: i64,
    total_revenue: String,
}

#[derive(Serialize)]
struct TopProductCsvRow<'a> {
    #[serde(rename = "Product")]
    product: &'a str,
    #[serde(rename = "Quantity Sold")]
    quantity_sold: i64,
    #[serde(rename = "Revenue")]
    revenue: String,
    #[serde(rename = "Sales Count")]
    sales_count: u32,
}

/// Writes one CSV line per weekly row, newest week first.
pub fn write_weekly_csv<W: Write>(report: &WeeklyReport, writer: W) -> ExportResult<()> {
    let mut csv = headed_writer(writer, &WEEKLY_HEADERS)?;
    for row in &report.rows {
        csv.serialize(WeeklyCsvRow {
            week_start: row.week_start.format("%Y-%m-%d").to_string(),
            product_id: row.product_id.as_deref(),
            product_name: &row.product_name,
            total_quantity: row.total_quantity,
            total_revenue: row.total_revenue.to_plain_string(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the top products ranking.
pub fn write_top_products_csv<W: Write>(rankings: &[ProductRanking], writer: W) -> ExportResult<()> {
    let mut csv = headed_writer(writer, &TOP_PRODUCTS_HEADERS)?;
    for entry in rankings {
        csv.serialize(TopProductCsvRow {
            product: &entry.product_name,
            quantity_sold: entry.total_quantity,
            revenue: entry.total_revenue.to_plain_string(),
            sales_count: entry.sale_count,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// A writer that has already emitted `headers`; rows are then serialized
/// without serde's own header pass.
fn headed_writer<W: Write>(writer: W, headers: &[&str]) -> ExportResult<csv::Writer<W>> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(headers)?;
    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use medistore_core::{Money, WeeklySummaryRow};

    #[test]
    fn test_weekly_csv() {
        let report = WeeklyReport::from_rows(vec![
            WeeklySummaryRow {
                week_start: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                product_id: Some("p1".to_string()),
                product_name: "Aspirin, 75mg".to_string(),
                total_quantity: 5,
                total_revenue: Money::from_cents(5000),
            },
            WeeklySummaryRow {
                week_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                product_id: None,
                product_name: "Unknown".to_string(),
                total_quantity: 0,
                total_revenue: Money::zero(),
            },
        ]);

        let mut out = Vec::new();
        write_weekly_csv(&report, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "week_start,product_id,product_name,total_quantity,total_revenue\n\
             2024-01-08,p1,\"Aspirin, 75mg\",5,50.00\n\
             2024-01-01,,Unknown,0,0.00\n"
        );
    }

    #[test]
    fn test_top_products_csv_headers() {
        let rankings = vec![ProductRanking {
            product_id: Some("p2".to_string()),
            product_name: "Panadol".to_string(),
            total_quantity: 12,
            total_revenue: Money::from_cents(5400),
            sale_count: 4,
        }];

        let mut out = Vec::new();
        write_top_products_csv(&rankings, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Product,Quantity Sold,Revenue,Sales Count"));
        assert_eq!(lines.next(), Some("Panadol,12,54.00,4"));
    }

    #[test]
    fn test_empty_export_keeps_header_row() {
        let mut out = Vec::new();
        write_top_products_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Product,Quantity Sold,Revenue,Sales Count\n");

        let mut out = Vec::new();
        write_weekly_csv(&WeeklyReport::from_rows(Vec::new()), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "week_start,product_id,product_name,total_quantity,total_revenue\n"
        );
    }
}
