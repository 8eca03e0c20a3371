//! # Plain-Text Rendering
//!
//! Fixed-width tables for the terminal. Column widths are constant; long
//! product names are cut with an ellipsis so columns stay aligned.

use std::fmt::Write;

use medistore_core::daily::DaySummary;
use medistore_core::format::{format_currency, format_day_header, format_time};
use medistore_core::ranking::ProductRanking;
use medistore_core::summary::{DailyRevenue, RangeSummary};
use medistore_core::{DayGroup, WeeklyReport};

const NAME_WIDTH: usize = 28;
const BAR_WIDTH: usize = 30;

/// Shared table settings.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub store_name: String,
    pub currency_symbol: String,
}

impl Renderer {
    pub fn new(store_name: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Renderer {
            store_name: store_name.into(),
            currency_symbol: currency_symbol.into(),
        }
    }

    fn money(&self, amount: medistore_core::Money) -> String {
        format_currency(amount, &self.currency_symbol)
    }

    fn title(&self, out: &mut String, title: &str) {
        let heading = format!("{} - {}", self.store_name, title);
        let _ = writeln!(out, "{heading}");
        let _ = writeln!(out, "{}", "=".repeat(heading.chars().count()));
    }

    /// Weekly report, one block per week with a subtotal line.
    pub fn weekly(&self, report: &WeeklyReport) -> String {
        let mut out = String::new();
        self.title(&mut out, "Weekly Sales");

        if report.is_empty() {
            out.push_str("No sales recorded.\n");
            return out;
        }

        for week in &report.weeks {
            let _ = writeln!(out);
            let key = week.week_start.format("%Y-%m-%d").to_string();
            let _ = writeln!(out, "Week of {}", format_day_header(&key));
            let _ = writeln!(out, "  {:<NAME_WIDTH$} {:>8} {:>18}", "Product", "Qty", "Revenue");

            for row in report.rows.iter().filter(|r| r.week_start == week.week_start) {
                let _ = writeln!(
                    out,
                    "  {:<NAME_WIDTH$} {:>8} {:>18}",
                    fit(&row.product_name),
                    row.total_quantity,
                    self.money(row.total_revenue)
                );
            }

            let _ = writeln!(
                out,
                "  {:<NAME_WIDTH$} {:>8} {:>18}",
                "Week total",
                week.total_quantity,
                self.money(week.total_revenue)
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total: {} units, {}",
            report.totals.total_quantity,
            self.money(report.totals.total_revenue)
        );
        out
    }

    /// Recent sales grouped by day, newest first.
    pub fn recent(&self, groups: &[DayGroup]) -> String {
        let mut out = String::new();
        self.title(&mut out, "Recent Sales");

        if groups.is_empty() {
            out.push_str("No sales recorded.\n");
            return out;
        }

        for group in groups {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", format_day_header(&group.key()));
            let _ = writeln!(
                out,
                "  {:<5}  {:<NAME_WIDTH$} {:>6} {:>18}",
                "Time", "Product", "Qty", "Total"
            );

            for sale in &group.sales {
                let _ = writeln!(
                    out,
                    "  {:<5}  {:<NAME_WIDTH$} {:>6} {:>18}",
                    format_time(sale.created_at),
                    fit(&DayGroup::display_name(sale)),
                    sale.quantity,
                    self.money(sale.line_total())
                );
            }

            let totals = group.totals();
            let _ = writeln!(
                out,
                "  {:<5}  {:<NAME_WIDTH$} {:>6} {:>18}",
                "",
                "Day total",
                totals.total_quantity,
                self.money(totals.total_revenue)
            );
        }
        out
    }

    /// Top products ranking.
    pub fn top(&self, rankings: &[ProductRanking], days_back: u32) -> String {
        let mut out = String::new();
        self.title(&mut out, &format!("Top Products (last {days_back} days)"));

        if rankings.is_empty() {
            out.push_str("No sales in this period.\n");
            return out;
        }

        let _ = writeln!(
            out,
            "{:>3}  {:<NAME_WIDTH$} {:>8} {:>18} {:>6}",
            "#", "Product", "Qty", "Revenue", "Sales"
        );
        for (rank, entry) in rankings.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:<NAME_WIDTH$} {:>8} {:>18} {:>6}",
                rank + 1,
                fit(&entry.product_name),
                entry.total_quantity,
                self.money(entry.total_revenue),
                entry.sale_count
            );
        }
        out
    }

    /// End-of-day summary card.
    pub fn day(&self, summary: &DaySummary) -> String {
        let mut out = String::new();
        self.title(&mut out, "Daily Sales");

        let key = summary.date.format("%Y-%m-%d").to_string();
        let _ = writeln!(out, "{}", format_day_header(&key));
        let _ = writeln!(out, "  Sales:          {}", summary.sale_count);
        let _ = writeln!(out, "  Units sold:     {}", summary.total_quantity);
        let _ = writeln!(out, "  Total revenue:  {}", self.money(summary.total_revenue));
        out
    }

    /// Sales summary card for a date range.
    pub fn summary(&self, summary: &RangeSummary) -> String {
        let mut out = String::new();
        self.title(&mut out, "Sales Summary");

        let _ = writeln!(out, "{} to {}", summary.start, summary.end);
        let _ = writeln!(out, "  Total sales:    {}", summary.total_sales);
        let _ = writeln!(out, "  Items sold:     {}", summary.total_items_sold);
        let _ = writeln!(out, "  Total revenue:  {}", self.money(summary.total_revenue));
        out
    }

    /// Revenue per day with a bar scaled to the best day.
    pub fn revenue(&self, series: &[DailyRevenue]) -> String {
        let mut out = String::new();
        self.title(&mut out, &format!("Revenue (last {} days)", series.len()));

        let best = series.iter().map(|d| d.revenue.cents()).max().unwrap_or(0);
        for day in series {
            let _ = writeln!(
                out,
                "{:<6} {:>18}  {}",
                day.date.format("%b %d").to_string(),
                self.money(day.revenue),
                bar(day.revenue.cents(), best)
            );
        }
        out
    }
}

/// `#` bar proportional to `value / best`; empty for non-positive values.
fn bar(value: i64, best: i64) -> String {
    if value <= 0 || best <= 0 {
        return String::new();
    }
    let len = (value as f64 / best as f64 * BAR_WIDTH as f64).ceil() as usize;
    "#".repeat(len.clamp(1, BAR_WIDTH))
}

/// Cuts a name to the column width.
fn fit(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(NAME_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}
