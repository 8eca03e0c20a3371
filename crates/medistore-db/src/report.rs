//! # Report Service
//!
//! One fetch from the repository, then one pure medistore-core step.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  weekly_report(today)        fetch_all_sales()      → WeeklyReport     │
//! │  recent_by_day(limit, today) fetch_recent_sales(n)  → Vec<DayGroup>    │
//! │  top_products(days, n, today) fetch_all_sales()     → Vec<ProductRanking>
//! │  day_summary(date, today)    fetch_all_sales()      → DaySummary       │
//! │  sales_summary(from, to, today) fetch_all_sales()   → RangeSummary     │
//! │  revenue_series(days, today) fetch_all_sales()      → Vec<DailyRevenue>│
//! │  delete_sale(id)             delete_sale(id)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `today` is always passed in so callers (and tests) pin the processing
//! date instead of reading the clock here.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::SalesRepository;
use medistore_core::daily::{validate_page_size, DaySummary};
use medistore_core::ranking::{self, ProductRanking};
use medistore_core::summary::{
    daily_revenue_series, summarize_range, validate_series_days, DailyRevenue, RangeSummary,
};
use medistore_core::{group_by_date_on, summarize_day, DayGroup, WeeklyReport};

/// Report operations over any [`SalesRepository`].
#[derive(Debug, Clone)]
pub struct ReportService<R> {
    repo: R,
}

impl<R: SalesRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        ReportService { repo }
    }

    /// Access to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Weekly per-product summary over the full history.
    pub async fn weekly_report(&self, today: NaiveDate) -> DbResult<WeeklyReport> {
        let sales = self.repo.fetch_all_sales().await?;
        let report = WeeklyReport::build(&sales, today);

        info!(
            sales = sales.len(),
            rows = report.rows.len(),
            weeks = report.weeks.len(),
            "Weekly report built"
        );
        Ok(report)
    }

    /// The most recent `limit` sales grouped by day.
    pub async fn recent_by_day(&self, limit: u32, today: NaiveDate) -> DbResult<Vec<DayGroup>> {
        let limit = validate_page_size(limit).map_err(|e| DbError::invalid("limit", e.to_string()))?;

        let sales = self.repo.fetch_recent_sales(limit).await?;
        let groups = group_by_date_on(&sales, today);

        debug!(sales = sales.len(), days = groups.len(), "Recent sales grouped");
        Ok(groups)
    }

    /// Best sellers over the last `days_back` days.
    pub async fn top_products(
        &self,
        days_back: u32,
        limit: usize,
        today: NaiveDate,
    ) -> DbResult<Vec<ProductRanking>> {
        let since = ranking::window_start(today, days_back);
        let sales = self.repo.fetch_all_sales().await?;
        let top = ranking::top_products(&sales, since, limit);

        debug!(since = %since, ranked = top.len(), "Top products ranked");
        Ok(top)
    }

    /// Sale count, quantity and revenue for one day.
    pub async fn day_summary(&self, date: NaiveDate, today: NaiveDate) -> DbResult<DaySummary> {
        let sales = self.repo.fetch_all_sales().await?;
        Ok(summarize_day(&sales, date, today))
    }

    /// Sale count, items sold and revenue over `start..=end`.
    pub async fn sales_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> DbResult<RangeSummary> {
        let sales = self.repo.fetch_all_sales().await?;
        let summary =
            summarize_range(&sales, start, end, today).map_err(|e| DbError::invalid("range", e.to_string()))?;

        debug!(start = %start, end = %end, sales = summary.total_sales, "Range summarized");
        Ok(summary)
    }

    /// Revenue per day for the last `days` days, oldest first.
    pub async fn revenue_series(&self, days: u32, today: NaiveDate) -> DbResult<Vec<DailyRevenue>> {
        let days = validate_series_days(days).map_err(|e| DbError::invalid("days", e.to_string()))?;

        let sales = self.repo.fetch_all_sales().await?;
        Ok(daily_revenue_series(&sales, today, days))
    }

    /// Deletes a sale.
    pub async fn delete_sale(&self, id: &str) -> DbResult<()> {
        self.repo.delete_sale(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::NewSale;
    use crate::{Database, DbConfig};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use medistore_core::{Money, SaleRecord};
    use serde_json::json;
    use tokio::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Repository fake serving fixed records, newest first.
    struct FixedSales {
        records: Mutex<Vec<SaleRecord>>,
    }

    impl FixedSales {
        fn new(value: serde_json::Value) -> Self {
            FixedSales {
                records: Mutex::new(serde_json::from_value(value).unwrap()),
            }
        }
    }

    #[async_trait]
    impl SalesRepository for FixedSales {
        async fn fetch_all_sales(&self) -> DbResult<Vec<SaleRecord>> {
            Ok(self.records.lock().await.clone())
        }

        async fn fetch_recent_sales(&self, limit: u32) -> DbResult<Vec<SaleRecord>> {
            let records = self.records.lock().await;
            Ok(records.iter().take(limit as usize).cloned().collect())
        }

        async fn delete_sale(&self, id: &str) -> DbResult<()> {
            let mut records = self.records.lock().await;
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(DbError::not_found("Sale", id));
            }
            Ok(())
        }

        async fn insert_sale(&self, _sale: &NewSale) -> DbResult<String> {
            Err(DbError::invalid("sale", "read-only fake"))
        }
    }

    fn fixture() -> FixedSales {
        FixedSales::new(json!([
            {"id": "s3", "product_id": "p2", "products": [{"name": "Panadol"}], "quantity": 1,
             "price_at_sale": "4.50", "sale_date": "2024-02-01", "created_at": "2024-02-01T15:00:00Z"},
            {"id": "s2", "product_id": "p1", "products": [{"name": "Aspirin"}], "quantity": "abc",
             "price_at_sale": null, "sale_date": "2024-02-01", "created_at": "2024-02-01T09:00:00Z"},
            {"id": "s1", "product_id": "p1", "products": [{"name": "Aspirin"}], "quantity": 5,
             "price_at_sale": "10.00", "sale_date": "2024-01-08", "created_at": "2024-01-08T10:00:00Z"}
        ]))
    }

    #[tokio::test]
    async fn test_weekly_report_from_fake() {
        let service = ReportService::new(fixture());
        let report = service.weekly_report(date(2024, 3, 1)).await.unwrap();

        assert_eq!(report.weeks.len(), 2);
        assert_eq!(report.weeks[0].week_start, date(2024, 1, 29));
        assert_eq!(report.totals.total_quantity, 6);
        assert_eq!(report.totals.total_revenue.cents(), 450 + 5000);
    }

    #[tokio::test]
    async fn test_recent_by_day_groups_and_limits() {
        let service = ReportService::new(fixture());

        let groups = service.recent_by_day(2, date(2024, 3, 1)).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key(), "2024-02-01");
        let ids: Vec<&str> = groups[0].sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s3", "s2"]);

        let err = service.recent_by_day(0, date(2024, 3, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_top_products_window() {
        let service = ReportService::new(fixture());

        let top = service.top_products(7, 10, date(2024, 2, 3)).await.unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Panadol", "Aspirin"]);
        assert_eq!(top[1].total_quantity, 0);
        assert_eq!(top[1].sale_count, 1);
    }

    #[tokio::test]
    async fn test_day_summary_and_delete() {
        let service = ReportService::new(fixture());

        let summary = service.day_summary(date(2024, 2, 1), date(2024, 3, 1)).await.unwrap();
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.total_revenue.cents(), 450);

        service.delete_sale("s3").await.unwrap();
        let summary = service.day_summary(date(2024, 2, 1), date(2024, 3, 1)).await.unwrap();
        assert_eq!(summary.sale_count, 1);

        assert!(matches!(
            service.delete_sale("s3").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_sales_summary_and_revenue_series() {
        let service = ReportService::new(fixture());

        let summary = service
            .sales_summary(date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1))
            .await
            .unwrap();
        assert_eq!(summary.total_sales, 3);
        assert_eq!(summary.total_items_sold, 6);
        assert_eq!(summary.total_revenue.cents(), 450 + 5000);

        let err = service
            .sales_summary(date(2024, 2, 2), date(2024, 2, 1), date(2024, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));

        let series = service.revenue_series(3, date(2024, 2, 2)).await.unwrap();
        let cents: Vec<i64> = series.iter().map(|d| d.revenue.cents()).collect();
        assert_eq!(cents, vec![0, 450, 0]);

        assert!(matches!(
            service.revenue_series(0, date(2024, 2, 2)).await,
            Err(DbError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_sqlite_backed_pipeline() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let aspirin = db.products().insert("Aspirin", Money::from_cents(1000)).await.unwrap();

        for (qty, day, hour) in [(2, 8, 9), (3, 10, 11)] {
            let sale = NewSale::new(&aspirin, qty, Money::from_cents(1000), date(2024, 1, day))
                .created_at(Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap());
            db.sales().insert_sale(&sale).await.unwrap();
        }

        let report = db.reports().weekly_report(date(2024, 1, 31)).await.unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].week_start, date(2024, 1, 8));
        assert_eq!(report.rows[0].product_name, "Aspirin");
        assert_eq!(report.rows[0].total_quantity, 5);
        assert_eq!(report.rows[0].total_revenue.to_plain_string(), "50.00");

        let groups = db.reports().recent_by_day(50, date(2024, 1, 31)).await.unwrap();
        let keys: Vec<String> = groups.iter().map(DayGroup::key).collect();
        assert_eq!(keys, vec!["2024-01-10", "2024-01-08"]);
    }
}
