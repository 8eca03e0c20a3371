//! # Sales Repository (SQLite)
//!
//! Reads sale history for the reports and handles the few writes the back
//! office performs.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales LEFT JOIN products                                              │
//! │       │  every column CAST(... AS TEXT)                                │
//! │       ▼                                                                 │
//! │  SaleRow { Option<String> × 7 }   ← decoding a TEXT/NULL never fails  │
//! │       │                                                                 │
//! │       │  medistore_core::lenient                                       │
//! │       ▼                                                                 │
//! │  SaleRecord  (quantity "abc" → 0, price NULL → 0, bad date → None)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Imported rows can hold anything in any column (SQLite does not enforce
//! declared types), so nothing is decoded as a number or date by sqlx.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{NewSale, SalesRepository};
use medistore_core::lenient::{parse_calendar_date, parse_timestamp, price_from_str, quantity_from_str};
use medistore_core::{ProductRef, SaleRecord};

const SELECT_SALES: &str = r#"
    SELECT
        CAST(s.id AS TEXT)            AS id,
        CAST(s.product_id AS TEXT)    AS product_id,
        CAST(p.name AS TEXT)          AS product_name,
        CAST(s.quantity AS TEXT)      AS quantity,
        CAST(s.price_at_sale AS TEXT) AS price_at_sale,
        CAST(s.sale_date AS TEXT)     AS sale_date,
        CAST(s.created_at AS TEXT)    AS created_at
    FROM sales s
    LEFT JOIN products p ON p.id = s.product_id
"#;

/// Raw sale row, every column as nullable text.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: Option<String>,
    product_id: Option<String>,
    product_name: Option<String>,
    quantity: Option<String>,
    price_at_sale: Option<String>,
    sale_date: Option<String>,
    created_at: Option<String>,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        SaleRecord {
            id: row.id.unwrap_or_default(),
            product_id: row.product_id,
            products: ProductRef::from_joined_name(row.product_name),
            quantity: row.quantity.as_deref().map(quantity_from_str).unwrap_or(0),
            price_at_sale: row.price_at_sale.as_deref().map(price_from_str).unwrap_or_default(),
            sale_date: row.sale_date.as_deref().and_then(parse_calendar_date),
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// SQLite-backed [`SalesRepository`].
#[derive(Debug, Clone)]
pub struct SqliteSalesRepository {
    pool: SqlitePool,
}

impl SqliteSalesRepository {
    /// Creates a new SqliteSalesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSalesRepository { pool }
    }

    /// Counts sale rows (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl SalesRepository for SqliteSalesRepository {
    async fn fetch_all_sales(&self) -> DbResult<Vec<SaleRecord>> {
        let sql = format!("{SELECT_SALES} ORDER BY s.sale_date DESC, s.created_at DESC");
        let rows: Vec<SaleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Fetched full sale history");
        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }

    async fn fetch_recent_sales(&self, limit: u32) -> DbResult<Vec<SaleRecord>> {
        let sql = format!("{SELECT_SALES} ORDER BY s.created_at DESC LIMIT ?1");
        let rows: Vec<SaleRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), limit, "Fetched recent sales");
        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }

    async fn delete_sale(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id = %id, "Sale deleted");
        Ok(())
    }

    async fn insert_sale(&self, sale: &NewSale) -> DbResult<String> {
        if sale.quantity <= 0 {
            return Err(DbError::invalid("quantity", "must be greater than zero"));
        }
        if sale.price_at_sale.is_negative() {
            return Err(DbError::invalid("price_at_sale", "cannot be negative"));
        }

        let id = Uuid::new_v4().to_string();
        let created_at = sale.created_at.unwrap_or_else(Utc::now);

        debug!(id = %id, product_id = ?sale.product_id, quantity = sale.quantity, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, product_id, quantity, price_at_sale, sale_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(sale.product_id.as_deref())
        .bind(sale.quantity)
        .bind(sale.price_at_sale.to_plain_string())
        .bind(sale.sale_date.format("%Y-%m-%d").to_string())
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
