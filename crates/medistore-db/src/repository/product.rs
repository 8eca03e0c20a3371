//! # Product Repository
//!
//! The catalogue rows sales join against for their display name. Reports
//! only ever read `products.name`; the writes here exist for seeding and
//! tests.

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use medistore_core::Money;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns its generated id.
    pub async fn insert(&self, name: &str, price: Money) -> DbResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::invalid("name", "product name cannot be empty"));
        }

        let id = generate_product_id();
        debug!(id = %id, name = %name, "Inserting product");

        sqlx::query("INSERT INTO products (id, name, price, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&id)
            .bind(name)
            .bind(price.to_plain_string())
            .bind(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Deletes a product. Its sales keep their rows but lose the join.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use medistore_core::Money;

    #[tokio::test]
    async fn test_insert_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();

        assert_eq!(products.count().await.unwrap(), 0);
        products.insert("Panadol 500mg", Money::from_cents(450)).await.unwrap();
        products.insert("Brufen 400mg", Money::from_cents(1200)).await.unwrap();
        assert_eq!(products.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().insert("   ", Money::zero()).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
