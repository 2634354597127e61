//! # Stock Repository
//!
//! Per-store inventory, keyed by the composite `(store_id, product_id)`.
//! A `NULL` quantity means the count is unknown, not zero.

use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bikeshop_core::Stock;

/// Repository for stock database operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Inserts a stock row using any executor (pool or transaction).
    pub async fn insert_with<'e, E>(executor: E, stock: &Stock) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO stock (store_id, product_id, quantity) VALUES (?1, ?2, ?3)")
            .bind(stock.store_id)
            .bind(stock.product_id)
            .bind(stock.quantity)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Inserts a new stock row.
    pub async fn insert(&self, stock: &Stock) -> DbResult<()> {
        debug!(
            store_id = stock.store_id,
            product_id = stock.product_id,
            "Inserting stock"
        );
        Self::insert_with(&self.pool, stock).await
    }

    /// Gets the stock of one product at one store.
    pub async fn get(&self, store_id: i64, product_id: i64) -> DbResult<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>(
            "SELECT store_id, product_id, quantity FROM stock \
             WHERE store_id = ?1 AND product_id = ?2",
        )
        .bind(store_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stock)
    }

    /// Lists every stock row in key order.
    pub async fn list(&self) -> DbResult<Vec<Stock>> {
        let stocks = sqlx::query_as::<_, Stock>(
            "SELECT store_id, product_id, quantity FROM stock ORDER BY store_id, product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stocks)
    }

    /// Stock rows of one store, by product.
    pub async fn for_store(&self, store_id: i64) -> DbResult<Vec<Stock>> {
        let stocks = sqlx::query_as::<_, Stock>(
            "SELECT store_id, product_id, quantity FROM stock \
             WHERE store_id = ?1 ORDER BY product_id",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stocks)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes one stock row.
    pub async fn delete(&self, store_id: i64, product_id: i64) -> DbResult<()> {
        debug!(store_id, product_id, "Deleting stock");

        let result = sqlx::query("DELETE FROM stock WHERE store_id = ?1 AND product_id = ?2")
            .bind(store_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Stock",
                format!("{}/{}", store_id, product_id),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_database;

    #[tokio::test]
    async fn test_get() {
        let db = seeded_database().await;

        let stock = db.stocks().get(1, 1).await.unwrap().unwrap();
        assert_eq!(stock.quantity, Some(19));
        assert!(db.stocks().get(1, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_for_store() {
        let db = seeded_database().await;

        for (store_id, rows, units) in [(1, 46, 658), (2, 45, 694), (3, 44, 535)] {
            let stocks = db.stocks().for_store(store_id).await.unwrap();
            assert_eq!(stocks.len(), rows);
            let total: i64 = stocks.iter().filter_map(|s| s.quantity).sum();
            assert_eq!(total, units);
        }
    }

    #[tokio::test]
    async fn test_null_quantity_round_trips() {
        let db = seeded_database().await;
        let unknown = Stock {
            store_id: 1,
            product_id: 2,
            quantity: None,
        };

        db.stocks().insert(&unknown).await.unwrap();
        assert_eq!(db.stocks().get(1, 2).await.unwrap(), Some(unknown));
    }

    #[tokio::test]
    async fn test_duplicate_composite_key() {
        let db = seeded_database().await;
        let again = Stock {
            store_id: 1,
            product_id: 1,
            quantity: Some(3),
        };

        let err = db.stocks().insert(&again).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.stocks().count().await.unwrap(), 135);
        assert_eq!(db.stocks().get(1, 1).await.unwrap().unwrap().quantity, Some(19));
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let db = seeded_database().await;
        let stock = Stock {
            store_id: 1,
            product_id: 99999,
            quantity: Some(1),
        };

        let err = db.stocks().insert(&stock).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert_eq!(db.stocks().count().await.unwrap(), 135);
    }
}
