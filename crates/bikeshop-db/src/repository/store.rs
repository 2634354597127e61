//! # Store Repository
//!
//! Database operations for stores. A store is the parent of its staff,
//! its orders and its stock rows.

use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use super::order::ORDER_COLUMNS;
use super::staff::STAFF_COLUMNS;
use crate::error::{DbError, DbResult};
use bikeshop_core::{NewStore, Order, Staff, Stock, Store};

const STORE_COLUMNS: &str = "store_id, store_name, phone, email, street, city, state, zip_code";

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Inserts a store using any executor and returns the assigned ID.
    pub async fn insert_with<'e, E>(executor: E, store: &NewStore) -> DbResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO store (store_name, phone, email, street, city, state, zip_code)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&store.store_name)
        .bind(&store.phone)
        .bind(&store.email)
        .bind(&store.street)
        .bind(&store.city)
        .bind(&store.state)
        .bind(&store.zip_code)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a new store and returns it with its assigned ID.
    pub async fn insert(&self, store: &NewStore) -> DbResult<Store> {
        debug!(name = %store.store_name, "Inserting store");
        let id = Self::insert_with(&self.pool, store).await?;
        Ok(store.clone().with_id(id))
    }

    /// Gets a store by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Store>> {
        let sql = format!("SELECT {} FROM store WHERE store_id = ?1", STORE_COLUMNS);
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(store)
    }

    /// Stores with exactly this name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<Store>> {
        let sql = format!(
            "SELECT {} FROM store WHERE store_name = ?1 ORDER BY store_id",
            STORE_COLUMNS
        );
        let stores = sqlx::query_as::<_, Store>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;

        Ok(stores)
    }

    /// Lists all stores in key order.
    pub async fn list(&self) -> DbResult<Vec<Store>> {
        let sql = format!("SELECT {} FROM store ORDER BY store_id", STORE_COLUMNS);
        let stores = sqlx::query_as::<_, Store>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(stores)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes a store. Rejected while staff, orders or stock reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting store");

        let result = sqlx::query("DELETE FROM store WHERE store_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    // =========================================================================
    // Relations
    // =========================================================================

    /// Staff working at a store (`store.staff`).
    pub async fn staff(&self, store_id: i64) -> DbResult<Vec<Staff>> {
        let sql = format!(
            "SELECT {} FROM staff WHERE store_id = ?1 ORDER BY staff_id",
            STAFF_COLUMNS
        );
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(staff)
    }

    /// Orders taken at a store (`store.orders`).
    pub async fn orders(&self, store_id: i64) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"SELECT {} FROM "order" WHERE store_id = ?1 ORDER BY order_id"#,
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Stock held at a store (`store.stocks`).
    pub async fn stocks(&self, store_id: i64) -> DbResult<Vec<Stock>> {
        let stocks = sqlx::query_as::<_, Stock>(
            "SELECT store_id, product_id, quantity FROM stock \
             WHERE store_id = ?1 ORDER BY product_id",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stocks)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::query::Rows;
    use crate::testing::{empty_database, seeded_database};
    use bikeshop_core::fixtures;

    #[tokio::test]
    async fn test_insert_assigns_ids_in_order() {
        let db = empty_database().await;

        for (expected, store) in (1..).zip(fixtures::stores()) {
            let stored = db.stores().insert(&store).await.unwrap();
            assert_eq!(stored.store_id, expected);
        }

        let rowlett = db.stores().get_by_id(3).await.unwrap().unwrap();
        assert_eq!(rowlett.store_name, "Rowlett Bikes");
        assert_eq!(rowlett.state.as_deref(), Some("TX"));
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let db = seeded_database().await;

        let baldwin = Rows::from(db.stores().find_by_name("Baldwin Bikes").await.unwrap())
            .one()
            .unwrap();
        assert_eq!(baldwin.store_id, 2);
    }

    #[tokio::test]
    async fn test_store_relations() {
        let db = seeded_database().await;
        let stores = db.stores();

        let staff: Vec<_> = stores
            .staff(1)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.staff_id)
            .collect();
        assert_eq!(staff, vec![1, 2, 3, 4]);

        assert_eq!(stores.orders(1).await.unwrap().len(), 21);
        assert_eq!(stores.orders(2).await.unwrap().len(), 18);
        assert_eq!(stores.orders(3).await.unwrap().len(), 21);

        assert_eq!(stores.stocks(2).await.unwrap().len(), 45);
    }

    #[tokio::test]
    async fn test_delete_store_with_staff_is_rejected() {
        let db = seeded_database().await;

        let err = db.stores().delete(1).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
    }
}
