//! # Order Item Repository
//!
//! Order lines, keyed by the composite `(order_id, item_id)`.

use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bikeshop_core::OrderItem;

pub(crate) const ORDER_ITEM_COLUMNS: &str =
    "order_id, item_id, product_id, quantity, list_price, discount";

/// Repository for order line database operations.
#[derive(Debug, Clone)]
pub struct OrderItemRepository {
    pool: SqlitePool,
}

impl OrderItemRepository {
    /// Creates a new OrderItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderItemRepository { pool }
    }

    /// Inserts an order line using any executor (pool or transaction).
    pub async fn insert_with<'e, E>(executor: E, item: &OrderItem) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO order_item (
                order_id, item_id, product_id, quantity, list_price, discount
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(item.order_id)
        .bind(item.item_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.list_price)
        .bind(item.discount)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a new order line.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the `(order_id, item_id)` pair exists
    /// * `Err(DbError::ForeignKeyViolation)` - unknown order or product
    pub async fn insert(&self, item: &OrderItem) -> DbResult<()> {
        debug!(order_id = item.order_id, item_id = item.item_id, "Inserting order item");
        Self::insert_with(&self.pool, item).await
    }

    /// Gets one line by its composite key.
    pub async fn get(&self, order_id: i64, item_id: i64) -> DbResult<Option<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_item WHERE order_id = ?1 AND item_id = ?2",
            ORDER_ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Lists every order line in key order.
    pub async fn list(&self) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_item ORDER BY order_id, item_id",
            ORDER_ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Lines that sold a given product.
    pub async fn for_product(&self, product_id: i64) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_item WHERE product_id = ?1 ORDER BY order_id, item_id",
            ORDER_ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes one order line.
    pub async fn delete(&self, order_id: i64, item_id: i64) -> DbResult<()> {
        debug!(order_id, item_id, "Deleting order item");

        let result = sqlx::query("DELETE FROM order_item WHERE order_id = ?1 AND item_id = ?2")
            .bind(order_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "OrderItem",
                format!("{}/{}", order_id, item_id),
            ));
        }

        Ok(())
    }
}
