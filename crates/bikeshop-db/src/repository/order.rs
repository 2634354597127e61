//! # Order Repository
//!
//! Database operations for orders.
//!
//! The table is named `order`, a reserved word, so every statement here
//! quotes it as `"order"`.
//!
//! ## Order Totals
//! ```text
//! line total  = quantity × list_price × (1 − discount)
//! order total = Σ line totals of the order's items
//! ```

use serde::Serialize;
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;

use super::order_item::ORDER_ITEM_COLUMNS;
use crate::error::{DbError, DbResult};
use bikeshop_core::{Customer, Order, OrderItem, OrderStatus};

pub(crate) const ORDER_COLUMNS: &str = "order_id, customer_id, order_status, order_date, \
     required_date, shipped_date, store_id, staff_id";

/// Discounted total of one order.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderTotal {
    pub order_id: i64,
    pub total: f64,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order using any executor (pool or transaction).
    pub async fn insert_with<'e, E>(executor: E, order: &Order) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO "order" (
                order_id, customer_id, order_status, order_date,
                required_date, shipped_date, store_id, staff_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(order.order_id)
        .bind(order.customer_id)
        .bind(order.order_status)
        .bind(order.order_date)
        .bind(order.required_date)
        .bind(order.shipped_date)
        .bind(order.store_id)
        .bind(order.staff_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a new order.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - unknown customer, store or staff
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(id = order.order_id, status = ?order.order_status, "Inserting order");
        Self::insert_with(&self.pool, order).await
    }

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let sql = format!(r#"SELECT {} FROM "order" WHERE order_id = ?1"#, ORDER_COLUMNS);
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Lists all orders in key order.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let sql = format!(r#"SELECT {} FROM "order" ORDER BY order_id"#, ORDER_COLUMNS);
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "order""#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes an order. Rejected while it still has items.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting order");

        let result = sqlx::query(r#"DELETE FROM "order" WHERE order_id = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Line items of an order (`order.items`), in item order.
    pub async fn items(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_item WHERE order_id = ?1 ORDER BY item_id",
            ORDER_ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// The customer who placed an order (`order.customer`).
    ///
    /// `None` when the order does not exist or has no customer.
    pub async fn customer_of(&self, order_id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT c.customer_id, c.first_name, c.last_name, c.phone, c.email,
                   c.street, c.city, c.state, c.zip_code
            FROM "order" o
            JOIN customer c ON c.customer_id = o.customer_id
            WHERE o.order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Orders in a given status, in key order.
    pub async fn by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"SELECT {} FROM "order" WHERE order_status = ?1 ORDER BY order_id"#,
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Orders that have not shipped yet (`shipped_date IS NULL`).
    pub async fn unshipped(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"SELECT {} FROM "order" WHERE shipped_date IS NULL ORDER BY order_id"#,
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Discounted total of an order; `0.0` when it has no items.
    pub async fn total(&self, order_id: i64) -> DbResult<f64> {
        let total: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity * list_price * (1 - discount)), 0.0)
            FROM order_item
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Totals of every order that has items, largest first.
    pub async fn totals(&self) -> DbResult<Vec<OrderTotal>> {
        let totals = sqlx::query_as::<_, OrderTotal>(
            r#"
            SELECT order_id, SUM(quantity * list_price * (1 - discount)) AS total
            FROM order_item
            GROUP BY order_id
            ORDER BY total DESC, order_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_database;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_get_by_id_decodes_dates_and_status() {
        let db = seeded_database().await;

        let order = db.orders().get_by_id(2).await.unwrap().unwrap();
        assert_eq!(
            order,
            Order {
                order_id: 2,
                customer_id: Some(74),
                order_status: OrderStatus::Completed,
                order_date: date(2016, 2, 9),
                required_date: date(2016, 2, 12),
                shipped_date: Some(date(2016, 2, 11)),
                store_id: 1,
                staff_id: 3,
            }
        );
        assert!(order.is_shipped());

        let pending = db.orders().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(pending.shipped_date, None);
    }

    #[tokio::test]
    async fn test_by_status() {
        let db = seeded_database().await;
        let orders = db.orders();

        assert_eq!(orders.by_status(OrderStatus::Pending).await.unwrap().len(), 5);
        assert_eq!(orders.by_status(OrderStatus::Processing).await.unwrap().len(), 16);
        assert_eq!(orders.by_status(OrderStatus::Rejected).await.unwrap().len(), 5);
        assert_eq!(orders.by_status(OrderStatus::Completed).await.unwrap().len(), 34);
        assert_eq!(orders.unshipped().await.unwrap().len(), 26);
    }

    #[tokio::test]
    async fn test_items_and_customer() {
        let db = seeded_database().await;

        let items = db.orders().items(1).await.unwrap();
        let products: Vec<_> = items.iter().map(|i| i.product_id).collect();
        assert_eq!(products, vec![37, 50, 1, 42]);

        let customer = db.orders().customer_of(1).await.unwrap().unwrap();
        assert_eq!(customer.customer_id, 56);
        assert!(db.orders().customer_of(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_totals() {
        let db = seeded_database().await;

        let total = db.orders().total(1).await.unwrap();
        assert!((total - 7748.7764).abs() < 0.005, "got {}", total);
        assert_eq!(db.orders().total(999).await.unwrap(), 0.0);

        let totals = db.orders().totals().await.unwrap();
        assert_eq!(totals.len(), 60);
        assert_eq!(totals[0].order_id, 39);
        assert!((totals[0].total - 16871.94).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_delete_order_with_items_is_rejected() {
        let db = seeded_database().await;

        let err = db.orders().delete(1).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert_eq!(db.orders().count().await.unwrap(), 60);
    }
}
