//! # Catalog Repository
//!
//! Read-only queries that span several tables.
//!
//! ## Joins
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product_categories()  product ⋈ category                              │
//! │                        one row per product, name descending            │
//! │                                                                         │
//! │  product_sales()       product ⟕ order_item                            │
//! │                        one row per order line, plus one row with a     │
//! │                        NULL order for every product never sold.        │
//! │                        SQLite sorts NULLs first, so unsold products    │
//! │                        lead the list.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Every table in load order.
pub const TABLES: &[&str] = &[
    "category",
    "brand",
    "product",
    "customer",
    "store",
    "stock",
    "staff",
    "order",
    "order_item",
];

/// A product with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CatalogEntry {
    pub product_name: String,
    pub category_name: String,
    pub list_price: f64,
}

/// A product and one order it appeared in, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ProductSale {
    pub product_name: String,
    pub order_id: Option<i64>,
}

/// Row count of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// Repository for cross-table queries.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inner join of products with their categories, by product name descending.
    pub async fn product_categories(&self) -> DbResult<Vec<CatalogEntry>> {
        debug!("Joining product with category");

        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT p.product_name, c.category_name, p.list_price
            FROM product p
            JOIN category c ON c.category_id = p.category_id
            ORDER BY p.product_name DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Left outer join of products with order lines, by order then product name.
    pub async fn product_sales(&self) -> DbResult<Vec<ProductSale>> {
        debug!("Left joining product with order_item");

        let sales = sqlx::query_as::<_, ProductSale>(
            r#"
            SELECT p.product_name, oi.order_id
            FROM product p
            LEFT JOIN order_item oi ON oi.product_id = p.product_id
            ORDER BY oi.order_id, p.product_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Row counts of every table, in load order.
    pub async fn table_counts(&self) -> DbResult<Vec<TableCount>> {
        let mut counts = Vec::with_capacity(TABLES.len());

        for &table in TABLES {
            // Table names come from the fixed list above
            let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, table);
            let rows: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
            counts.push(TableCount { table, rows });
        }

        Ok(counts)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_database, seeded_database};

    #[tokio::test]
    async fn test_table_counts() {
        let db = seeded_database().await;

        let counts: Vec<_> = db
            .catalog()
            .table_counts()
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.table, c.rows))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("category", 7),
                ("brand", 9),
                ("product", 54),
                ("customer", 80),
                ("store", 3),
                ("stock", 135),
                ("staff", 10),
                ("order", 60),
                ("order_item", 151),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_database_counts() {
        let db = empty_database().await;

        let counts = db.catalog().table_counts().await.unwrap();
        assert_eq!(counts.len(), 9);
        assert!(counts.iter().all(|c| c.rows == 0));
    }

    #[tokio::test]
    async fn test_inner_join() {
        let db = seeded_database().await;

        let entries = db.catalog().product_categories().await.unwrap();
        assert_eq!(entries.len(), 54);

        assert_eq!(
            entries[0],
            CatalogEntry {
                product_name: "Trek XM700+ Lowstep - 2018".to_string(),
                category_name: "Electric Bikes".to_string(),
                list_price: 3499.99,
            }
        );

        let last = entries.last().unwrap();
        assert_eq!(last.product_name, "Electra Amsterdam Original 3i - 2015/2017");
        assert_eq!(last.category_name, "Comfort Bicycles");
        assert_eq!(last.list_price, 659.99);
    }

    #[tokio::test]
    async fn test_left_outer_join() {
        let db = seeded_database().await;

        let sales = db.catalog().product_sales().await.unwrap();
        assert_eq!(sales.len(), 155);

        let unsold: Vec<_> = sales.iter().take_while(|s| s.order_id.is_none()).collect();
        assert_eq!(unsold.len(), 4);
        assert_eq!(unsold[0].product_name, "Electra Cruiser 1 (24-Inch) - 2016");
        assert_eq!(sales.iter().filter(|s| s.order_id.is_none()).count(), 4);

        assert_eq!(
            sales[4],
            ProductSale {
                product_name: "Electra Sweet Ride 1 (20-inch) - Girl's - 2018".to_string(),
                order_id: Some(1),
            }
        );

        let last = sales.last().unwrap();
        assert_eq!(last.product_name, "Trek XM700+ Lowstep - 2018");
        assert_eq!(last.order_id, Some(60));
    }
}
