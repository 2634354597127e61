//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Filtering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method                  SQL predicate                   Order          │
//! │  ──────────────────────  ──────────────────────────────  ────────────── │
//! │  by_category_and_year    category_id = ? AND             price desc     │
//! │                          model_year = ?                                 │
//! │  name_like               product_name LIKE ?             price desc     │
//! │  price_in                list_price IN (?, ?, ...)       price asc      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Ties are broken by `product_id` so results are deterministic.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bikeshop_core::{Brand, Category, NewProduct, Product};

const PRODUCT_COLUMNS: &str =
    "product_id, product_name, brand_id, category_id, model_year, list_price";

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

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a product with an explicit ID using any executor.
    pub async fn insert_with<'e, E>(executor: E, product: &Product) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO product (
                product_id, product_name, brand_id, category_id, model_year, list_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(product.product_id)
        .bind(&product.product_name)
        .bind(product.brand_id)
        .bind(product.category_id)
        .bind(product.model_year)
        .bind(product.list_price)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a product with an explicit ID.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.product_id, "Inserting product");
        Self::insert_with(&self.pool, product).await
    }

    /// Inserts a product and lets SQLite assign its ID.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the stored product with its new ID
    /// * `Err(DbError::ForeignKeyViolation)` - unknown brand or category
    pub async fn create(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.product_name, "Creating product");

        let result = sqlx::query(
            r#"
            INSERT INTO product (product_name, brand_id, category_id, model_year, list_price)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.product_name)
        .bind(product.brand_id)
        .bind(product.category_id)
        .bind(product.model_year)
        .bind(product.list_price)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            product_name: product.product_name.clone(),
            brand_id: product.brand_id,
            category_id: product.category_id,
            model_year: product.model_year,
            list_price: product.list_price,
        })
    }

    /// Deletes a product.
    ///
    /// Fails with `ForeignKeyViolation` while stock or order lines reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM product WHERE product_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM product WHERE product_id = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists all products in key order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM product ORDER BY product_id", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// The category a product belongs to (`product.category`).
    pub async fn category_of(&self, product_id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.category_id, c.category_name
            FROM product p
            JOIN category c ON c.category_id = p.category_id
            WHERE p.product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// The brand a product belongs to (`product.brand`).
    pub async fn brand_of(&self, product_id: i64) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(
            r#"
            SELECT b.brand_id, b.brand_name
            FROM product p
            JOIN brand b ON b.brand_id = p.brand_id
            WHERE p.product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }

    /// Products of one category and model year, most expensive first.
    pub async fn by_category_and_year(
        &self,
        category_id: i64,
        model_year: i64,
    ) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM product WHERE category_id = ?1 AND model_year = ?2 \
             ORDER BY list_price DESC, product_id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .bind(model_year)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Products whose name matches a SQL `LIKE` pattern, most expensive first.
    ///
    /// SQLite's `LIKE` is case-insensitive for ASCII.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let cruisers = db.products().name_like("%Cruiser%").await?;
    /// ```
    pub async fn name_like(&self, pattern: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM product WHERE product_name LIKE ?1 \
             ORDER BY list_price DESC, product_id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Products listed at any of the given prices, cheapest first.
    pub async fn price_in(&self, prices: &[f64]) -> DbResult<Vec<Product>> {
        if prices.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM product WHERE list_price IN (",
            PRODUCT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for price in prices {
            separated.push_bind(*price);
        }
        separated.push_unseparated(") ORDER BY list_price, product_id");

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::testing::seeded_database;
    use bikeshop_core::NewProduct;

    fn new_product(brand_id: i64, category_id: i64) -> NewProduct {
        NewProduct {
            product_name: "Trek Checkpoint ALR 5 - 2019".to_string(),
            brand_id,
            category_id,
            model_year: 2019,
            list_price: 1999.99,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let db = seeded_database().await;

        let product = db.products().create(&new_product(9, 4)).await.unwrap();
        assert_eq!(product.product_id, 55);
        assert_eq!(db.products().count().await.unwrap(), 55);
    }

    #[tokio::test]
    async fn test_unknown_brand_is_rejected() {
        let db = seeded_database().await;

        let err = db.products().create(&new_product(99999, 4)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.products().count().await.unwrap(), 54);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let db = seeded_database().await;

        let err = db.products().create(&new_product(9, 99999)).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
    }

    #[tokio::test]
    async fn test_relations() {
        let db = seeded_database().await;

        let category = db.products().category_of(42).await.unwrap().unwrap();
        assert_eq!(category.category_name, "Electric Bikes");

        let brand = db.products().brand_of(30).await.unwrap().unwrap();
        assert_eq!(brand.brand_name, "Strider");

        assert!(db.products().brand_of(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_category_and_year() {
        let db = seeded_database().await;

        let products = db.products().by_category_and_year(1, 2018).await.unwrap();
        assert_eq!(products.len(), 9);

        let first = &products[0];
        assert_eq!(first.product_id, 33);
        assert_eq!(first.product_name, "Trek Superfly 24 - 2017/2018");
        assert_eq!(first.list_price, 489.99);
        assert_eq!(products[1].product_id, 54);

        let last = products.last().unwrap();
        assert_eq!(last.product_id, 30);
        assert_eq!(last.list_price, 89.99);
    }

    #[tokio::test]
    async fn test_name_like() {
        let db = seeded_database().await;

        let products = db.products().name_like("%Cruiser%").await.unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].product_id, 39);
        assert_eq!(products[0].list_price, 639.99);
        assert_eq!(products[4].product_id, 21);
        assert_eq!(products[4].product_name, "Electra Cruiser 1 (24-Inch) - 2016");
    }

    #[tokio::test]
    async fn test_price_in() {
        let db = seeded_database().await;

        let products = db.products().price_in(&[89.99, 109.99, 159.99]).await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Strider Classic 12 Balance Bike - 2018",
                "Sun Bicycles Lil Kitt'n - 2017",
                "Haro Downtown 16 - 2017",
                "Trek Kickster - 2018",
            ]
        );

        assert!(db.products().price_in(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_sold_product_is_rejected() {
        let db = seeded_database().await;

        let err = db.products().delete(30).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
    }
}
