//! # Brand Repository
//!
//! Database operations for product brands.
//!
//! Brands are the parent side of the brand → product relation. Deleting a
//! brand that still has products is rejected by SQLite and surfaces as
//! [`DbError::ForeignKeyViolation`].

use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bikeshop_core::{Brand, Product};

/// Repository for brand database operations.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    /// Creates a new BrandRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    /// Inserts a brand using any executor (pool or transaction).
    pub async fn insert_with<'e, E>(executor: E, brand: &Brand) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO brand (brand_id, brand_name) VALUES (?1, ?2)")
            .bind(brand.brand_id)
            .bind(&brand.brand_name)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Inserts a new brand.
    pub async fn insert(&self, brand: &Brand) -> DbResult<()> {
        debug!(id = brand.brand_id, name = %brand.brand_name, "Inserting brand");
        Self::insert_with(&self.pool, brand).await
    }

    /// Gets a brand by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT brand_id, brand_name FROM brand WHERE brand_id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }

    /// Brands with exactly this name.
    ///
    /// Names are not unique in the schema, so this returns every match;
    /// pair it with [`Rows::one`](crate::query::Rows::one) when exactly
    /// one is expected.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT brand_id, brand_name FROM brand WHERE brand_name = ?1 ORDER BY brand_id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Lists all brands in key order.
    pub async fn list(&self) -> DbResult<Vec<Brand>> {
        let brands =
            sqlx::query_as::<_, Brand>("SELECT brand_id, brand_name FROM brand ORDER BY brand_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(brands)
    }

    /// Products made by a brand (the `brand.products` relation).
    pub async fn products(&self, brand_id: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, product_name, brand_id, category_id, model_year, list_price
            FROM product
            WHERE brand_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Deletes a brand.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - products still reference it
    /// * `Err(DbError::NotFound)` - no such brand
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting brand");
        Self::delete_with(&self.pool, id).await
    }

    /// Deletes a brand using any executor (pool or transaction).
    pub async fn delete_with<'e, E>(executor: E, id: i64) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM brand WHERE brand_id = ?1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brand")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
