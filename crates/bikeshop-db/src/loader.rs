//! # Fixture Loader
//!
//! Populates an empty database from the literal tables in
//! [`bikeshop_core::fixtures`] and the CSV files in a data directory.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FixtureLoader::load_all                            │
//! │                                                                         │
//! │   1. categories     literal                                            │
//! │   2. brands         literal                                            │
//! │   3. products       products.csv      → category, brand                │
//! │   4. customers      customers.csv                                      │
//! │   5. stores         literal                                            │
//! │   6. stocks         stocks.csv        → store, product                 │
//! │   7. staff          literal           → store, staff                   │
//! │   8. orders         orders.csv        → customer, store, staff         │
//! │   9. order_items    order_items.csv   → order, product                 │
//! │                                                                         │
//! │   Each table: parse + validate every row, then BEGIN, INSERT…, COMMIT  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A table is all-or-nothing: a bad row is reported before anything is
//! written, and a constraint violation rolls the table's transaction back.
//! Tables committed before the failure stay loaded.
//!
//! ## CSV Format
//! No header row, positional columns, surrounding whitespace trimmed, the
//! literal `NULL` for an absent value, dates as `YYYYMMDD`.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sqlx::{Sqlite, Transaction};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::brand::BrandRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;
use crate::repository::order_item::OrderItemRepository;
use crate::repository::product::ProductRepository;
use crate::repository::staff::StaffRepository;
use crate::repository::stock::StockRepository;
use crate::repository::store::StoreRepository;
use bikeshop_core::fixtures::{
    self, CustomerRecord, OrderItemRecord, OrderRecord, ProductRecord, StockRecord,
    CUSTOMERS_FILE, ORDERS_FILE, ORDER_ITEMS_FILE, PRODUCTS_FILE, STOCKS_FILE,
};
use bikeshop_core::{
    validation, CoreError, NewCustomer, Order, OrderItem, Product, Stock, ValidationError,
};

// =============================================================================
// Errors
// =============================================================================

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The fixture file could not be opened.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed CSV, or a field has the wrong type.
    #[error("Malformed CSV in {file}: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A row parsed but failed validation. For literal tables `file` is
    /// the table name.
    #[error("{file} line {line}: {source}")]
    Fixture {
        file: &'static str,
        line: u64,
        #[source]
        source: CoreError,
    },

    /// The database rejected the data.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type for fixture loading.
pub type LoadResult<T> = Result<T, LoadError>;

// =============================================================================
// Loader
// =============================================================================

/// Loads fixtures into a [`Database`], one table per transaction.
#[derive(Debug, Clone)]
pub struct FixtureLoader {
    db: Database,
    data_dir: PathBuf,
}

impl FixtureLoader {
    /// Creates a loader reading CSV files from `data_dir`.
    pub fn new(db: Database, data_dir: impl Into<PathBuf>) -> Self {
        FixtureLoader {
            db,
            data_dir: data_dir.into(),
        }
    }

    /// The directory CSV fixtures are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads every table in dependency order.
    ///
    /// ## Returns
    /// Total number of rows inserted.
    pub async fn load_all(&self) -> LoadResult<usize> {
        info!(data_dir = %self.data_dir.display(), "Loading fixtures");

        let mut total = 0;
        total += self.load_categories().await?;
        total += self.load_brands().await?;
        total += self.load_products().await?;
        total += self.load_customers().await?;
        total += self.load_stores().await?;
        total += self.load_stocks().await?;
        total += self.load_staff().await?;
        total += self.load_orders().await?;
        total += self.load_order_items().await?;

        info!(rows = total, "Fixtures loaded");
        Ok(total)
    }

    pub async fn load_categories(&self) -> LoadResult<usize> {
        let categories = fixtures::categories();
        check_literal("category", &categories, validation::validate_category)?;
        let mut tx = self.begin().await?;
        for category in &categories {
            CategoryRepository::insert_with(&mut *tx, category).await?;
        }
        commit(tx, "category", categories.len()).await
    }

    pub async fn load_brands(&self) -> LoadResult<usize> {
        let brands = fixtures::brands();
        check_literal("brand", &brands, validation::validate_brand)?;
        let mut tx = self.begin().await?;
        for brand in &brands {
            BrandRepository::insert_with(&mut *tx, brand).await?;
        }
        commit(tx, "brand", brands.len()).await
    }

    pub async fn load_products(&self) -> LoadResult<usize> {
        let products: Vec<Product> = self.read_fixture::<ProductRecord, _>(PRODUCTS_FILE)?;
        let mut tx = self.begin().await?;
        for product in &products {
            ProductRepository::insert_with(&mut *tx, product).await?;
        }
        commit(tx, "product", products.len()).await
    }

    /// Customer IDs are assigned by the database in file order.
    pub async fn load_customers(&self) -> LoadResult<usize> {
        let customers: Vec<NewCustomer> = self.read_fixture::<CustomerRecord, _>(CUSTOMERS_FILE)?;
        let mut tx = self.begin().await?;
        for customer in &customers {
            CustomerRepository::insert_with(&mut *tx, customer).await?;
        }
        commit(tx, "customer", customers.len()).await
    }

    /// Store IDs are assigned by the database in list order.
    pub async fn load_stores(&self) -> LoadResult<usize> {
        let stores = fixtures::stores();
        check_literal("store", &stores, validation::validate_store)?;
        let mut tx = self.begin().await?;
        for store in &stores {
            StoreRepository::insert_with(&mut *tx, store).await?;
        }
        commit(tx, "store", stores.len()).await
    }

    pub async fn load_stocks(&self) -> LoadResult<usize> {
        let stocks: Vec<Stock> = self.read_fixture::<StockRecord, _>(STOCKS_FILE)?;
        let mut tx = self.begin().await?;
        for stock in &stocks {
            StockRepository::insert_with(&mut *tx, stock).await?;
        }
        commit(tx, "stock", stocks.len()).await
    }

    /// Managers are listed before their reports, so the self-reference
    /// always points at a row that already exists.
    pub async fn load_staff(&self) -> LoadResult<usize> {
        let staff = fixtures::staff();
        check_literal("staff", &staff, validation::validate_staff)?;
        let mut tx = self.begin().await?;
        for member in &staff {
            StaffRepository::insert_with(&mut *tx, member).await?;
        }
        commit(tx, "staff", staff.len()).await
    }

    pub async fn load_orders(&self) -> LoadResult<usize> {
        let orders: Vec<Order> = self.read_fixture::<OrderRecord, _>(ORDERS_FILE)?;
        let mut tx = self.begin().await?;
        for order in &orders {
            OrderRepository::insert_with(&mut *tx, order).await?;
        }
        commit(tx, "order", orders.len()).await
    }

    pub async fn load_order_items(&self) -> LoadResult<usize> {
        let items: Vec<OrderItem> = self.read_fixture::<OrderItemRecord, _>(ORDER_ITEMS_FILE)?;
        let mut tx = self.begin().await?;
        for item in &items {
            OrderItemRepository::insert_with(&mut *tx, item).await?;
        }
        commit(tx, "order_item", items.len()).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn begin(&self) -> LoadResult<Transaction<'static, Sqlite>> {
        self.db
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()).into())
    }

    /// Reads and validates every row of a fixture file.
    fn read_fixture<R, T>(&self, file: &'static str) -> LoadResult<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = CoreError>,
    {
        let path = self.data_dir.join(file);
        debug!(path = %path.display(), "Reading fixture file");

        let handle = File::open(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(handle);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|source| LoadError::Csv { file, source })?;
            let line = record.position().map_or(0, |p| p.line());

            let raw: R = record
                .deserialize(None)
                .map_err(|source| LoadError::Csv { file, source })?;
            let row = T::try_from(raw).map_err(|source| LoadError::Fixture { file, line, source })?;
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Validates literal rows; `line` in the error is the 1-based row index.
fn check_literal<T>(
    table: &'static str,
    rows: &[T],
    validate: fn(&T) -> Result<(), ValidationError>,
) -> LoadResult<()> {
    for (index, row) in rows.iter().enumerate() {
        validate(row).map_err(|e| LoadError::Fixture {
            file: table,
            line: index as u64 + 1,
            source: CoreError::invalid(table, e),
        })?;
    }
    Ok(())
}

async fn commit(tx: Transaction<'static, Sqlite>, table: &str, rows: usize) -> LoadResult<usize> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    info!(table, rows, "Loaded table");
    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_database, fixture_dir};
    use std::fs;
    use tempfile::TempDir;

    fn data_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    /// A loader over `files` with the literal parent tables already loaded.
    async fn loader_with_catalog(dir: &TempDir) -> FixtureLoader {
        let loader = FixtureLoader::new(empty_database().await, dir.path());
        loader.load_categories().await.unwrap();
        loader.load_brands().await.unwrap();
        loader
    }

    #[tokio::test]
    async fn test_load_all_bundled_fixtures() {
        let db = empty_database().await;
        let loader = FixtureLoader::new(db.clone(), fixture_dir());

        let total = loader.load_all().await.unwrap();
        assert_eq!(total, 7 + 9 + 54 + 80 + 3 + 135 + 10 + 60 + 151);
        assert_eq!(db.order_items().count().await.unwrap(), 151);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = data_dir(&[]);
        let loader = loader_with_catalog(&dir).await;

        let err = loader.load_products().await.unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with(PRODUCTS_FILE)),
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_row_names_line() {
        let dir = data_dir(&[(
            PRODUCTS_FILE,
            "1,Trek 820 - 2016,9,6,2016,379.99\n2,Ritchey Timberwolf,5,6,1800,749.99\n",
        )]);
        let loader = loader_with_catalog(&dir).await;

        let err = loader.load_products().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Fixture {
                file: PRODUCTS_FILE,
                line: 2,
                ..
            }
        ));
        // Nothing from the file was written
        assert_eq!(loader.db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_numeric_field() {
        let dir = data_dir(&[(PRODUCTS_FILE, "one,Trek 820 - 2016,9,6,2016,379.99\n")]);
        let loader = loader_with_catalog(&dir).await;

        let err = loader.load_products().await.unwrap_err();
        assert!(matches!(err, LoadError::Csv { file: PRODUCTS_FILE, .. }));
    }

    #[tokio::test]
    async fn test_constraint_violation_rolls_back_table() {
        let dir = data_dir(&[(
            PRODUCTS_FILE,
            "1,Trek 820 - 2016,9,6,2016,379.99\n2,Mystery Bike - 2016,99,6,2016,100.00\n",
        )]);
        let loader = loader_with_catalog(&dir).await;

        let err = loader.load_products().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Db(DbError::ForeignKeyViolation { .. })
        ));
        assert_eq!(loader.db.products().count().await.unwrap(), 0);
        // Earlier tables stay committed
        assert_eq!(loader.db.brands().count().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_whitespace_and_nulls() {
        let dir = data_dir(&[(
            CUSTOMERS_FILE,
            " Debra , Burks ,NULL,debra.burks@yahoo.com,NULL,Orchard Park,NY,14127\n",
        )]);
        let loader = FixtureLoader::new(empty_database().await, dir.path());

        assert_eq!(loader.load_customers().await.unwrap(), 1);

        let customer = loader.db.customers().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(customer.first_name, "Debra");
        assert_eq!(customer.last_name, "Burks");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.street, None);
    }
}
