//! # Customer Repository
//!
//! Database operations for customers, plus the grouping and null-handling
//! queries that run over the customer table.
//!
//! ## Grouping
//! ```text
//! city_counts("CA")
//!   SELECT city, COUNT(city) FROM customer
//!   WHERE state = 'CA' AND city IS NOT NULL GROUP BY city
//!
//! cities_with_more_than("CA", 4)
//!   SELECT * FROM ( <city_counts> ) WHERE city_count > 4
//! ```

use serde::Serialize;
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;

use super::order::ORDER_COLUMNS;
use crate::error::{DbError, DbResult};
use bikeshop_core::{Customer, NewCustomer, Order};

const CUSTOMER_COLUMNS: &str =
    "customer_id, first_name, last_name, phone, email, street, city, state, zip_code";

/// Number of customers living in a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CityCount {
    pub city: String,
    pub city_count: i64,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a customer using any executor and returns the assigned ID.
    pub async fn insert_with<'e, E>(executor: E, customer: &NewCustomer) -> DbResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO customer (
                first_name, last_name, phone, email, street, city, state, zip_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.street)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip_code)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// The stored customer with its database-assigned ID.
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        debug!(email = %customer.email, "Inserting customer");
        let id = Self::insert_with(&self.pool, customer).await?;
        Ok(customer.clone().with_id(id))
    }

    /// Gets a customer by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customer WHERE customer_id = ?1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists all customers in key order.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let sql = format!("SELECT {} FROM customer ORDER BY customer_id", CUSTOMER_COLUMNS);
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes a customer. Rejected while orders reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customer WHERE customer_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Orders placed by a customer (`customer.orders`), oldest first.
    pub async fn orders(&self, customer_id: i64) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"SELECT {} FROM "order" WHERE customer_id = ?1 ORDER BY order_date, order_id"#,
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    // =========================================================================
    // Projections
    // =========================================================================

    /// `(first_name, last_name)` of every customer in key order.
    pub async fn names(&self) -> DbResult<Vec<(String, String)>> {
        let names = sqlx::query_as::<_, (String, String)>(
            "SELECT first_name, last_name FROM customer ORDER BY customer_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// `(first_name, last_name)` ordered by last name.
    pub async fn names_sorted_by_last(&self) -> DbResult<Vec<(String, String)>> {
        let names = sqlx::query_as::<_, (String, String)>(
            "SELECT first_name, last_name FROM customer ORDER BY last_name, customer_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// `(first_name, last_name)` of customers living in a city.
    ///
    /// Used with [`Rows::scalar`](crate::query::Rows::scalar) and friends
    /// to show how result cardinality is checked.
    pub async fn names_in_city(&self, city: &str) -> DbResult<Vec<(String, String)>> {
        let names = sqlx::query_as::<_, (String, String)>(
            "SELECT first_name, last_name FROM customer WHERE city = ?1 ORDER BY customer_id",
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Customers in a state, ordered by last name.
    pub async fn in_state(&self, state: &str) -> DbResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customer WHERE state = ?1 ORDER BY last_name, customer_id",
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(state)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    /// Customers per city within a state, ordered by city.
    ///
    /// Customers without a city are left out rather than reported as a
    /// `(NULL, 0)` group.
    pub async fn city_counts(&self, state: &str) -> DbResult<Vec<CityCount>> {
        let counts = sqlx::query_as::<_, CityCount>(
            r#"
            SELECT city, COUNT(city) AS city_count
            FROM customer
            WHERE state = ?1 AND city IS NOT NULL
            GROUP BY city
            ORDER BY city
            "#,
        )
        .bind(state)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Cities within a state having more than `min_customers` customers.
    ///
    /// The grouped counts are computed in a subquery and filtered on the
    /// aggregate outside it.
    pub async fn cities_with_more_than(
        &self,
        state: &str,
        min_customers: i64,
    ) -> DbResult<Vec<CityCount>> {
        let counts = sqlx::query_as::<_, CityCount>(
            r#"
            SELECT city, city_count
            FROM (
                SELECT city, COUNT(city) AS city_count
                FROM customer
                WHERE state = ?1 AND city IS NOT NULL
                GROUP BY city
            )
            WHERE city_count > ?2
            ORDER BY city
            "#,
        )
        .bind(state)
        .bind(min_customers)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Number of distinct cities customers live in.
    pub async fn distinct_city_count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM (SELECT DISTINCT city FROM customer)")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Null Handling
    // =========================================================================

    /// Customers with no phone number, ordered by name.
    pub async fn without_phone(&self) -> DbResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customer WHERE phone IS NULL ORDER BY first_name, last_name",
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Customers with a phone number, ordered by name.
    pub async fn with_phone(&self) -> DbResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customer WHERE phone IS NOT NULL ORDER BY first_name, last_name",
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
