//! # Staff Repository
//!
//! Database operations for staff members.
//!
//! ## Management Hierarchy
//! ```text
//! Fabiola Jackson (1)
//! ├── Mireya Copeland (2)
//! │   ├── Genna Serrano (3)
//! │   └── Virgie Wiggins (4)
//! ├── Jannette David (5)
//! │   ├── Marcelene Boyer (6)
//! │   └── Venita Daniel (7)
//! │       ├── Layla Terrell (9)
//! │       └── Bernardine Houston (10)
//! └── Kali Vargas (8)
//! ```
//! `manager_id` is a self-referencing foreign key; the root has none.

use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use super::order::ORDER_COLUMNS;
use crate::error::{DbError, DbResult};
use bikeshop_core::{Order, Staff, Store};

pub(crate) const STAFF_COLUMNS: &str =
    "staff_id, first_name, last_name, email, phone, active, store_id, manager_id";

/// Repository for staff database operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Inserts a staff member using any executor (pool or transaction).
    pub async fn insert_with<'e, E>(executor: E, staff: &Staff) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO staff (
                staff_id, first_name, last_name, email, phone, active, store_id, manager_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(staff.staff_id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(staff.active)
        .bind(staff.store_id)
        .bind(staff.manager_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a new staff member.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the email is taken
    /// * `Err(DbError::ForeignKeyViolation)` - unknown store or manager
    pub async fn insert(&self, staff: &Staff) -> DbResult<()> {
        debug!(id = staff.staff_id, email = %staff.email, "Inserting staff");
        Self::insert_with(&self.pool, staff).await
    }

    /// Gets a staff member by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Staff>> {
        let sql = format!("SELECT {} FROM staff WHERE staff_id = ?1", STAFF_COLUMNS);
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }

    /// Lists all staff in key order.
    pub async fn list(&self) -> DbResult<Vec<Staff>> {
        let sql = format!("SELECT {} FROM staff ORDER BY staff_id", STAFF_COLUMNS);
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(staff)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes a staff member. Rejected while reports or orders reference them.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting staff");

        let result = sqlx::query("DELETE FROM staff WHERE staff_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Staff", id));
        }

        Ok(())
    }

    /// The manager of a staff member (`staff.manager`).
    pub async fn manager_of(&self, staff_id: i64) -> DbResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT m.staff_id, m.first_name, m.last_name, m.email, m.phone,
                   m.active, m.store_id, m.manager_id
            FROM staff s
            JOIN staff m ON m.staff_id = s.manager_id
            WHERE s.staff_id = ?1
            "#,
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Direct reports of a manager (`staff.reports`).
    pub async fn reports_of(&self, manager_id: i64) -> DbResult<Vec<Staff>> {
        let sql = format!(
            "SELECT {} FROM staff WHERE manager_id = ?1 ORDER BY staff_id",
            STAFF_COLUMNS
        );
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(staff)
    }

    /// Orders a staff member handled (`staff.orders`).
    pub async fn orders(&self, staff_id: i64) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"SELECT {} FROM "order" WHERE staff_id = ?1 ORDER BY order_id"#,
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(staff_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// The store a staff member works at (`staff.store`).
    pub async fn store_of(&self, staff_id: i64) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT st.store_id, st.store_name, st.phone, st.email,
                   st.street, st.city, st.state, st.zip_code
            FROM staff s
            JOIN store st ON st.store_id = s.store_id
            WHERE s.staff_id = ?1
            "#,
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_database;

    fn ids(staff: &[Staff]) -> Vec<i64> {
        staff.iter().map(|s| s.staff_id).collect()
    }

    #[tokio::test]
    async fn test_loaded_staff() {
        let db = seeded_database().await;

        let staff = db.staff().list().await.unwrap();
        assert_eq!(staff.len(), 10);
        assert!(staff.iter().all(|s| s.active));

        let root = &staff[0];
        assert_eq!(root.full_name(), "Fabiola Jackson");
        assert_eq!(root.manager_id, None);
    }

    #[tokio::test]
    async fn test_hierarchy() {
        let db = seeded_database().await;
        let staff = db.staff();

        assert_eq!(ids(&staff.reports_of(1).await.unwrap()), vec![2, 5, 8]);
        assert_eq!(ids(&staff.reports_of(7).await.unwrap()), vec![9, 10]);
        assert!(staff.reports_of(10).await.unwrap().is_empty());

        let manager = staff.manager_of(9).await.unwrap().unwrap();
        assert_eq!(manager.full_name(), "Venita Daniel");
        assert!(staff.manager_of(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orders_and_store() {
        let db = seeded_database().await;

        assert_eq!(db.staff().orders(9).await.unwrap().len(), 12);
        assert!(db.staff().orders(1).await.unwrap().is_empty());

        let store = db.staff().store_of(6).await.unwrap().unwrap();
        assert_eq!(store.store_name, "Baldwin Bikes");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = seeded_database().await;
        let mut clone = db.staff().get_by_id(3).await.unwrap().unwrap();
        clone.staff_id = 11;

        let err = db.staff().insert(&clone).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_manager_is_rejected() {
        let db = seeded_database().await;
        let mut hire = db.staff().get_by_id(3).await.unwrap().unwrap();
        hire.staff_id = 11;
        hire.email = "new.hire@bikes.shop".to_string();
        hire.manager_id = Some(99);

        let err = db.staff().insert(&hire).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
    }
}
