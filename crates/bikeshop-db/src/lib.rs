//! # bikeshop-db: Database Layer for the Bike Shop
//!
//! SQLite storage for the bike shop schema: connection pool, embedded
//! migrations, one repository per table, and the fixture loader that fills
//! a fresh database from literal tables and CSV files.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bikeshop Data Flow                               │
//! │                                                                         │
//! │  bikeshop CLI / tests                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bikeshop-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ category.rs   │    │  (embedded)  │  │   │
//! │  │   │               │    │ product.rs    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ order.rs      │    │ 001_initial  │  │   │
//! │  │   │ foreign keys  │    │ catalog.rs    │    │ _schema.sql  │  │   │
//! │  │   └───────▲───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────┴───────┐    ┌───────────────┐                       │   │
//! │  │   │ FixtureLoader │    │  query::Rows  │                       │   │
//! │  │   │ (loader.rs)   │    │ one / scalar  │                       │   │
//! │  │   └───────────────┘    └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (in-memory by default)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`loader`] - Fixture loading, one transaction per table
//! - [`repository`] - Repository implementations (one per table + catalog)
//! - [`query`] - Result cardinality helpers (`one`, `one_or_none`, `scalar`)
//! - [`config`] - Environment configuration for the CLI
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bikeshop_db::{Database, DbConfig, Rows};
//!
//! let db = Database::bootstrap(DbConfig::in_memory(), "./data").await?;
//!
//! let cruisers = db.products().name_like("%Cruiser%").await?;
//! let electra = Rows::from(db.brands().find_by_name("Electra").await?).one()?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod loader;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use loader::{FixtureLoader, LoadError, LoadResult};
pub use pool::{Database, DbConfig};
pub use query::Rows;

// Repository re-exports for convenience
pub use repository::catalog::{CatalogEntry, CatalogRepository, ProductSale, TableCount};
pub use repository::customer::{CityCount, CustomerRepository};
pub use repository::order::{OrderRepository, OrderTotal};
