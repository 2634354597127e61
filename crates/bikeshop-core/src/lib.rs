//! # bikeshop-core: Entity Types for the Bike Shop Schema
//!
//! Pure definitions of the nine tables of the bike shop schema, the records
//! used to decode fixture files, and the validation applied to those records
//! before they reach the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bikeshop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bikeshop CLI (bin/bikeshop.rs)                  │   │
//! │  │        bootstrap ──► row counts ──► demo queries                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bikeshop-db (Database Layer)                    │   │
//! │  │        pool, migrations, repositories, fixture loader           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bikeshop-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌─────────────┐              │   │
//! │  │   │   types   │  │  fixtures   │  │ validation  │              │   │
//! │  │   │  Product  │  │ CSV records │  │ field rules │              │   │
//! │  │   │  Order    │  │ seed tables │  │             │              │   │
//! │  │   └───────────┘  └─────────────┘  └─────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity types (Category, Product, Order, ...)
//! - [`fixtures`] - Literal seed tables and CSV record types
//! - [`validation`] - Field-level checks run before inserts
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bikeshop_core::fixtures::{parse_fixture_date, parse_nullable};
//!
//! assert_eq!(parse_nullable("NULL"), None);
//! assert_eq!(parse_nullable("(831) 476-4321"), Some("(831) 476-4321"));
//!
//! let date = parse_fixture_date("20160101").unwrap();
//! assert_eq!(date.to_string(), "2016-01-01");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sentinel used in fixture files for an absent value.
pub const NULL_SENTINEL: &str = "NULL";

/// Date layout used in fixture files (`20160101`).
pub const FIXTURE_DATE_FORMAT: &str = "%Y%m%d";
