//! Shared helpers for database tests.

use std::path::PathBuf;

use crate::pool::{Database, DbConfig};

/// The bundled fixture directory at the workspace root.
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// A fresh in-memory database with the schema applied and no rows.
pub async fn empty_database() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database opens")
}

/// A fresh in-memory database loaded with every bundled fixture.
pub async fn seeded_database() -> Database {
    Database::bootstrap(DbConfig::in_memory(), fixture_dir())
        .await
        .expect("bundled fixtures load")
}
