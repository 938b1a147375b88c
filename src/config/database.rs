//! Database configuration module.
//!
//! Handles the `SQLite` connection and creation of the `catalog_state` table
//! from its SeaORM entity definition. The table is created with
//! `IF NOT EXISTS` so startup is idempotent across runs.

use crate::entities::CatalogState;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;

/// Fallback database location when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/gas_quote.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Creates the parent directory of a file-backed `SQLite` URL if it is missing.
///
/// In-memory and non-`SQLite` URLs are left alone.
pub fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Connects to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the catalog table from its entity definition, if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut catalog_state_table = schema.create_table_from_entity(CatalogState);
    catalog_state_table.if_not_exists();

    db.execute(builder.build(&catalog_state_table)).await?;

    Ok(())
}
