//! Shared test utilities.
//!
//! Helpers for setting up an in-memory catalog store and building selections.

use crate::{
    config::database::{create_connection, create_tables},
    core::{quote::Selection, store::CatalogRepository},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with the catalog table initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = create_connection("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Repository over a fresh in-memory database.
pub async fn setup_repository() -> Result<CatalogRepository> {
    Ok(CatalogRepository::new(setup_test_db().await?))
}

/// Selection with the given ids and radiator length, all toggles off.
pub fn selection(
    labor: Option<&str>,
    boiler: Option<&str>,
    radiator: Option<&str>,
    radiator_meters: f64,
) -> Selection {
    Selection {
        labor: labor.map(str::to_string),
        boiler: boiler.map(str::to_string),
        radiator: radiator.map(str::to_string),
        radiator_meters,
        ..Selection::default()
    }
}
