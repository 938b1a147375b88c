//! Entity module - Contains the SeaORM entity definitions for the database.

pub mod catalog_state;

pub use catalog_state::Entity as CatalogState;
