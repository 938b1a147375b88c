//! Catalog state entity - Stores the editable price list as key-value pairs.
//!
//! Each catalog slot (labor types, boiler models, radiators and the three flat
//! fees) is kept as a single row. Lists are JSON-encoded, scalars are plain
//! numeric strings. Whole slots are rewritten on every edit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog state database model - one row per catalog slot
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Slot key (e.g., `"workTypes"`, `"demolitionPrice"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Encoded slot value
    pub value: String,
    /// When this slot was last written
    pub updated_at: DateTime,
}

/// `CatalogState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
