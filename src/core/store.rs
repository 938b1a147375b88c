//! Catalog store - Loads and persists the editable price list.
//!
//! Each of the six catalog slots is kept as one row of the `catalog_state`
//! key-value table. Lists are stored as JSON arrays and fees as plain numeric
//! strings. Missing or malformed rows never fail a load: the seed value for
//! that slot is used instead. Saves rewrite the whole slot unconditionally.

use crate::{
    core::catalog::{Catalog, CatalogEntry, CatalogSlot, FeeSlot, ListSlot, is_valid_list},
    entities::{CatalogState, catalog_state},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Explicit repository over the catalog slots of a database.
///
/// Nothing is saved implicitly: callers persist after each edit, either with
/// [`CatalogRepository::update`] / [`CatalogRepository::set_fee`] or by saving
/// a whole snapshot.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Wraps an open database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every slot, falling back to `seed` for slots that are absent or unparseable.
    #[instrument(skip_all)]
    pub async fn load(&self, seed: &Catalog) -> Result<Catalog> {
        let mut catalog = Catalog {
            work_types: self.load_list(ListSlot::WorkTypes, &seed.work_types).await?,
            combi_boilers: self
                .load_list(ListSlot::CombiBoilers, &seed.combi_boilers)
                .await?,
            radiators: self.load_list(ListSlot::Radiators, &seed.radiators).await?,
            fees: seed.fees,
        };

        for fee in FeeSlot::ALL {
            let amount = self.load_fee(fee, seed.fees.get(fee)).await?;
            catalog.fees.set(fee, amount);
        }

        Ok(catalog)
    }

    /// Writes all six slots in one transaction.
    ///
    /// Every slot is encoded before anything is written, and the writes either
    /// all land or none do.
    #[instrument(skip_all)]
    pub async fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut encoded = Vec::with_capacity(CatalogSlot::ALL.len());
        for slot in CatalogSlot::ALL {
            encoded.push((slot.key(), encode_slot(catalog, slot)?));
        }

        let txn = self.db.begin().await?;
        for (key, value) in encoded {
            write_value(&txn, key, value).await?;
        }
        txn.commit().await?;

        info!("Saved full catalog");
        Ok(())
    }

    /// Serializes a single slot of `catalog` and overwrites its stored value.
    #[instrument(skip(self, catalog))]
    pub async fn save_slot(&self, catalog: &Catalog, slot: CatalogSlot) -> Result<()> {
        let value = encode_slot(catalog, slot)?;
        self.write(slot.key(), value).await?;
        info!("Saved catalog slot {}", slot.key());
        Ok(())
    }

    /// Sets the price of entry `id` in a list and persists that list.
    ///
    /// Returns `false` when no entry matched; the list is still rewritten so
    /// storage always mirrors the in-memory catalog.
    #[instrument(skip(self, catalog))]
    pub async fn update(
        &self,
        catalog: &mut Catalog,
        slot: ListSlot,
        id: &str,
        price: f64,
    ) -> Result<bool> {
        ensure_finite(price)?;
        let matched = catalog.update_entry(slot, id, price);
        if !matched {
            debug!("No entry '{}' in {}, price unchanged", id, slot.key());
        }
        self.save_slot(catalog, slot.into()).await?;
        Ok(matched)
    }

    /// Sets a flat fee and persists it.
    #[instrument(skip(self, catalog))]
    pub async fn set_fee(&self, catalog: &mut Catalog, fee: FeeSlot, amount: f64) -> Result<()> {
        ensure_finite(amount)?;
        catalog.fees.set(fee, amount);
        self.save_slot(catalog, fee.into()).await
    }

    /// Removes every stored slot so the next load returns the seed.
    #[instrument(skip_all)]
    pub async fn reset(&self) -> Result<u64> {
        let keys = CatalogSlot::ALL.map(CatalogSlot::key);
        let result = CatalogState::delete_many()
            .filter(catalog_state::Column::Key.is_in(keys))
            .exec(&self.db)
            .await?;
        info!("Reset catalog, removed {} stored slots", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Raw stored value for a key, if any.
    pub async fn read(&self, key: &str) -> Result<Option<String>> {
        let state = CatalogState::find()
            .filter(catalog_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(state.map(|s| s.value))
    }

    /// Upserts a raw value under `key`.
    pub async fn write(&self, key: &str, value: String) -> Result<()> {
        write_value(&self.db, key, value).await
    }

    async fn load_list<T: CatalogEntry>(&self, slot: ListSlot, seed: &[T]) -> Result<Vec<T>> {
        let Some(raw) = self.read(slot.key()).await? else {
            debug!("No stored value for {}, using seed", slot.key());
            return Ok(seed.to_vec());
        };

        match decode_list::<T>(&raw) {
            Some(list) => Ok(list),
            None => {
                warn!("Stored value for {} is malformed, using seed", slot.key());
                Ok(seed.to_vec())
            }
        }
    }

    async fn load_fee(&self, fee: FeeSlot, seed: f64) -> Result<f64> {
        let Some(raw) = self.read(fee.key()).await? else {
            debug!("No stored value for {}, using seed", fee.key());
            return Ok(seed);
        };

        match decode_fee(&raw) {
            Some(amount) => Ok(amount),
            None => {
                warn!("Stored value for {} is not a number, using seed", fee.key());
                Ok(seed)
            }
        }
    }
}

async fn write_value<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now().naive_utc();

    let existing = CatalogState::find()
        .filter(catalog_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: catalog_state::ActiveModel = state.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = catalog_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

fn encode_slot(catalog: &Catalog, slot: CatalogSlot) -> Result<String> {
    let value = match slot {
        CatalogSlot::List(ListSlot::WorkTypes) => serde_json::to_string(&catalog.work_types)?,
        CatalogSlot::List(ListSlot::CombiBoilers) => {
            serde_json::to_string(&catalog.combi_boilers)?
        }
        CatalogSlot::List(ListSlot::Radiators) => serde_json::to_string(&catalog.radiators)?,
        CatalogSlot::Fee(fee) => {
            let amount = catalog.fees.get(fee);
            ensure_finite(amount)?;
            amount.to_string()
        }
    };
    Ok(value)
}

fn ensure_finite(amount: f64) -> Result<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

fn decode_list<T: CatalogEntry>(raw: &str) -> Option<Vec<T>> {
    serde_json::from_str::<Vec<T>>(raw)
        .ok()
        .filter(|list| is_valid_list(list))
}

fn decode_fee(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::catalog::{DEMOLITION_PRICE_KEY, LaborType, RADIATORS_KEY, WORK_TYPES_KEY};
    use crate::test_utils::setup_repository;

    #[tokio::test]
    async fn test_load_empty_store_returns_seed() -> Result<()> {
        let repo = setup_repository().await?;

        let catalog = repo.load(&Catalog::default()).await?;

        assert_eq!(catalog, Catalog::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = Catalog::default();
        catalog.update_entry(ListSlot::CombiBoilers, "vaillant236", 46500.0);
        catalog.fees.set(FeeSlot::CashDiscount, 4000.0);

        repo.save(&catalog).await?;
        let loaded = repo.load(&Catalog::default()).await?;
        assert_eq!(loaded, catalog);

        repo.save(&loaded).await?;
        assert_eq!(repo.load(&Catalog::default()).await?, catalog);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_survives_reload() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = repo.load(&Catalog::default()).await?;

        let matched = repo
            .update(&mut catalog, ListSlot::WorkTypes, "combi", 17250.0)
            .await?;
        assert!(matched);

        let reloaded = repo.load(&Catalog::default()).await?;
        assert_eq!(reloaded.labor("combi").unwrap().price, 17250.0);
        assert_eq!(reloaded.labor("full").unwrap().price, 22000.0);
        assert_eq!(reloaded.labor("stove").unwrap().price, 13000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_later_edits_keep_earlier_stored_prices() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = repo.load(&Catalog::default()).await?;
        repo.update(&mut catalog, ListSlot::WorkTypes, "full", 23000.0)
            .await?;

        let mut session_two = repo.load(&Catalog::default()).await?;
        repo.update(&mut session_two, ListSlot::WorkTypes, "line", 18500.0)
            .await?;

        let reloaded = repo.load(&Catalog::default()).await?;
        assert_eq!(reloaded.labor("full").unwrap().price, 23000.0);
        assert_eq!(reloaded.labor("line").unwrap().price, 18500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_list_unchanged() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = repo.load(&Catalog::default()).await?;

        let matched = repo
            .update(&mut catalog, ListSlot::Radiators, "demirdokum", 1000.0)
            .await?;

        assert!(!matched);
        assert_eq!(repo.load(&Catalog::default()).await?, Catalog::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_fee_persists_scalar_as_plain_number() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = repo.load(&Catalog::default()).await?;

        repo.set_fee(&mut catalog, FeeSlot::Demolition, 3500.0)
            .await?;

        assert_eq!(repo.read(DEMOLITION_PRICE_KEY).await?, Some("3500".to_string()));
        assert_eq!(repo.load(&Catalog::default()).await?.fees.demolition, 3500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_values_fall_back_to_seed() -> Result<()> {
        let repo = setup_repository().await?;
        repo.write(WORK_TYPES_KEY, "{not json".to_string()).await?;
        repo.write(RADIATORS_KEY, "[]".to_string()).await?;
        repo.write(DEMOLITION_PRICE_KEY, "abc".to_string()).await?;

        let catalog = repo.load(&Catalog::default()).await?;

        assert_eq!(catalog, Catalog::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_stored_list_with_integer_prices_is_accepted() -> Result<()> {
        let repo = setup_repository().await?;
        repo.write(
            WORK_TYPES_KEY,
            r#"[{"id":"stove","name":"Stove Line","price":14000}]"#.to_string(),
        )
        .await?;
        repo.write(
            RADIATORS_KEY,
            r#"[{"id":"eca","name":"ECA","pricePerMeter":2900}]"#.to_string(),
        )
        .await?;

        let catalog = repo.load(&Catalog::default()).await?;

        assert_eq!(
            catalog.work_types,
            vec![LaborType {
                id: "stove".to_string(),
                name: "Stove Line".to_string(),
                price: 14000.0,
            }]
        );
        assert_eq!(catalog.radiator("eca").unwrap().price_per_meter, 2900.0);
        assert_eq!(catalog.combi_boilers, Catalog::default().combi_boilers);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_ids_fall_back_to_seed() -> Result<()> {
        let repo = setup_repository().await?;
        repo.write(
            WORK_TYPES_KEY,
            r#"[{"id":"full","name":"A","price":1},{"id":"full","name":"B","price":2}]"#
                .to_string(),
        )
        .await?;

        let catalog = repo.load(&Catalog::default()).await?;
        assert_eq!(catalog.work_types, Catalog::default().work_types);
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_restores_seed() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = repo.load(&Catalog::default()).await?;
        repo.update(&mut catalog, ListSlot::CombiBoilers, "bosch1200i24", 33000.0)
            .await?;
        repo.set_fee(&mut catalog, FeeSlot::FlexiblePipe, 5500.0)
            .await?;

        let removed = repo.reset().await?;

        assert_eq!(removed, 2);
        assert_eq!(repo.load(&Catalog::default()).await?, Catalog::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_finite_fee_is_rejected_on_save() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = Catalog::default();

        let result = repo
            .set_fee(&mut catalog, FeeSlot::CashDiscount, f64::NAN)
            .await;

        assert!(matches!(result, Err(Error::InvalidAmount { amount: _ })));
        assert_eq!(catalog.fees.cash_discount, 5000.0);
        assert_eq!(repo.read(FeeSlot::CashDiscount.key()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_leaves_storage_unchanged() -> Result<()> {
        let repo = setup_repository().await?;
        let mut stored = Catalog::default();
        assert!(stored.update_entry(ListSlot::WorkTypes, "line", 18500.0));
        repo.save(&stored).await?;

        let mut catalog = stored.clone();
        assert!(catalog.update_entry(ListSlot::WorkTypes, "full", 99999.0));
        catalog.fees.cash_discount = f64::NAN;

        let result = repo.save(&catalog).await;

        assert!(matches!(result, Err(Error::InvalidAmount { amount: _ })));
        assert_eq!(repo.load(&Catalog::default()).await?, stored);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_first_save_writes_nothing() -> Result<()> {
        let repo = setup_repository().await?;
        let mut catalog = Catalog::default();
        catalog.fees.demolition = f64::INFINITY;

        assert!(repo.save(&catalog).await.is_err());
        for slot in CatalogSlot::ALL {
            assert_eq!(repo.read(slot.key()).await?, None);
        }
        Ok(())
    }

    #[test]
    fn test_decode_fee() {
        assert_eq!(decode_fee("5000"), Some(5000.0));
        assert_eq!(decode_fee(" 12.5 "), Some(12.5));
        assert_eq!(decode_fee(""), None);
        assert_eq!(decode_fee("NaN"), None);
        assert_eq!(decode_fee("five"), None);
    }
}
