//! Seed catalog loading from seed.toml
//!
//! The built-in seed can be overridden slot by slot from a TOML file. Slots
//! the file leaves out keep their built-in value. The resulting catalog is the
//! fallback used whenever a slot is missing or malformed in storage.

use crate::core::catalog::{
    BoilerModel, Catalog, CatalogEntry, LaborType, RadiatorType, is_valid_list,
};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default seed file location
pub const DEFAULT_SEED_PATH: &str = "seed.toml";

/// Overrides read from the seed file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Replacement labor packages
    pub work_types: Option<Vec<LaborType>>,
    /// Replacement boiler models
    pub combi_boilers: Option<Vec<BoilerModel>>,
    /// Replacement radiator rates (`pricePerMeter` field)
    pub radiators: Option<Vec<RadiatorType>>,
    /// Replacement demolition fee
    pub demolition_price: Option<f64>,
    /// Replacement flexible pipe fee
    pub flexible_pipe_price: Option<f64>,
    /// Replacement cash discount
    pub cash_discount_price: Option<f64>,
}

impl SeedConfig {
    /// Applies the overrides on top of the built-in seed.
    ///
    /// # Errors
    /// Returns a configuration error when a list is empty or repeats an id,
    /// or when a fee is not a finite number.
    pub fn into_catalog(self) -> Result<Catalog> {
        let mut catalog = Catalog::default();

        if let Some(list) = self.work_types {
            catalog.work_types = checked_list("work_types", list)?;
        }
        if let Some(list) = self.combi_boilers {
            catalog.combi_boilers = checked_list("combi_boilers", list)?;
        }
        if let Some(list) = self.radiators {
            catalog.radiators = checked_list("radiators", list)?;
        }
        if let Some(amount) = self.demolition_price {
            catalog.fees.demolition = checked_fee("demolition_price", amount)?;
        }
        if let Some(amount) = self.flexible_pipe_price {
            catalog.fees.flexible_pipe = checked_fee("flexible_pipe_price", amount)?;
        }
        if let Some(amount) = self.cash_discount_price {
            catalog.fees.cash_discount = checked_fee("cash_discount_price", amount)?;
        }

        Ok(catalog)
    }
}

fn checked_list<T: CatalogEntry>(field: &str, list: Vec<T>) -> Result<Vec<T>> {
    if is_valid_list(&list) {
        Ok(list)
    } else {
        Err(Error::Config {
            message: format!("Seed list `{field}` must be non-empty with unique ids"),
        })
    }
}

fn checked_fee(field: &str, amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::Config {
            message: format!("Seed fee `{field}` must be a finite number"),
        })
    }
}

/// Parses a seed file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load seed catalog from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file {}: {e}", path_ref.display()),
    })
}

/// Builds the seed catalog, using the file at `path` when it exists.
///
/// # Errors
/// Returns an error if the file exists but is unreadable, malformed or invalid.
pub fn load_seed_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        debug!("No seed file at {}, using built-in seed", path_ref.display());
        return Ok(Catalog::default());
    }

    let catalog = load_seed(path_ref)?.into_catalog()?;
    info!("Loaded seed catalog overrides from {}", path_ref.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_seed_overrides() {
        let toml_str = r#"
            demolition_price = 3500.0
            cash_discount_price = 4000

            [[radiators]]
            id = "eca"
            name = "ECA"
            pricePerMeter = 2950.0

            [[radiators]]
            id = "demirdokum"
            name = "DemirDokum"
            pricePerMeter = 2700.0
        "#;

        let seed: SeedConfig = toml::from_str(toml_str).unwrap();
        let catalog = seed.into_catalog().unwrap();

        assert_eq!(catalog.radiators.len(), 2);
        assert_eq!(catalog.radiator("eca").unwrap().price_per_meter, 2950.0);
        assert!(catalog.radiator("kalde").is_none());
        assert_eq!(catalog.fees.demolition, 3500.0);
        assert_eq!(catalog.fees.cash_discount, 4000.0);

        let defaults = Catalog::default();
        assert_eq!(catalog.work_types, defaults.work_types);
        assert_eq!(catalog.combi_boilers, defaults.combi_boilers);
        assert_eq!(catalog.fees.flexible_pipe, defaults.fees.flexible_pipe);
    }

    #[test]
    fn test_empty_seed_is_builtin_catalog() {
        let seed: SeedConfig = toml::from_str("").unwrap();
        assert_eq!(seed.into_catalog().unwrap(), Catalog::default());
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let toml_str = r#"
            [[work_types]]
            id = "full"
            name = "Full"
            price = 1.0

            [[work_types]]
            id = "full"
            name = "Full again"
            price = 2.0
        "#;

        let seed: SeedConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            seed.into_catalog(),
            Err(Error::Config { message: _ })
        ));
    }

    #[test]
    fn test_seed_rejects_unknown_keys() {
        let result: std::result::Result<SeedConfig, _> = toml::from_str("tax_rate = 1.18");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_seed_file_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_seed_catalog(dir.path().join("absent.toml")).unwrap();
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn test_seed_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "flexible_pipe_price = 6000").unwrap();

        let catalog = load_seed_catalog(file.path()).unwrap();
        assert_eq!(catalog.fees.flexible_pipe, 6000.0);
    }

    #[test]
    fn test_malformed_seed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "demolition_price = \"lots\"").unwrap();

        let result = load_seed_catalog(file.path());
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
