//! Catalog model - Labor types, boiler models, radiator rates and flat fees.
//!
//! The catalog is the editable price list that feeds the quote engine. It is a
//! plain in-memory value; persistence lives in [`crate::core::store`]. Entries
//! are matched by id, and a price update touches only the matching entry.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashSet;

/// Storage key for the labor type list
pub const WORK_TYPES_KEY: &str = "workTypes";
/// Storage key for the boiler model list
pub const COMBI_BOILERS_KEY: &str = "combiBoilers";
/// Storage key for the radiator rate list
pub const RADIATORS_KEY: &str = "radiators";
/// Storage key for the demolition fee
pub const DEMOLITION_PRICE_KEY: &str = "demolitionPrice";
/// Storage key for the flexible pipe fee
pub const FLEXIBLE_PIPE_PRICE_KEY: &str = "flexiblePipePrice";
/// Storage key for the cash payment discount
pub const CASH_DISCOUNT_PRICE_KEY: &str = "cashDiscountPrice";

/// Common view over the three kinds of priced catalog entries.
pub trait CatalogEntry: Clone + Serialize + DeserializeOwned {
    /// Unique id within its list
    fn id(&self) -> &str;
    /// Display name
    fn name(&self) -> &str;
    /// Flat price, or price per meter for radiators
    fn price(&self) -> f64;
    /// Replaces the price field, leaving id and name untouched
    fn set_price(&mut self, price: f64);
}

/// A named installation service package with a flat price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborType {
    /// Unique id (e.g., `"combi"`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Flat price
    pub price: f64,
}

/// A named boiler model with a flat price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoilerModel {
    /// Unique id (e.g., `"bosch1200i20"`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Flat price
    pub price: f64,
}

/// A radiator brand priced per linear meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiatorType {
    /// Unique id (e.g., `"eca"`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Price per meter of radiator
    #[serde(rename = "pricePerMeter")]
    pub price_per_meter: f64,
}

macro_rules! impl_catalog_entry {
    ($ty:ty, $field:ident) => {
        impl CatalogEntry for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn price(&self) -> f64 {
                self.$field
            }

            fn set_price(&mut self, price: f64) {
                self.$field = price;
            }
        }
    };
}

impl_catalog_entry!(LaborType, price);
impl_catalog_entry!(BoilerModel, price);
impl_catalog_entry!(RadiatorType, price_per_meter);

/// The three editable price lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSlot {
    /// Labor packages
    WorkTypes,
    /// Boiler models
    CombiBoilers,
    /// Radiator rates per meter
    Radiators,
}

impl ListSlot {
    /// All list slots in display order
    pub const ALL: [Self; 3] = [Self::WorkTypes, Self::CombiBoilers, Self::Radiators];

    /// Storage key for this slot
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::WorkTypes => WORK_TYPES_KEY,
            Self::CombiBoilers => COMBI_BOILERS_KEY,
            Self::Radiators => RADIATORS_KEY,
        }
    }
}

/// The three editable flat fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeSlot {
    /// Demolition add-on
    Demolition,
    /// Flexible piping add-on
    FlexiblePipe,
    /// Discount for cash payment
    CashDiscount,
}

impl FeeSlot {
    /// All fee slots in display order
    pub const ALL: [Self; 3] = [Self::Demolition, Self::FlexiblePipe, Self::CashDiscount];

    /// Storage key for this slot
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Demolition => DEMOLITION_PRICE_KEY,
            Self::FlexiblePipe => FLEXIBLE_PIPE_PRICE_KEY,
            Self::CashDiscount => CASH_DISCOUNT_PRICE_KEY,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Demolition => "Demolition",
            Self::FlexiblePipe => "Flexible pipe",
            Self::CashDiscount => "Cash discount",
        }
    }
}

/// Any of the six persisted catalog slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSlot {
    /// One of the price lists
    List(ListSlot),
    /// One of the flat fees
    Fee(FeeSlot),
}

impl CatalogSlot {
    /// All six slots, lists first
    pub const ALL: [Self; 6] = [
        Self::List(ListSlot::WorkTypes),
        Self::List(ListSlot::CombiBoilers),
        Self::List(ListSlot::Radiators),
        Self::Fee(FeeSlot::Demolition),
        Self::Fee(FeeSlot::FlexiblePipe),
        Self::Fee(FeeSlot::CashDiscount),
    ];

    /// Storage key for this slot
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::List(slot) => slot.key(),
            Self::Fee(slot) => slot.key(),
        }
    }
}

impl From<ListSlot> for CatalogSlot {
    fn from(slot: ListSlot) -> Self {
        Self::List(slot)
    }
}

impl From<FeeSlot> for CatalogSlot {
    fn from(slot: FeeSlot) -> Self {
        Self::Fee(slot)
    }
}

/// Flat fees applied on top of the taxed base amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatFees {
    /// Charged when demolition is requested
    pub demolition: f64,
    /// Charged when flexible piping is requested
    pub flexible_pipe: f64,
    /// Subtracted when paying in cash
    pub cash_discount: f64,
}

impl FlatFees {
    /// Current amount of a fee
    #[must_use]
    pub const fn get(&self, slot: FeeSlot) -> f64 {
        match slot {
            FeeSlot::Demolition => self.demolition,
            FeeSlot::FlexiblePipe => self.flexible_pipe,
            FeeSlot::CashDiscount => self.cash_discount,
        }
    }

    /// Overwrites a fee
    pub const fn set(&mut self, slot: FeeSlot, amount: f64) {
        match slot {
            FeeSlot::Demolition => self.demolition = amount,
            FeeSlot::FlexiblePipe => self.flexible_pipe = amount,
            FeeSlot::CashDiscount => self.cash_discount = amount,
        }
    }
}

impl Default for FlatFees {
    fn default() -> Self {
        Self {
            demolition: 3000.0,
            flexible_pipe: 5000.0,
            cash_discount: 5000.0,
        }
    }
}

/// The complete editable price list.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Labor packages
    pub work_types: Vec<LaborType>,
    /// Boiler models
    pub combi_boilers: Vec<BoilerModel>,
    /// Radiator rates
    pub radiators: Vec<RadiatorType>,
    /// Add-on fees and cash discount
    pub fees: FlatFees,
}

impl Catalog {
    /// Looks up a labor type by id
    #[must_use]
    pub fn labor(&self, id: &str) -> Option<&LaborType> {
        find_entry(&self.work_types, id)
    }

    /// Looks up a boiler model by id
    #[must_use]
    pub fn boiler(&self, id: &str) -> Option<&BoilerModel> {
        find_entry(&self.combi_boilers, id)
    }

    /// Looks up a radiator type by id
    #[must_use]
    pub fn radiator(&self, id: &str) -> Option<&RadiatorType> {
        find_entry(&self.radiators, id)
    }

    /// Replaces the price of the entry with `id` in the given list.
    ///
    /// Returns `false` and leaves the catalog untouched when no entry matches.
    pub fn update_entry(&mut self, slot: ListSlot, id: &str, price: f64) -> bool {
        match slot {
            ListSlot::WorkTypes => update_entry(&mut self.work_types, id, price),
            ListSlot::CombiBoilers => update_entry(&mut self.combi_boilers, id, price),
            ListSlot::Radiators => update_entry(&mut self.radiators, id, price),
        }
    }

    /// `(id, name, price)` rows of a list, in stored order
    #[must_use]
    pub fn entries(&self, slot: ListSlot) -> Vec<(&str, &str, f64)> {
        fn rows<T: CatalogEntry>(list: &[T]) -> Vec<(&str, &str, f64)> {
            list.iter().map(|e| (e.id(), e.name(), e.price())).collect()
        }

        match slot {
            ListSlot::WorkTypes => rows(&self.work_types),
            ListSlot::CombiBoilers => rows(&self.combi_boilers),
            ListSlot::Radiators => rows(&self.radiators),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            work_types: default_work_types(),
            combi_boilers: default_combi_boilers(),
            radiators: default_radiators(),
            fees: FlatFees::default(),
        }
    }
}

/// Seed labor packages
#[must_use]
pub fn default_work_types() -> Vec<LaborType> {
    [
        ("full", "Full Installation with Radiators", 22000.0),
        ("installation", "Radiator Installation and Gas", 20000.0),
        ("line", "Line Shift", 18000.0),
        ("combi", "Boiler Installation and Gas", 15000.0),
        ("stove", "Stove Line", 13000.0),
    ]
    .into_iter()
    .map(|(id, name, price)| LaborType {
        id: id.to_string(),
        name: name.to_string(),
        price,
    })
    .collect()
}

/// Seed boiler models
#[must_use]
pub fn default_combi_boilers() -> Vec<BoilerModel> {
    [
        ("vaillant286", "Vaillant 286/5-3 24kW", 49000.0),
        ("vaillant236", "Vaillant 236/5-3 20kW", 45000.0),
        ("bosch1200i24", "Bosch 1200i 24kW", 32000.0),
        ("bosch1200i20", "Bosch 1200i 20kW", 28000.0),
    ]
    .into_iter()
    .map(|(id, name, price)| BoilerModel {
        id: id.to_string(),
        name: name.to_string(),
        price,
    })
    .collect()
}

/// Seed radiator rates
#[must_use]
pub fn default_radiators() -> Vec<RadiatorType> {
    [
        ("vaillant", "Vaillant", 3000.0),
        ("eca", "ECA", 2800.0),
        ("kalde", "Kalde", 2500.0),
    ]
    .into_iter()
    .map(|(id, name, price_per_meter)| RadiatorType {
        id: id.to_string(),
        name: name.to_string(),
        price_per_meter,
    })
    .collect()
}

/// First entry whose id matches, if any.
pub fn find_entry<'a, T: CatalogEntry>(list: &'a [T], id: &str) -> Option<&'a T> {
    list.iter().find(|entry| entry.id() == id)
}

/// Sets the price of the matching entry. Silent no-op when nothing matches.
pub fn update_entry<T: CatalogEntry>(list: &mut [T], id: &str, price: f64) -> bool {
    match list.iter_mut().find(|entry| entry.id() == id) {
        Some(entry) => {
            entry.set_price(price);
            true
        }
        None => false,
    }
}

/// A stored list is usable when it is non-empty and its ids are unique.
pub fn is_valid_list<T: CatalogEntry>(list: &[T]) -> bool {
    let mut seen = HashSet::new();
    !list.is_empty() && list.iter().all(|entry| seen.insert(entry.id()))
}

/// Parses user-entered amounts. Anything that is not a finite number becomes `0`.
#[must_use]
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map_or(0.0, sanitize_amount)
}

/// Maps NaN and infinities to `0`, leaving finite values (negatives included) as-is.
#[must_use]
pub const fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
