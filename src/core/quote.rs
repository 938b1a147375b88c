//! Quote engine - Turns a selection and a catalog into a price breakdown.
//!
//! The computation is pure: labor, boiler and radiator lines are summed and
//! taxed once, add-on fees are added untaxed, and the cash discount is
//! subtracted last. Selections that do not match a catalog entry contribute 0.

use crate::core::catalog::{Catalog, sanitize_amount};
use serde::{Deserialize, Serialize};

/// Flat 20% tax applied once to the summed base amount.
pub const TAX_MULTIPLIER: f64 = 1.20;

/// What the customer picked. Lives for one session only and is never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected labor type id
    pub labor: Option<String>,
    /// Selected boiler model id
    pub boiler: Option<String>,
    /// Selected radiator type id
    pub radiator: Option<String>,
    /// Radiator length in meters, used as given
    pub radiator_meters: f64,
    /// Demolition add-on requested
    pub demolition: bool,
    /// Flexible piping add-on requested
    pub flexible_pipe: bool,
    /// Customer pays in cash
    pub cash_payment: bool,
}

/// Itemized result of a quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Taxed and rounded sum of labor, boiler and radiator lines
    pub base_amount: f64,
    /// Rounded sum of enabled add-on fees
    pub additional_amount: f64,
    /// Configured cash discount, or 0
    pub cash_discount: f64,
    /// `base_amount + additional_amount - cash_discount`
    pub total: f64,
}

/// Computes the price breakdown for a selection against a catalog.
#[must_use]
pub fn compute_breakdown(selection: &Selection, catalog: &Catalog) -> Breakdown {
    let labor = selection
        .labor
        .as_deref()
        .and_then(|id| catalog.labor(id))
        .map_or(0.0, |labor| sanitize_amount(labor.price));

    let boiler = selection
        .boiler
        .as_deref()
        .and_then(|id| catalog.boiler(id))
        .map_or(0.0, |boiler| sanitize_amount(boiler.price));

    let meters = sanitize_amount(selection.radiator_meters);
    let radiator = selection
        .radiator
        .as_deref()
        .and_then(|id| catalog.radiator(id))
        .map_or(0.0, |radiator| sanitize_amount(radiator.price_per_meter) * meters);

    let taxed_base = (labor + boiler + radiator) * TAX_MULTIPLIER;

    let mut additional = 0.0;
    if selection.demolition {
        additional += sanitize_amount(catalog.fees.demolition);
    }
    if selection.flexible_pipe {
        additional += sanitize_amount(catalog.fees.flexible_pipe);
    }

    let cash_discount = if selection.cash_payment {
        sanitize_amount(catalog.fees.cash_discount)
    } else {
        0.0
    };

    let base_amount = round_half_up(taxed_base);
    let additional_amount = round_half_up(additional);

    Breakdown {
        base_amount,
        additional_amount,
        cash_discount,
        total: base_amount + additional_amount - cash_discount,
    }
}

/// Rounds to the nearest integer, halves towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}
