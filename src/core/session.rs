//! Quote session - Selection state, view/edit mode and price edits.
//!
//! A session owns the catalog snapshot it quotes against. Selections are
//! session-only. Price edits are accepted in [`Mode::Edit`] only and are
//! persisted through the [`CatalogRepository`] right after being applied.

use crate::{
    core::{
        catalog::{Catalog, FeeSlot, ListSlot},
        quote::{Breakdown, Selection, compute_breakdown},
        store::CatalogRepository,
    },
    errors::{Error, Result},
};
use tracing::info;

/// Whether the session is quoting or editing the price list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Selections are made and quoted; prices are read-only
    #[default]
    View,
    /// Prices and fees may be changed
    Edit,
}

impl Mode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::View => Self::Edit,
            Self::Edit => Self::View,
        }
    }
}

/// One user's working session.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    catalog: Catalog,
    /// Current selection; reset to empty for every new session
    pub selection: Selection,
}

impl Session {
    /// Starts a session in view mode with an empty selection.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            mode: Mode::View,
            catalog,
            selection: Selection::default(),
        }
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches between view and edit mode, returning the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        info!("Session switched to {:?} mode", self.mode);
        self.mode
    }

    /// Catalog snapshot this session quotes against
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Quote for the current selection.
    #[must_use]
    pub fn breakdown(&self) -> Breakdown {
        compute_breakdown(&self.selection, &self.catalog)
    }

    /// Changes the price of a list entry and saves the list.
    ///
    /// # Errors
    /// Returns [`Error::ReadOnlyMode`] outside edit mode, or a storage error.
    pub async fn set_entry_price(
        &mut self,
        repo: &CatalogRepository,
        slot: ListSlot,
        id: &str,
        price: f64,
    ) -> Result<bool> {
        self.ensure_editable()?;
        repo.update(&mut self.catalog, slot, id, price).await
    }

    /// Changes a flat fee and saves it.
    ///
    /// # Errors
    /// Returns [`Error::ReadOnlyMode`] outside edit mode, or a storage error.
    pub async fn set_fee(
        &mut self,
        repo: &CatalogRepository,
        fee: FeeSlot,
        amount: f64,
    ) -> Result<()> {
        self.ensure_editable()?;
        repo.set_fee(&mut self.catalog, fee, amount).await
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.mode {
            Mode::Edit => Ok(()),
            Mode::View => Err(Error::ReadOnlyMode),
        }
    }
}
