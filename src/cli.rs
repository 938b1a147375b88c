//! Command-line interface - argument parsing and text rendering.
//!
//! Every command loads the catalog, opens a [`Session`] on it and renders a
//! plain-text result. Price edits switch the session into edit mode first.

use crate::{
    config::seed::DEFAULT_SEED_PATH,
    core::{
        catalog::{Catalog, FeeSlot, ListSlot, parse_amount},
        quote::{Breakdown, Selection},
        session::Session,
        store::CatalogRepository,
    },
    errors::Result,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Natural-gas installation quote calculator
#[derive(Debug, Parser)]
#[command(name = "gas-quote", version)]
pub struct Cli {
    /// TOML file overriding the built-in seed prices
    #[arg(long, env = "GAS_QUOTE_SEED", default_value = DEFAULT_SEED_PATH)]
    pub seed: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose { "gas_quote=debug,info" } else { "info" }
    }
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a selection
    Quote(QuoteArgs),
    /// Inspect or edit the price list
    #[command(subcommand)]
    Prices(PricesCommand),
}

/// Selection flags for `quote`
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Labor type id
    #[arg(long)]
    pub labor: Option<String>,
    /// Boiler model id
    #[arg(long)]
    pub boiler: Option<String>,
    /// Radiator type id
    #[arg(long)]
    pub radiator: Option<String>,
    /// Radiator length in meters
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub meters: String,
    /// Add demolition
    #[arg(long)]
    pub demolition: bool,
    /// Add flexible piping
    #[arg(long)]
    pub flexible_pipe: bool,
    /// Customer pays in cash
    #[arg(long)]
    pub cash: bool,
}

impl QuoteArgs {
    /// Selection described by the flags. Unparseable lengths count as 0.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            labor: self.labor.clone(),
            boiler: self.boiler.clone(),
            radiator: self.radiator.clone(),
            radiator_meters: parse_amount(&self.meters),
            demolition: self.demolition,
            flexible_pipe: self.flexible_pipe,
            cash_payment: self.cash,
        }
    }
}

/// `prices` subcommands
#[derive(Debug, Subcommand)]
pub enum PricesCommand {
    /// Show the current price list
    List,
    /// Change the price of a labor type, boiler or radiator
    Set {
        /// Which list the entry belongs to
        list: ListArg,
        /// Entry id
        id: String,
        /// New price (per meter for radiators)
        #[arg(allow_hyphen_values = true)]
        price: String,
    },
    /// Change a flat fee
    Fee {
        /// Which fee
        fee: FeeArg,
        /// New amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Forget all edits and return to the seed prices
    Reset,
}

/// List names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListArg {
    /// Labor types
    Labor,
    /// Boiler models
    Boiler,
    /// Radiator types
    Radiator,
}

impl From<ListArg> for ListSlot {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Labor => Self::WorkTypes,
            ListArg::Boiler => Self::CombiBoilers,
            ListArg::Radiator => Self::Radiators,
        }
    }
}

/// Fee names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeeArg {
    /// Demolition fee
    Demolition,
    /// Flexible piping fee
    FlexiblePipe,
    /// Cash payment discount
    CashDiscount,
}

impl From<FeeArg> for FeeSlot {
    fn from(arg: FeeArg) -> Self {
        match arg {
            FeeArg::Demolition => Self::Demolition,
            FeeArg::FlexiblePipe => Self::FlexiblePipe,
            FeeArg::CashDiscount => Self::CashDiscount,
        }
    }
}

/// Executes a command against the store and returns the text to print.
///
/// # Errors
/// Returns storage errors; malformed stored data is never an error.
pub async fn run(command: Command, repo: &CatalogRepository, seed: &Catalog) -> Result<String> {
    let mut session = Session::new(repo.load(seed).await?);

    match command {
        Command::Quote(args) => {
            session.selection = args.selection();
            render_quote(&session)
        }
        Command::Prices(PricesCommand::List) => render_catalog(session.catalog()),
        Command::Prices(PricesCommand::Set { list, id, price }) => {
            let slot = ListSlot::from(list);
            let price = parse_amount(&price);
            session.toggle_mode();
            if session.set_entry_price(repo, slot, &id, price).await? {
                Ok(format!("Updated '{id}' to {}", format_amount(price)))
            } else {
                Ok(format!("No entry '{id}' in {}, nothing changed", slot.key()))
            }
        }
        Command::Prices(PricesCommand::Fee { fee, amount }) => {
            let fee = FeeSlot::from(fee);
            let amount = parse_amount(&amount);
            session.toggle_mode();
            session.set_fee(repo, fee, amount).await?;
            Ok(format!("{} set to {}", fee.label(), format_amount(amount)))
        }
        Command::Prices(PricesCommand::Reset) => {
            let removed = repo.reset().await?;
            Ok(format!("Restored seed prices ({removed} stored slots cleared)"))
        }
    }
}

/// Itemized quote. Add-on and discount lines only appear when selected.
///
/// # Errors
/// Returns [`crate::errors::Error::Format`] if the text cannot be written.
pub fn render_quote(session: &Session) -> Result<String> {
    let selection = &session.selection;
    let catalog = session.catalog();
    let Breakdown {
        base_amount,
        additional_amount,
        cash_discount,
        total,
    } = session.breakdown();

    let mut out = String::new();

    let labor = selection.labor.as_deref().map(|id| {
        catalog
            .labor(id)
            .map_or_else(|| not_in_catalog(id), |l| l.name.clone())
    });
    let boiler = selection.boiler.as_deref().map(|id| {
        catalog
            .boiler(id)
            .map_or_else(|| not_in_catalog(id), |b| b.name.clone())
    });
    let radiator = selection.radiator.as_deref().map(|id| {
        catalog.radiator(id).map_or_else(
            || not_in_catalog(id),
            |r| format!("{} x {} m", r.name, selection.radiator_meters),
        )
    });

    for (label, value) in [("Labor", labor), ("Boiler", boiler), ("Radiator", radiator)] {
        if let Some(value) = value {
            writeln!(out, "{label:<10}{value}")?;
        }
    }
    if !out.is_empty() {
        out.push('\n');
    }

    push_amount_line(&mut out, "Main services (tax incl.):", base_amount)?;
    if selection.demolition || selection.flexible_pipe {
        push_amount_line(&mut out, "Additional services:", additional_amount)?;
    }
    if selection.cash_payment {
        push_amount_line(&mut out, "Cash discount:", -cash_discount)?;
    }
    push_amount_line(&mut out, "Grand total:", total)?;

    Ok(out.trim_end().to_string())
}

fn push_amount_line(out: &mut String, label: &str, amount: f64) -> Result<()> {
    writeln!(out, "{label:<28}{:>14}", format_amount(amount))?;
    Ok(())
}

fn not_in_catalog(id: &str) -> String {
    format!("{id} (not in catalog)")
}

/// Every list and fee, one entry per line.
///
/// # Errors
/// Returns [`crate::errors::Error::Format`] if the text cannot be written.
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    let mut out = String::new();

    for (slot, title, unit) in [
        (ListSlot::WorkTypes, "Labor types", ""),
        (ListSlot::CombiBoilers, "Boiler models", ""),
        (ListSlot::Radiators, "Radiators", "/m"),
    ] {
        writeln!(out, "{title} ({})", slot.key())?;
        for (id, name, price) in catalog.entries(slot) {
            writeln!(out, "  {id:<14}{name:<36}{:>12}{unit}", format_amount(price))?;
        }
        out.push('\n');
    }

    writeln!(out, "Fees")?;
    for fee in FeeSlot::ALL {
        writeln!(
            out,
            "  {:<14}{:>12}",
            fee.label(),
            format_amount(catalog.fees.get(fee))
        )?;
    }

    Ok(out.trim_end().to_string())
}

/// Formats an amount with `.` thousands separators and the `TL` unit.
///
/// Fractions are kept to two places with a `,` decimal separator.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if fraction != 0 {
        grouped.push(',');
        grouped.push_str(format!("{fraction:02}").trim_end_matches('0'));
    }

    let sign = if amount < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}{grouped} TL")
}
