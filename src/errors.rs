//! Unified error type for the quote calculator.

use thiserror::Error;

/// All errors surfaced by the catalog store, configuration and CLI layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Seed file or environment configuration could not be used
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Underlying SeaORM / SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A catalog slot could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rendering output text failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Filesystem failure (seed file, database directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An amount that cannot be stored (NaN or infinite)
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A price edit was attempted while the session is in view mode
    #[error("Prices can only be changed in edit mode")]
    ReadOnlyMode,
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
