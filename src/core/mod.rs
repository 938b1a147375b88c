//! Core business logic - framework-agnostic catalog, quoting and session handling.

/// Price list model, seed values and input parsing
pub mod catalog;
/// Pure quote computation
pub mod quote;
/// View/edit session over a catalog snapshot
pub mod session;
/// Persistence of the catalog in the key-value table
pub mod store;
