/// Database configuration and connection management
pub mod database;

/// Seed catalog loading from seed.toml
pub mod seed;
