//! Ledgerfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the portfolio ledger business logic. It is
//! database-agnostic: persistence goes through [`repository::RepositoryTrait`],
//! implemented in memory here and on SQLite by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod ledger;
pub mod portfolios;
pub mod repository;
pub mod tools;
pub mod transactions;
pub mod validation;
pub mod watchlists;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
