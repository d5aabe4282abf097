//! SQLite storage for ledger entities as partitioned JSON documents.

mod model;
mod repository;

pub use model::DocumentDB;
pub use repository::DocumentRepository;
