//! Transactions module - the append-only ledger record.

mod transactions_model;

#[cfg(test)]
mod transactions_model_tests;

pub use transactions_model::{NewTransaction, Transaction, TransactionType};
