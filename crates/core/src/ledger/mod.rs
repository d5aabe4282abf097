//! Ledger module - buy, sell and adjust operations across holdings,
//! transactions and cash.

mod ledger_locks;
mod ledger_model;
mod ledger_service;
mod ledger_traits;


pub use ledger_locks::PortfolioLocks;
pub use ledger_model::{
    BuyOutcome, CashOperation, HistoryFilters, HoldingInput, HoldingsTotals, HoldingsView,
    PositionUpdate, SellOutcome, TickerTotals, TransactionHistory, TransactionHistoryQuery,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;
