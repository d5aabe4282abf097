//! Holdings module - open positions held in a portfolio.

mod holdings_model;


pub use holdings_model::{Holding, NewHolding};
