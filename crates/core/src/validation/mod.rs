//! Validation module - stateless checks for every input entering the ledger.

mod validators;


pub use validators::{
    validate_date, validate_notes, validate_position_id, validate_price, validate_quantity,
    validate_ticker, validate_total, validate_transaction_type, validate_watchlist_name, ValidationResult,
};
