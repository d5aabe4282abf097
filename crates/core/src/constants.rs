use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Portfolio id used when the caller does not name one
pub const DEFAULT_PORTFOLIO_ID: &str = "default";

/// Watchlist owner used when the caller does not name one
pub const DEFAULT_USER_ID: &str = "default";

/// Cash balance of a lazily created portfolio
pub const DEFAULT_CASH_BALANCE: Decimal = dec!(100000);

/// Maximum length of free-text notes, in characters
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Maximum length of a watchlist name, in characters
pub const MAX_WATCHLIST_NAME_LENGTH: usize = 100;

/// Default number of rows returned by the transaction history
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Hard cap on rows returned by the transaction history
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Store container names, one per record type
pub mod containers {
    pub const HOLDINGS: &str = "holdings";
    pub const TRANSACTIONS: &str = "transactions";
    pub const PORTFOLIOS: &str = "portfolios";
    pub const WATCHLISTS: &str = "watchlists";
}
