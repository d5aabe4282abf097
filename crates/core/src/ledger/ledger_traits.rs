use async_trait::async_trait;
use rust_decimal::Decimal;

use super::ledger_model::{
    BuyOutcome, CashOperation, HoldingInput, HoldingsView, PositionUpdate, SellOutcome,
    TransactionHistory, TransactionHistoryQuery,
};
use crate::holdings::Holding;
use crate::portfolios::Portfolio;
use crate::Result;

/// Business-rule layer keeping holdings, transactions and cash consistent.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Returns the portfolio, creating it with the default balance if absent.
    async fn get_or_create_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    async fn get_cash_balance(&self, portfolio_id: &str) -> Result<Decimal>;

    /// Adds or subtracts `amount` (which must be non-negative) and returns
    /// the new balance.
    async fn update_cash_balance(
        &self,
        amount: Decimal,
        operation: CashOperation,
        portfolio_id: &str,
    ) -> Result<Decimal>;

    /// Buys a new position, paying for it out of the cash balance.
    async fn add_holding(&self, input: HoldingInput, portfolio_id: &str) -> Result<BuyOutcome>;

    /// Sells `quantity` shares of a position, or all of it when `None`.
    async fn remove_holding(
        &self,
        position_id: &str,
        quantity: Option<Decimal>,
        portfolio_id: &str,
    ) -> Result<SellOutcome>;

    /// Adjusts notes or cost basis. No cash moves and no transaction is
    /// recorded.
    async fn update_position(
        &self,
        position_id: &str,
        update: PositionUpdate,
        portfolio_id: &str,
    ) -> Result<Holding>;

    async fn get_holdings(
        &self,
        filter_ticker: Option<&str>,
        include_totals: bool,
        portfolio_id: &str,
    ) -> Result<HoldingsView>;

    async fn get_transaction_history(
        &self,
        query: TransactionHistoryQuery,
        portfolio_id: &str,
    ) -> Result<TransactionHistory>;
}
