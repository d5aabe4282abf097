//! Inputs and outcomes of ledger operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::holdings::Holding;
use crate::transactions::Transaction;

/// Direction of a cash balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashOperation {
    Add,
    Subtract,
}

impl FromStr for CashOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(CashOperation::Add),
            "subtract" => Ok(CashOperation::Subtract),
            other => Err(ValidationError::invalid(format!(
                "Invalid cash operation: '{}'. Must be 'add' or 'subtract'",
                other
            ))),
        }
    }
}

/// Raw buy request; validated by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct HoldingInput {
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: Option<String>,
    pub notes: Option<String>,
}

/// Cost-basis adjustment. At least one field must be set; an empty `notes`
/// string clears the notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionUpdate {
    pub notes: Option<String>,
    pub purchase_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuyOutcome {
    pub holding: Holding,
    pub transaction: Transaction,
    pub total_cost: Decimal,
    pub new_cash_balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellOutcome {
    pub transaction: Transaction,
    pub quantity_sold: Decimal,
    pub proceeds: Decimal,
    pub new_cash_balance: Decimal,
    pub holding_removed: bool,
    pub remaining_quantity: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickerTotals {
    pub quantity: Decimal,
    pub invested: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingsTotals {
    pub total_invested: Decimal,
    pub cash_balance: Decimal,
    pub total_portfolio_value: Decimal,
    pub by_ticker: BTreeMap<String, TickerTotals>,
}

impl HoldingsTotals {
    /// Aggregates cost basis per ticker and overall. Fails if a sum does not
    /// fit in a `Decimal`.
    pub fn compute(holdings: &[Holding], cash_balance: Decimal) -> crate::Result<Self> {
        let mut by_ticker: BTreeMap<String, TickerTotals> = BTreeMap::new();
        let mut total_invested = Decimal::ZERO;

        for holding in holdings {
            let invested = holding.cost_basis()?;
            total_invested = checked_sum(total_invested, invested)?;
            let entry = by_ticker.entry(holding.ticker.clone()).or_default();
            entry.quantity = checked_sum(entry.quantity, holding.quantity)?;
            entry.invested = checked_sum(entry.invested, invested)?;
        }

        Ok(Self {
            total_invested,
            cash_balance,
            total_portfolio_value: checked_sum(total_invested, cash_balance)?,
            by_ticker,
        })
    }
}

fn checked_sum(a: Decimal, b: Decimal) -> crate::Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| ValidationError::invalid("Portfolio totals are too large").into())
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldingsView {
    pub holdings: Vec<Holding>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<HoldingsTotals>,
}

/// Filters for [`get_transaction_history`](super::LedgerServiceTrait::get_transaction_history).
/// Blank strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionHistoryQuery {
    pub ticker: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transaction_type: Option<String>,
    pub limit: Option<i64>,
}

/// Echo of the filters actually applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryFilters {
    pub ticker: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transaction_type: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionHistory {
    pub transactions: Vec<Transaction>,
    pub count: usize,
    pub filters: HistoryFilters,
}
