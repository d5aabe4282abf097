//! Transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::containers;
use crate::errors::ValidationError;
use crate::repository::Entity;
use crate::Result;

/// Kind of ledger event recorded by a transaction.
///
/// Serialized as its lowercase name (`"buy"`, `"transfer_in"`). Parsing is
/// case-insensitive and accepts either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Split,
    TransferIn,
    TransferOut,
}

impl TransactionType {
    pub const ALL: [TransactionType; 6] = [
        TransactionType::Buy,
        TransactionType::Sell,
        TransactionType::Dividend,
        TransactionType::Split,
        TransactionType::TransferIn,
        TransactionType::TransferOut,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
            TransactionType::Dividend => "dividend",
            TransactionType::Split => "split",
            TransactionType::TransferIn => "transfer_in",
            TransactionType::TransferOut => "transfer_out",
        }
    }

    /// Uppercase code, as accepted from callers and echoed in filters.
    pub fn as_code(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::Split => "SPLIT",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::TransferOut => "TRANSFER_OUT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_code() == code)
            .ok_or_else(|| {
                let valid: Vec<&str> = TransactionType::ALL.iter().map(|t| t.as_code()).collect();
                ValidationError::invalid(format!(
                    "Invalid transaction type: '{}'. Must be one of: {}",
                    code,
                    valid.join(", ")
                ))
            })
    }
}

/// Immutable audit record of one ledger event.
///
/// `total` is signed: negative for money leaving the portfolio, positive for
/// money coming in. Transactions are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub ticker: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Decimal,
    pub total: Decimal,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub portfolio_id: String,
    pub transaction_type: TransactionType,
    pub ticker: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Decimal,
    pub total: Decimal,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Validates the record-level invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some(quantity) = self.quantity {
            if quantity <= Decimal::ZERO {
                return Err(ValidationError::invalid(format!(
                    "Transaction quantity must be greater than zero: {}",
                    quantity
                ))
                .into());
            }
        }
        if self.price < Decimal::ZERO {
            return Err(ValidationError::invalid(format!(
                "Transaction price cannot be negative: {}",
                self.price
            ))
            .into());
        }
        if let Some(ticker) = &self.ticker {
            if ticker.is_empty() || ticker.len() > 14 {
                return Err(ValidationError::invalid(format!(
                    "Invalid transaction ticker: '{}'",
                    ticker
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Assigns an id and creation time, producing the stored record.
    pub fn into_transaction(self) -> Result<Transaction> {
        self.validate()?;
        Ok(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: self.portfolio_id,
            transaction_type: self.transaction_type,
            ticker: self.ticker.map(|t| t.to_uppercase()),
            quantity: self.quantity,
            price: self.price,
            total: self.total,
            date: self.date,
            notes: self.notes,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Transaction {
    const CONTAINER: &'static str = containers::TRANSACTIONS;

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.portfolio_id
    }

    /// Transactions carry no modification timestamp.
    fn touch(&mut self) {}
}
