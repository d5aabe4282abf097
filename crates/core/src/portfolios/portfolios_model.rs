//! Portfolio domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::containers;
use crate::errors::{Error, ValidationError};
use crate::repository::Entity;
use crate::Result;

/// Aggregate cash state for one portfolio id. The id is its own partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub cash_balance: Decimal,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Portfolio {
    pub fn new(id: impl Into<String>, cash_balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            cash_balance,
            last_updated: now,
            created_at: now,
        }
    }

    pub fn add_cash(&mut self, amount: Decimal) -> Result<Decimal> {
        ensure_non_negative(amount)?;
        self.cash_balance = self.cash_balance.checked_add(amount).ok_or_else(|| {
            ValidationError::invalid(format!(
                "Amount {} would overflow the cash balance {}",
                amount, self.cash_balance
            ))
        })?;
        self.touch();
        Ok(self.cash_balance)
    }

    /// Fails with `InsufficientFunds` rather than letting the balance go
    /// negative.
    pub fn withdraw_cash(&mut self, amount: Decimal) -> Result<Decimal> {
        ensure_non_negative(amount)?;
        if amount > self.cash_balance {
            return Err(Error::InsufficientFunds(format!(
                "Insufficient funds: tried to withdraw {}, but only {} available",
                amount, self.cash_balance
            )));
        }
        self.cash_balance -= amount;
        self.touch();
        Ok(self.cash_balance)
    }
}

fn ensure_non_negative(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::invalid(format!(
            "Amount cannot be negative: {}",
            amount
        ))
        .into());
    }
    Ok(())
}

impl Entity for Portfolio {
    const CONTAINER: &'static str = containers::PORTFOLIOS;

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.id
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
